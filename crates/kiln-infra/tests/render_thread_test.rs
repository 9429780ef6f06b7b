// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration tests driving a `GlDevice` from other threads through a `RenderThread`.

use kiln_core::renderer::{
    BufferDescriptor, BufferTarget, ClearFlags, ClearState, ElementType, PrimitiveTopology,
    RenderError, ResourceHandle, ShaderStage, VertexAttributeDescriptor,
};
use kiln_core::{GraphicsDevice, RendererSettings};
use kiln_infra::dispatch::RenderThread;
use kiln_infra::graphics::gl::GlDevice;
use kiln_infra::graphics::recording::{DriverCall, RecordingDriver};

type Device = GlDevice<RecordingDriver>;

fn spawn(settings: RendererSettings) -> Result<RenderThread<Device>, RenderError> {
    let _ = env_logger::builder().is_test(true).try_init();
    RenderThread::spawn("kiln-render-test", move || {
        GlDevice::new(RecordingDriver::new(), settings)
    })
}

/// Creates a triangle's worth of pipeline state and binds it.
fn bind_triangle(device: &mut Device) -> Result<(), RenderError> {
    let vertices: [f32; 9] = [-0.5, -0.5, 0.0, 0.5, -0.5, 0.0, 0.0, 0.5, 0.0];
    let buffer = device.create_buffer(&BufferDescriptor::with_data(
        BufferTarget::Vertex,
        bytemuck::cast_slice(&vertices),
    ))?;
    let layout = device.create_input_layout(&[VertexAttributeDescriptor {
        element_type: ElementType::Float32,
        element_count: 3,
        offset: 0,
    }])?;
    let vs = device.create_shader(ShaderStage::Vertex, b"void main() {}")?;
    let ps = device.create_shader(ShaderStage::Pixel, b"void main() {}")?;
    device.set_vertex_buffer(buffer, 12);
    device.set_input_layout(layout);
    device.set_shader(vs, ShaderStage::Vertex);
    device.set_shader(ps, ShaderStage::Pixel);
    Ok(())
}

#[test]
fn test_invalid_settings_fail_spawn() {
    let settings = RendererSettings {
        max_resources: 1,
        ..RendererSettings::default()
    };
    assert!(matches!(
        spawn(settings),
        Err(RenderError::InvalidSettings(_))
    ));
}

#[test]
fn test_frames_submitted_from_another_thread() {
    let thread = spawn(RendererSettings::default()).unwrap();
    let sender = thread.sender();

    sender.call(bind_triangle).unwrap().unwrap();
    let clear = sender
        .call(|device| {
            device.create_clear_state(&ClearState {
                rgba: [0.1, 0.1, 0.1, 1.0],
                depth: 1.0,
                flags: ClearFlags::COLOR_DEPTH,
            })
        })
        .unwrap()
        .unwrap();

    for _ in 0..3 {
        sender
            .execute(move |device| {
                if let Err(err) = device
                    .clear(clear)
                    .and_then(|()| device.draw(3, 0, PrimitiveTopology::TriangleList))
                {
                    log::error!("frame failed: {err}");
                }
                device.present();
            })
            .unwrap();
    }

    let stats = sender.call(|device| device.stats()).unwrap();
    assert_eq!(stats.draw_calls, 3);
    assert_eq!(stats.program_links, 1);
    assert_eq!(stats.vertex_layout_rebuilds, 1);
    assert_eq!(stats.live_resources, 5);

    let swaps = sender
        .call(|device| device.driver().count(|c| matches!(c, DriverCall::SwapBuffers)))
        .unwrap();
    assert_eq!(swaps, 3);
    thread.shutdown().unwrap();
}

#[test]
fn test_handles_travel_between_threads() {
    let thread = spawn(RendererSettings::default()).unwrap();
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let sender = thread.sender();
            std::thread::spawn(move || {
                sender
                    .call(|device| device.create_clear_state(&ClearState::default()))
                    .unwrap()
                    .unwrap()
            })
        })
        .collect();
    let mut handles: Vec<ResourceHandle> = workers
        .into_iter()
        .map(|worker| worker.join().unwrap())
        .collect();
    handles.sort();
    assert_eq!(
        handles,
        vec![
            ResourceHandle(1),
            ResourceHandle(2),
            ResourceHandle(3),
            ResourceHandle(4)
        ]
    );

    let sender = thread.sender();
    for handle in handles {
        sender
            .call(move |device| device.release_clear_state(handle))
            .unwrap()
            .unwrap();
    }
    assert_eq!(
        sender.call(|device| device.stats().live_resources).unwrap(),
        0
    );
    thread.shutdown().unwrap();
}

#[test]
fn test_sender_fails_after_shutdown() {
    let thread = spawn(RendererSettings::default()).unwrap();
    let sender = thread.sender();
    thread.shutdown().unwrap();
    assert!(matches!(
        sender.call(|device| device.stats()),
        Err(RenderError::Dispatch(_))
    ));
}
