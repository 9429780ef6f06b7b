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


// Kiln Sandbox
// Renders a few frames of a textured quad against the recording driver and
// logs what the state cache did.

use std::borrow::Cow;
use std::mem;

use anyhow::{Context, Result};
use kiln_core::renderer::*;
use kiln_infra::dispatch::RenderThread;
use kiln_infra::graphics::gl::GlDevice;
use kiln_infra::graphics::recording::RecordingDriver;

type Device = GlDevice<RecordingDriver>;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    uv: [f32; 2],
}

const VERTICES: &[Vertex] = &[
    Vertex {
        position: [-0.5, -0.5, 0.0],
        uv: [0.0, 1.0],
    },
    Vertex {
        position: [0.5, -0.5, 0.0],
        uv: [1.0, 1.0],
    },
    Vertex {
        position: [0.5, 0.5, 0.0],
        uv: [1.0, 0.0],
    },
    Vertex {
        position: [-0.5, 0.5, 0.0],
        uv: [0.0, 0.0],
    },
];

const INDICES: &[u16] = &[0, 1, 2, 2, 3, 0];

const VERTEX_SHADER: &str = r#"#version 330 core
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec2 a_uv;
layout(std140) uniform PerFrame { mat4 u_transform; };
out vec2 v_uv;
void main() {
    v_uv = a_uv;
    gl_Position = u_transform * vec4(a_position, 1.0);
}
"#;

const PIXEL_SHADER: &str = r#"#version 330 core
in vec2 v_uv;
uniform sampler2D u_albedo;
out vec4 o_color;
void main() {
    o_color = texture(u_albedo, v_uv);
}
"#;

const FRAME_COUNT: u32 = 3;

/// Every handle the sandbox scene owns.
struct Scene {
    clear: ResourceHandle,
    vertex_buffer: ResourceHandle,
    index_buffer: ResourceHandle,
    constants: ResourceHandle,
    layout: ResourceHandle,
    vertex_shader: ResourceHandle,
    pixel_shader: ResourceHandle,
    program: ResourceHandle,
    raster: ResourceHandle,
    blend: ResourceHandle,
    depth: ResourceHandle,
    texture: ResourceHandle,
    sampler: ResourceHandle,
    timer: QueryIndex,
}

impl Scene {
    fn create(device: &mut Device) -> Result<Self, RenderError> {
        let clear = device.create_clear_state(&ClearState {
            rgba: [0.1, 0.1, 0.15, 1.0],
            ..ClearState::default()
        })?;
        let vertex_buffer = device.create_buffer(&BufferDescriptor::with_data(
            BufferTarget::Vertex,
            bytemuck::cast_slice(VERTICES),
        ))?;
        let index_buffer = device.create_buffer(&BufferDescriptor::with_data(
            BufferTarget::Index,
            bytemuck::cast_slice(INDICES),
        ))?;
        let constants = device.create_buffer(&BufferDescriptor {
            target: BufferTarget::Uniform,
            usage: BufferUsage::Dynamic,
            size: mem::size_of::<[[f32; 4]; 4]>(),
            data: None,
        })?;
        let layout = device.create_input_layout(&[
            VertexAttributeDescriptor {
                element_type: ElementType::Float32,
                element_count: 3,
                offset: 0,
            },
            VertexAttributeDescriptor {
                element_type: ElementType::Float32,
                element_count: 2,
                offset: mem::size_of::<[f32; 3]>() as u32,
            },
        ])?;

        let vertex_shader = device.create_shader(ShaderStage::Vertex, VERTEX_SHADER.as_bytes())?;
        let pixel_shader = device.create_shader(ShaderStage::Pixel, PIXEL_SHADER.as_bytes())?;
        let program = device.link_shader_program(&ShaderLinkDescriptor {
            vertex_shader,
            pixel_shader,
            constants: Cow::Owned(vec![
                ConstantBinding {
                    name: Cow::Borrowed("PerFrame"),
                    kind: ConstantKind::UniformBuffer,
                    location: 0,
                },
                ConstantBinding {
                    name: Cow::Borrowed("u_albedo"),
                    kind: ConstantKind::Sampler2d,
                    location: 0,
                },
            ]),
        })?;

        let raster = device.create_raster_state(&RasterStateDescriptor::default())?;
        let blend = device.create_blend_state(&BlendStateDescriptor {
            independent_blend_enable: true,
            render_targets: vec![RenderTargetBlend::ALPHA],
        })?;
        let depth = device.create_depth_stencil_state(&DepthStencilDescriptor {
            depth_enable: true,
            depth_func: CompareFunction::LessEqual,
            depth_write_mask: true,
        })?;

        let texels: Vec<u8> = (0..16u8)
            .flat_map(|i| {
                let v = if (i + i / 4) % 2 == 0 { 255 } else { 32 };
                [v, v, v, 255]
            })
            .collect();
        let texture = device.create_texture2d(&TextureDescriptor {
            format: TextureFormat::Rgba8Unorm,
            width: 4,
            height: 4,
            mip_level_count: 1,
            block_size: 4,
            pixels_per_block: 1,
            data: Some(texels.as_slice()),
        })?;
        let sampler = device.create_sampler(&SamplerDescriptor {
            filter: FilterMode::Point,
            address_u: AddressMode::ClampToEdge,
            address_v: AddressMode::ClampToEdge,
            ..SamplerDescriptor::default()
        })?;
        let timer = device.create_query(QueryType::TimeElapsed)?;

        Ok(Self {
            clear,
            vertex_buffer,
            index_buffer,
            constants,
            layout,
            vertex_shader,
            pixel_shader,
            program,
            raster,
            blend,
            depth,
            texture,
            sampler,
            timer,
        })
    }

    fn render(&self, device: &mut Device, frame: u32) -> Result<(), RenderError> {
        device.set_query(self.timer, QueryAction::Begin)?;
        device.set_targets(ResourceHandle::NULL, ResourceHandle::NULL)?;
        device.set_viewport(&Viewport {
            x: 0.0,
            y: 0.0,
            width: 1280.0,
            height: 720.0,
            min_depth: 0.0,
            max_depth: 1.0,
        });
        device.clear(self.clear)?;

        let angle = frame as f32 * 0.1;
        let (sin, cos) = angle.sin_cos();
        let transform: [[f32; 4]; 4] = [
            [cos, sin, 0.0, 0.0],
            [-sin, cos, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        device.update_buffer(self.constants, bytemuck::cast_slice(&transform), 0)?;
        device.set_constant_buffer(self.constants, 0, ShaderStage::Vertex)?;
        device.set_texture(self.texture, self.sampler, 0, ShaderStage::Pixel)?;
        device.set_blend_state(self.blend)?;
        device.set_depth_stencil_state(self.depth)?;

        device.set_vertex_buffer(self.vertex_buffer, mem::size_of::<Vertex>() as u32);
        device.set_index_buffer(self.index_buffer);
        device.set_input_layout(self.layout);
        device.set_shader(self.vertex_shader, ShaderStage::Vertex);
        device.set_shader(self.pixel_shader, ShaderStage::Pixel);
        device.set_raster_state(self.raster);
        device.draw_indexed(INDICES.len() as u32, 0, 0, PrimitiveTopology::TriangleList)?;

        device.set_query(self.timer, QueryAction::End)?;
        device.update_queries();
        device.present();
        Ok(())
    }

    fn release(self, device: &mut Device) -> Result<(), RenderError> {
        device.release_query(self.timer)?;
        device.release_sampler(self.sampler)?;
        device.release_texture2d(self.texture)?;
        device.release_depth_stencil_state(self.depth)?;
        device.release_blend_state(self.blend)?;
        device.release_raster_state(self.raster)?;
        device.release_program(self.program)?;
        device.release_shader(self.pixel_shader)?;
        device.release_shader(self.vertex_shader)?;
        device.release_input_layout(self.layout)?;
        device.release_buffer(self.constants)?;
        device.release_buffer(self.index_buffer)?;
        device.release_buffer(self.vertex_buffer)?;
        device.release_clear_state(self.clear)?;
        Ok(())
    }
}

fn load_settings() -> Result<RendererSettings> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading renderer settings from {path}"))?;
            Ok(RendererSettings::from_json(&json)?)
        }
        None => Ok(RendererSettings::default()),
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;
    log::info!("Sandbox: Using {settings:?}");

    let thread = RenderThread::spawn("kiln-render", move || {
        GlDevice::new(RecordingDriver::new(), settings)
    })?;
    let sender = thread.sender();

    let scene = sender.call(Scene::create)??;
    let platform = sender.call(|device| device.shader_platform())?;
    log::info!("Sandbox: Scene ready on the {platform} backend");

    let (scene, results) = sender.call(move |device| {
        let mut results = Vec::with_capacity(FRAME_COUNT as usize);
        for frame in 0..FRAME_COUNT {
            results.push(scene.render(device, frame));
        }
        (scene, results)
    })?;
    for (frame, result) in results.into_iter().enumerate() {
        result.with_context(|| format!("rendering frame {frame}"))?;
    }

    let (stats, calls, elapsed) = sender.call(move |device| {
        let elapsed = device.get_last_query_result(scene.timer);
        let stats = device.stats();
        let calls = device.driver().calls().len();
        (stats, calls, elapsed)
    })?;
    let elapsed = elapsed?;
    log::info!("Sandbox: {stats:?}");
    log::info!("Sandbox: {calls} driver calls over {FRAME_COUNT} frames");
    log::info!("Sandbox: Last frame took {elapsed} ns");

    sender.call(move |device| scene.release(device))??;
    thread.shutdown()?;
    Ok(())
}
