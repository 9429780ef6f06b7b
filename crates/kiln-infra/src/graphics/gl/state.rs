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

//! Requested versus applied pipeline state, and the draw-time reconciler.

use kiln_core::renderer::{
    BufferTarget, Capability, FrontFace, NativeId, RenderDriver, ResourceError, ResourceHandle,
};

use super::pool::{RasterState, ResourcePool};
use super::program_cache::{ProgramCache, ProgramLookup};

/// A set of enabled vertex attribute locations, one bit per location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttributeMask(u32);

impl AttributeMask {
    /// No location enabled.
    pub const EMPTY: Self = Self(0);

    /// Returns the mask with `location` added. Locations past 31 are ignored.
    pub const fn with(self, location: u32) -> Self {
        if location < u32::BITS {
            Self(self.0 | (1 << location))
        } else {
            self
        }
    }

    /// Returns `true` if `location` is enabled.
    pub const fn contains(self, location: u32) -> bool {
        location < u32::BITS && self.0 & (1 << location) != 0
    }

    /// The raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }
}

/// One snapshot of the bindable pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PipelineStateView {
    /// Vertex buffer.
    pub vertex_buffer: ResourceHandle,
    /// Stride of the vertex buffer in bytes.
    pub vertex_buffer_stride: u32,
    /// Index buffer.
    pub index_buffer: ResourceHandle,
    /// Input layout.
    pub input_layout: ResourceHandle,
    /// Vertex shader.
    pub vertex_shader: ResourceHandle,
    /// Pixel shader.
    pub pixel_shader: ResourceHandle,
    /// Raster state.
    pub raster_state: ResourceHandle,
    /// Attribute locations enabled by the last layout description.
    pub enabled_attributes: AttributeMask,
}

/// Marks an applied binding the driver can no longer be trusted to hold.
///
/// Never equal to an allocatable handle, so the next reconcile rebinds it.
const STALE: ResourceHandle = ResourceHandle(u32::MAX);

/// What a reconcile pass changed, for the device's counters and diagnostics.
#[derive(Debug, Default)]
pub(crate) struct ReconcileReport {
    /// Set when the shader pair changed and both stages were bound.
    pub(crate) program: Option<ProgramLookup>,
    /// Set when attribute pointers were re-described.
    pub(crate) layout_rebuilt: bool,
}

/// Tracks what callers asked for and what the driver was last told.
///
/// Setters only write `requested`. [`PipelineStateCache::reconcile`] runs right
/// before each draw and issues driver calls for exactly the fields that differ.
#[derive(Debug)]
pub(crate) struct PipelineStateCache {
    requested: PipelineStateView,
    applied: PipelineStateView,
    /// Native buffer the driver's vertex-buffer binding point currently holds.
    /// `None` when unknown.
    array_buffer: Option<NativeId>,
    max_vertex_attributes: u32,
}

impl PipelineStateCache {
    pub(crate) fn new(max_vertex_attributes: u32) -> Self {
        Self {
            requested: PipelineStateView::default(),
            applied: PipelineStateView::default(),
            array_buffer: Some(NativeId::NONE),
            max_vertex_attributes,
        }
    }

    pub(crate) fn requested(&self) -> &PipelineStateView {
        &self.requested
    }

    pub(crate) fn applied(&self) -> &PipelineStateView {
        &self.applied
    }

    pub(crate) fn requested_mut(&mut self) -> &mut PipelineStateView {
        &mut self.requested
    }

    /// Records a vertex-buffer binding made outside of reconciliation.
    pub(crate) fn note_array_buffer(&mut self, buffer: NativeId) {
        self.array_buffer = Some(buffer);
    }

    /// Records that a native buffer was deleted. Deleting the bound buffer
    /// resets the binding point to none.
    pub(crate) fn note_buffer_deleted(&mut self, buffer: NativeId) {
        if self.array_buffer == Some(buffer) {
            self.array_buffer = Some(NativeId::NONE);
        }
    }

    /// Forgets every applied binding that refers to `handle`.
    pub(crate) fn forget(&mut self, handle: ResourceHandle) {
        let applied = &mut self.applied;
        if applied.vertex_buffer == handle {
            applied.vertex_buffer = STALE;
            self.array_buffer = None;
        }
        if applied.vertex_shader == handle || applied.pixel_shader == handle {
            applied.vertex_shader = STALE;
            applied.pixel_shader = STALE;
        }
        if applied.input_layout == handle {
            applied.input_layout = STALE;
        }
        if applied.raster_state == handle {
            applied.raster_state = STALE;
        }
        if applied.index_buffer == handle {
            applied.index_buffer = STALE;
        }
    }

    /// Forgets everything the driver was told, so the next reconcile rebinds all state.
    pub(crate) fn invalidate(&mut self) {
        self.applied = PipelineStateView {
            vertex_buffer: STALE,
            vertex_buffer_stride: 0,
            index_buffer: STALE,
            input_layout: STALE,
            vertex_shader: STALE,
            pixel_shader: STALE,
            raster_state: STALE,
            enabled_attributes: AttributeMask::EMPTY,
        };
        self.array_buffer = None;
    }

    /// Records that the index buffer was bound for an indexed draw.
    pub(crate) fn note_index_buffer(&mut self) {
        self.applied.index_buffer = self.requested.index_buffer;
    }

    /// Brings the driver in line with `requested`.
    ///
    /// Every handle is resolved before the first driver call, so a bad handle
    /// leaves both the driver and `applied` untouched. Changes are applied in
    /// order: program, vertex buffer, input layout, raster state.
    pub(crate) fn reconcile<D: RenderDriver>(
        &mut self,
        driver: &mut D,
        pool: &mut ResourcePool,
        programs: &mut ProgramCache,
    ) -> Result<ReconcileReport, ResourceError> {
        let requested = self.requested;
        let mut report = ReconcileReport::default();

        let program_changed = requested.vertex_shader != self.applied.vertex_shader
            || requested.pixel_shader != self.applied.pixel_shader;
        let shader_pair = if program_changed
            && !requested.vertex_shader.is_null()
            && !requested.pixel_shader.is_null()
        {
            Some((
                (requested.vertex_shader, pool.shader(requested.vertex_shader)?.native),
                (requested.pixel_shader, pool.shader(requested.pixel_shader)?.native),
            ))
        } else {
            None
        };

        let vertex_buffer = if requested.vertex_buffer.is_null() {
            NativeId::NONE
        } else {
            pool.buffer(requested.vertex_buffer)?.native
        };

        if !requested.input_layout.is_null() {
            pool.input_layout(requested.input_layout)?;
        }

        let raster = if requested.raster_state == self.applied.raster_state {
            None
        } else if requested.raster_state.is_null() {
            Some(RasterState::DRIVER_DEFAULT)
        } else {
            Some(*pool.raster_state(requested.raster_state)?)
        };

        // Program.
        if program_changed {
            let program = match shader_pair {
                Some((vs, ps)) => {
                    let lookup = programs.get_or_link(driver, vs, ps);
                    let program = lookup.program;
                    report.program = Some(lookup);
                    program
                }
                None => NativeId::NONE,
            };
            driver.use_program(program);
            self.applied.vertex_shader = requested.vertex_shader;
            self.applied.pixel_shader = requested.pixel_shader;
        }

        // Vertex buffer. Attribute pointers capture this binding.
        if self.array_buffer != Some(vertex_buffer) {
            driver.bind_buffer(BufferTarget::Vertex, vertex_buffer);
            self.array_buffer = Some(vertex_buffer);
        }
        self.applied.vertex_buffer = requested.vertex_buffer;

        // Input layout.
        if requested.input_layout.is_null() {
            if self.applied.input_layout != ResourceHandle::NULL {
                driver.bind_vertex_array(NativeId::NONE);
                self.applied.input_layout = ResourceHandle::NULL;
                self.applied.enabled_attributes = AttributeMask::EMPTY;
            }
        } else {
            let layout = pool.input_layout_mut(requested.input_layout)?;
            let invalidated = layout.vertex_array.is_none()
                || layout.bound_vertex_buffer != requested.vertex_buffer
                || requested.input_layout != self.applied.input_layout
                || requested.vertex_buffer_stride != self.applied.vertex_buffer_stride;

            if invalidated {
                if layout.vertex_array.is_none() {
                    layout.vertex_array = driver.gen_vertex_array();
                }
                driver.bind_vertex_array(layout.vertex_array);

                let stride = requested.vertex_buffer_stride;
                for attr in &layout.attributes {
                    driver.vertex_attrib_pointer(
                        attr.location,
                        attr.element_count,
                        attr.element_type,
                        attr.element_type.is_normalized(),
                        stride,
                        attr.offset,
                    );
                }

                let mask = layout.attribute_mask();
                for location in 0..self.max_vertex_attributes {
                    if mask.contains(location) {
                        driver.enable_vertex_attrib_array(location);
                    } else {
                        driver.disable_vertex_attrib_array(location);
                    }
                }

                layout.bound_vertex_buffer = requested.vertex_buffer;
                self.applied.input_layout = requested.input_layout;
                self.applied.vertex_buffer_stride = stride;
                self.applied.enabled_attributes = mask;
                report.layout_rebuilt = true;
            }
        }

        // Raster state.
        if let Some(raster) = raster {
            apply_raster_state(driver, &raster);
            self.applied.raster_state = requested.raster_state;
        }

        Ok(report)
    }
}

fn apply_raster_state<D: RenderDriver>(driver: &mut D, raster: &RasterState) {
    driver.set_capability(Capability::CullFace, raster.culling_enabled);
    if raster.culling_enabled {
        driver.cull_face(raster.cull_face);
    }
    driver.front_face(FrontFace::Cw);
    driver.polygon_mode(raster.polygon_mode);
    driver.set_capability(Capability::DepthClamp, raster.depth_clamp_enabled);
    driver.set_capability(Capability::ScissorTest, raster.scissor_enabled);
}

#[cfg(test)]
mod tests {
    use kiln_core::renderer::{
        AllocationDomain, CullMode, ElementType, FillMode, ResourceKind, ShaderStage,
    };

    use super::*;
    use crate::graphics::gl::pool::{
        BufferResource, InputLayout, ResourceSlot, ShaderResource, VertexAttribute,
    };
    use crate::graphics::recording::{DriverCall, RecordingDriver};

    struct Fixture {
        driver: RecordingDriver,
        pool: ResourcePool,
        programs: ProgramCache,
        cache: PipelineStateCache,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                driver: RecordingDriver::new(),
                pool: ResourcePool::new(16),
                programs: ProgramCache::new(),
                cache: PipelineStateCache::new(4),
            }
        }

        fn insert(&mut self, slot: ResourceSlot) -> ResourceHandle {
            self.pool.insert(AllocationDomain::DIRECT, slot).unwrap()
        }

        fn buffer(&mut self, native: u32) -> ResourceHandle {
            self.insert(ResourceSlot::Buffer(BufferResource {
                native: NativeId(native),
                target: BufferTarget::Vertex,
                size: 64,
            }))
        }

        fn shader(&mut self, native: u32, stage: ShaderStage) -> ResourceHandle {
            self.insert(ResourceSlot::Shader(ShaderResource {
                native: NativeId(native),
                stage,
            }))
        }

        fn layout(&mut self, locations: u32) -> ResourceHandle {
            let attributes = (0..locations)
                .map(|location| VertexAttribute {
                    location,
                    element_type: ElementType::Float32,
                    element_count: 3,
                    offset: location * 12,
                })
                .collect();
            self.insert(ResourceSlot::InputLayout(InputLayout {
                attributes,
                vertex_array: NativeId::NONE,
                bound_vertex_buffer: ResourceHandle::NULL,
            }))
        }

        fn reconcile(&mut self) -> Result<ReconcileReport, ResourceError> {
            self.cache
                .reconcile(&mut self.driver, &mut self.pool, &mut self.programs)
        }
    }

    #[test]
    fn unchanged_state_issues_no_calls() {
        let mut fx = Fixture::new();
        let vb = fx.buffer(50);
        let layout = fx.layout(2);
        let vs = fx.shader(60, ShaderStage::Vertex);
        let ps = fx.shader(61, ShaderStage::Pixel);
        let requested = fx.cache.requested_mut();
        requested.vertex_buffer = vb;
        requested.vertex_buffer_stride = 24;
        requested.input_layout = layout;
        requested.vertex_shader = vs;
        requested.pixel_shader = ps;

        let report = fx.reconcile().unwrap();
        assert!(report.layout_rebuilt);
        assert!(report.program.is_some());
        assert!(!fx.driver.calls().is_empty());

        fx.driver.clear_calls();
        let report = fx.reconcile().unwrap();
        assert!(!report.layout_rebuilt);
        assert!(report.program.is_none());
        assert!(fx.driver.calls().is_empty());
    }

    #[test]
    fn stride_change_rebuilds_layout_once() {
        let mut fx = Fixture::new();
        let vb = fx.buffer(50);
        let layout = fx.layout(2);
        fx.cache.requested_mut().vertex_buffer = vb;
        fx.cache.requested_mut().input_layout = layout;
        fx.cache.requested_mut().vertex_buffer_stride = 24;
        fx.reconcile().unwrap();

        fx.driver.clear_calls();
        fx.cache.requested_mut().vertex_buffer_stride = 32;
        assert!(fx.reconcile().unwrap().layout_rebuilt);
        assert_eq!(
            fx.driver.count(|c| matches!(c, DriverCall::BindVertexArray(_))),
            1
        );
        assert_eq!(
            fx.driver.count(|c| matches!(
                c,
                DriverCall::VertexAttribPointer { stride: 32, .. }
            )),
            2
        );
        assert_eq!(fx.driver.count(|c| matches!(c, DriverCall::GenVertexArray(_))), 0);
        assert!(!fx.reconcile().unwrap().layout_rebuilt);
    }

    #[test]
    fn enabled_attributes_match_layout_exactly() {
        let mut fx = Fixture::new();
        let vb = fx.buffer(50);
        let wide = fx.layout(3);
        let narrow = fx.layout(1);
        fx.cache.requested_mut().vertex_buffer = vb;
        fx.cache.requested_mut().input_layout = wide;
        fx.reconcile().unwrap();
        assert_eq!(fx.cache.applied().enabled_attributes.bits(), 0b111);

        fx.driver.clear_calls();
        fx.cache.requested_mut().input_layout = narrow;
        fx.reconcile().unwrap();
        assert_eq!(fx.cache.applied().enabled_attributes.bits(), 0b1);
        assert_eq!(
            fx.driver
                .count(|c| matches!(c, DriverCall::DisableVertexAttribArray(_))),
            3
        );
    }

    #[test]
    fn vertex_buffer_is_bound_before_attribute_pointers() {
        let mut fx = Fixture::new();
        let vb = fx.buffer(50);
        let layout = fx.layout(1);
        fx.cache.requested_mut().vertex_buffer = vb;
        fx.cache.requested_mut().input_layout = layout;
        fx.reconcile().unwrap();
        let calls = fx.driver.calls();
        let bind = calls
            .iter()
            .position(|c| *c == DriverCall::BindBuffer(BufferTarget::Vertex, NativeId(50)))
            .unwrap();
        let pointer = calls
            .iter()
            .position(|c| matches!(c, DriverCall::VertexAttribPointer { .. }))
            .unwrap();
        assert!(bind < pointer);
    }

    #[test]
    fn invalid_handle_leaves_driver_untouched() {
        let mut fx = Fixture::new();
        let vs = fx.shader(60, ShaderStage::Vertex);
        let ps = fx.shader(61, ShaderStage::Pixel);
        fx.cache.requested_mut().vertex_shader = vs;
        fx.cache.requested_mut().pixel_shader = ps;
        fx.cache.requested_mut().input_layout = vs;
        let err = fx.reconcile().unwrap_err();
        assert_eq!(
            err,
            ResourceError::KindMismatch {
                handle: vs,
                expected: ResourceKind::InputLayout,
                found: ResourceKind::Shader,
            }
        );
        assert!(fx.driver.calls().is_empty());
        assert_eq!(*fx.cache.applied(), PipelineStateView::default());
    }

    #[test]
    fn raster_state_applies_once_and_null_restores_defaults() {
        let mut fx = Fixture::new();
        let raster = fx.insert(ResourceSlot::RasterState(RasterState {
            culling_enabled: true,
            cull_face: CullMode::Front,
            polygon_mode: FillMode::Wireframe,
            depth_clamp_enabled: false,
            scissor_enabled: true,
        }));
        fx.cache.requested_mut().raster_state = raster;
        fx.reconcile().unwrap();
        assert!(fx.driver.calls().contains(&DriverCall::CullFace(CullMode::Front)));
        assert!(fx.driver.calls().contains(&DriverCall::FrontFace(FrontFace::Cw)));

        fx.driver.clear_calls();
        fx.cache.requested_mut().raster_state = ResourceHandle::NULL;
        fx.reconcile().unwrap();
        assert!(fx
            .driver
            .calls()
            .contains(&DriverCall::SetCapability(Capability::CullFace, false)));
        assert!(fx
            .driver
            .calls()
            .contains(&DriverCall::PolygonMode(FillMode::Solid)));
    }

    #[test]
    fn forgetting_a_shader_relinks_on_next_draw() {
        let mut fx = Fixture::new();
        let vs = fx.shader(60, ShaderStage::Vertex);
        let ps = fx.shader(61, ShaderStage::Pixel);
        fx.cache.requested_mut().vertex_shader = vs;
        fx.cache.requested_mut().pixel_shader = ps;
        fx.reconcile().unwrap();
        fx.cache.forget(ps);
        fx.driver.clear_calls();
        let report = fx.reconcile().unwrap();
        assert!(report.program.is_some_and(|lookup| lookup.cached));
        assert_eq!(fx.driver.count(|c| matches!(c, DriverCall::UseProgram(_))), 1);
    }

    #[test]
    fn attribute_mask_bounds() {
        let mask = AttributeMask::EMPTY.with(0).with(31).with(40);
        assert!(mask.contains(0));
        assert!(mask.contains(31));
        assert!(!mask.contains(40));
        assert_eq!(mask.bits(), 0x8000_0001);
    }
}
