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

//! [`GlDevice`] and its [`GraphicsDevice`] implementation.

use kiln_core::renderer::{
    AllocationDomain, BlendStateDescriptor, BufferDescriptor, BufferTarget, Capability, ClearState,
    CompareFunction, ConstantBinding, ConstantKind, DepthStencilDescriptor, DeviceStats,
    GraphicsDevice, IndexFormat, NativeId, PrimitiveTopology, QueryAction, QueryError, QueryIndex,
    QueryType, RasterStateDescriptor, RenderDriver, RenderError, RendererSettings, ResourceError,
    ResourceHandle, ResourceKind, SamplerDescriptor, ScissorRect, ShaderError, ShaderLinkDescriptor,
    ShaderStage, TextureDescriptor, VertexAttributeDescriptor, Viewport,
};

use super::format;
use super::pool::{
    BufferResource, InputLayout, ProgramResource, RasterState, RenderTargetResource, ResourcePool,
    ResourceSlot, ShaderResource, VertexAttribute,
};
use super::program_cache::{ProgramCache, ProgramLookup};
use super::query::QueryPool;
use super::sampler;
use super::state::{PipelineStateCache, PipelineStateView};

/// A [`GraphicsDevice`] for GL-style drivers.
///
/// Owns the resource table, the pipeline-state cache, the program link cache and
/// the query table, and translates every operation into [`RenderDriver`] calls.
/// Pipeline setters are deferred until the next draw; blend, depth, viewport,
/// scissor, texture, constant-buffer and target bindings are applied immediately.
#[derive(Debug)]
pub struct GlDevice<D: RenderDriver> {
    driver: D,
    settings: RendererSettings,
    pool: ResourcePool,
    pipeline: PipelineStateCache,
    programs: ProgramCache,
    queries: QueryPool,
    viewport: Viewport,
    stats: DeviceStats,
    diagnostics: Vec<ShaderError>,
}

impl<D: RenderDriver> GlDevice<D> {
    /// Creates a device over `driver` and makes its context current.
    ///
    /// # Errors
    /// * `RenderError::InvalidSettings` - If `settings` fail validation.
    pub fn new(mut driver: D, settings: RendererSettings) -> Result<Self, RenderError> {
        settings.validate()?;
        driver.make_current();
        log::info!(
            "GlDevice: Created with {} resource slots, {} query slots x {} buffers, {} vertex attributes",
            settings.max_resources,
            settings.max_queries,
            settings.query_buffers,
            settings.max_vertex_attributes
        );
        Ok(Self {
            pool: ResourcePool::new(settings.max_resources),
            pipeline: PipelineStateCache::new(settings.max_vertex_attributes),
            programs: ProgramCache::new(),
            queries: QueryPool::new(settings.max_queries, settings.query_buffers),
            viewport: Viewport::default(),
            stats: DeviceStats::default(),
            diagnostics: Vec::new(),
            driver,
            settings,
        })
    }

    /// The settings the device was created with.
    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    /// The underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The underlying driver, mutably.
    ///
    /// Calls made directly on the driver bypass the state cache; follow them with
    /// [`Self::invalidate_state`] if they touch pipeline bindings.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Reserves an index in `domain` without storing anything in it.
    ///
    /// Used by deferred front-ends that hand out handles before the resource is
    /// created on this thread. The reservation does not block direct allocation.
    pub fn reserve_handle(
        &mut self,
        domain: AllocationDomain,
    ) -> Result<ResourceHandle, ResourceError> {
        self.pool.allocate(domain)
    }

    /// Clears a reservation made with [`Self::reserve_handle`].
    ///
    /// Slots holding a created resource are refused; release those through the
    /// matching `release_*` call.
    pub fn release_reserved(
        &mut self,
        handle: ResourceHandle,
        domain: AllocationDomain,
    ) -> Result<(), ResourceError> {
        self.pool.release(handle, domain)
    }

    /// Number of table indices held in any bit of `domain`, including the null slot.
    pub fn assigned_count(&self, domain: AllocationDomain) -> usize {
        self.pool.assigned_count(domain)
    }

    /// The kind of resource stored at `handle`.
    pub fn resource_kind(&self, handle: ResourceHandle) -> ResourceKind {
        self.pool.kind(handle)
    }

    /// Returns a copy of a stored clear state.
    pub fn clear_state(&self, handle: ResourceHandle) -> Result<ClearState, ResourceError> {
        self.pool.clear_state(handle).copied()
    }

    /// The native program behind a program handle.
    ///
    /// Returns `NativeId::NONE` once either of the program's shaders has been
    /// released, since the native program is deleted with it.
    pub fn linked_program(&self, handle: ResourceHandle) -> Result<NativeId, ResourceError> {
        Ok(self.pool.program(handle)?.program)
    }

    /// Number of programs in the link cache.
    pub fn cached_program_count(&self) -> usize {
        self.programs.len()
    }

    /// The state requested for the next draw.
    pub fn requested_state(&self) -> PipelineStateView {
        *self.pipeline.requested()
    }

    /// The state the driver was last told.
    pub fn applied_state(&self) -> PipelineStateView {
        *self.pipeline.applied()
    }

    /// Forgets what the driver was told, so the next draw rebinds every pipeline binding.
    ///
    /// Needed after changing a bound resource's contents or binding driver state
    /// behind the device's back.
    pub fn invalidate_state(&mut self) {
        self.pipeline.invalidate();
    }

    /// Returns and clears the compile and link diagnostics gathered so far.
    pub fn take_shader_diagnostics(&mut self) -> Vec<ShaderError> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Overwrites a query's stored result with a raw bit pattern.
    pub fn write_query_result_bits(
        &mut self,
        index: QueryIndex,
        bits: u64,
    ) -> Result<(), QueryError> {
        self.queries.write_result_bits(index, bits)
    }

    /// Deletes cached programs and live queries, reports leaked resources and
    /// returns the driver.
    pub fn shutdown(mut self) -> D {
        self.programs.clear(&mut self.driver);
        self.queries.clear(&mut self.driver);
        let leaked = self.pool.live_count();
        if leaked > 0 {
            log::warn!("GlDevice: Shutting down with {leaked} live resources");
            for (handle, slot) in self.pool.iter_live() {
                log::debug!("GlDevice: Leaked {} {handle}", slot.kind());
            }
        }
        log::info!("GlDevice: Shut down");
        self.driver
    }

    fn record_diagnostic(&mut self, err: ShaderError) {
        self.diagnostics.push(err);
    }

    fn note_program_lookup(&mut self, lookup: ProgramLookup) -> NativeId {
        if lookup.cached {
            self.stats.program_cache_hits += 1;
        } else {
            self.stats.program_links += 1;
        }
        if let Some(err) = lookup.diagnostics {
            self.record_diagnostic(err);
        }
        lookup.program
    }

    fn reconcile(&mut self) -> Result<(), ResourceError> {
        let report = self
            .pipeline
            .reconcile(&mut self.driver, &mut self.pool, &mut self.programs)?;
        self.stats.reconciliations += 1;
        if report.layout_rebuilt {
            self.stats.vertex_layout_rebuilds += 1;
        }
        if let Some(lookup) = report.program {
            self.note_program_lookup(lookup);
        }
        Ok(())
    }

    fn resolve_buffer(&self, handle: ResourceHandle) -> Result<NativeId, ResourceError> {
        if handle.is_null() {
            Ok(NativeId::NONE)
        } else {
            Ok(self.pool.buffer(handle)?.native)
        }
    }
}

fn bind_constant<D: RenderDriver>(
    driver: &mut D,
    program: NativeId,
    constant: &ConstantBinding<'_>,
) {
    match constant.kind {
        ConstantKind::UniformBuffer => match driver.uniform_block_index(program, &constant.name) {
            Some(block) => driver.uniform_block_binding(program, block, constant.location),
            None => log::warn!(
                "GlDevice: Uniform block '{}' not found in program {:?}",
                constant.name,
                program
            ),
        },
        ConstantKind::Sampler2d => match driver.uniform_location(program, &constant.name) {
            Some(location) => {
                driver.program_uniform_1i(program, location, constant.location as i32)
            }
            None => log::warn!(
                "GlDevice: Sampler '{}' not found in program {:?}",
                constant.name,
                program
            ),
        },
    }
}

impl<D: RenderDriver> GraphicsDevice for GlDevice<D> {
    // --- Creation ---

    fn create_clear_state(&mut self, state: &ClearState) -> Result<ResourceHandle, ResourceError> {
        self.pool.insert(
            AllocationDomain::DIRECT | AllocationDomain::DEFERRED,
            ResourceSlot::ClearState(*state),
        )
    }

    fn create_buffer(
        &mut self,
        descriptor: &BufferDescriptor<'_>,
    ) -> Result<ResourceHandle, ResourceError> {
        if descriptor.data.is_some_and(|data| data.len() > descriptor.size) {
            return Err(ResourceError::OutOfBounds);
        }
        let handle = self.pool.allocate(AllocationDomain::DIRECT)?;

        let target = descriptor.target;
        let native = self.driver.gen_buffer();
        self.driver.bind_buffer(target, native);
        self.driver
            .buffer_data(target, descriptor.size, descriptor.data, descriptor.usage);
        if target == BufferTarget::Vertex {
            self.pipeline.note_array_buffer(native);
        }

        self.pool.fill(
            handle,
            AllocationDomain::DIRECT,
            ResourceSlot::Buffer(BufferResource {
                native,
                target,
                size: descriptor.size,
            }),
        );
        log::debug!(
            "GlDevice: Created {:?} buffer {handle} ({} bytes)",
            target,
            descriptor.size
        );
        Ok(handle)
    }

    fn create_shader(
        &mut self,
        stage: ShaderStage,
        source: &[u8],
    ) -> Result<ResourceHandle, ResourceError> {
        let handle = self.pool.allocate(AllocationDomain::DIRECT)?;
        let native = self.driver.create_shader(stage);
        if let Some(text) = self.driver.compile_shader(native, source) {
            let err = ShaderError::CompilationFailed { stage, log: text };
            log::warn!("GlDevice: {err}");
            self.record_diagnostic(err);
        }
        self.pool.fill(
            handle,
            AllocationDomain::DIRECT,
            ResourceSlot::Shader(ShaderResource { native, stage }),
        );
        log::debug!("GlDevice: Created {stage:?} shader {handle}");
        Ok(handle)
    }

    fn link_shader_program(
        &mut self,
        descriptor: &ShaderLinkDescriptor<'_>,
    ) -> Result<ResourceHandle, ResourceError> {
        let vertex = self.pool.shader(descriptor.vertex_shader)?.native;
        let pixel = self.pool.shader(descriptor.pixel_shader)?.native;
        let handle = self.pool.allocate(AllocationDomain::DIRECT)?;

        let lookup = self.programs.get_or_link(
            &mut self.driver,
            (descriptor.vertex_shader, vertex),
            (descriptor.pixel_shader, pixel),
        );
        let program = self.note_program_lookup(lookup);
        for constant in descriptor.constants.iter() {
            bind_constant(&mut self.driver, program, constant);
        }

        self.pool.fill(
            handle,
            AllocationDomain::DIRECT,
            ResourceSlot::ShaderProgram(ProgramResource {
                vertex_shader: descriptor.vertex_shader,
                pixel_shader: descriptor.pixel_shader,
                program,
            }),
        );
        Ok(handle)
    }

    fn create_input_layout(
        &mut self,
        attributes: &[VertexAttributeDescriptor],
    ) -> Result<ResourceHandle, ResourceError> {
        if attributes.len() > self.settings.max_vertex_attributes as usize {
            return Err(ResourceError::OutOfBounds);
        }
        let attributes = attributes
            .iter()
            .zip(0u32..)
            .map(|(attr, location)| VertexAttribute {
                location,
                element_type: attr.element_type,
                element_count: attr.element_count,
                offset: attr.offset,
            })
            .collect();
        self.pool.insert(
            AllocationDomain::DIRECT,
            ResourceSlot::InputLayout(InputLayout {
                attributes,
                vertex_array: NativeId::NONE,
                bound_vertex_buffer: ResourceHandle::NULL,
            }),
        )
    }

    fn create_texture2d(
        &mut self,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<ResourceHandle, ResourceError> {
        let format = format::validate(descriptor)?;
        let handle = self.pool.allocate(AllocationDomain::DIRECT)?;
        let info = format::upload_texture2d(&mut self.driver, descriptor, format);
        self.pool
            .fill(handle, AllocationDomain::DIRECT, ResourceSlot::Texture(info));
        log::debug!(
            "GlDevice: Created texture {handle} ({}x{}, {} mips)",
            descriptor.width,
            descriptor.height,
            info.max_mip_level + 1
        );
        Ok(handle)
    }

    fn create_render_target(
        &mut self,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<ResourceHandle, ResourceError> {
        let format = format::validate(descriptor)?;
        let handle = self.pool.allocate(AllocationDomain::DIRECT)?;
        let texture = format::upload_texture2d(&mut self.driver, descriptor, format);

        let framebuffer = self.driver.gen_framebuffer();
        self.driver.bind_framebuffer(framebuffer);
        self.driver.framebuffer_texture(0, texture.native);
        self.driver.bind_framebuffer(NativeId::NONE);

        self.pool.fill(
            handle,
            AllocationDomain::DIRECT,
            ResourceSlot::RenderTarget(RenderTargetResource {
                framebuffer,
                texture,
            }),
        );
        log::debug!(
            "GlDevice: Created render target {handle} ({}x{})",
            descriptor.width,
            descriptor.height
        );
        Ok(handle)
    }

    fn create_sampler(
        &mut self,
        descriptor: &SamplerDescriptor,
    ) -> Result<ResourceHandle, ResourceError> {
        self.pool
            .insert(AllocationDomain::DIRECT, ResourceSlot::Sampler(*descriptor))
    }

    fn create_raster_state(
        &mut self,
        descriptor: &RasterStateDescriptor,
    ) -> Result<ResourceHandle, ResourceError> {
        self.pool.insert(
            AllocationDomain::DIRECT,
            ResourceSlot::RasterState(RasterState::from(descriptor)),
        )
    }

    fn create_blend_state(
        &mut self,
        descriptor: &BlendStateDescriptor,
    ) -> Result<ResourceHandle, ResourceError> {
        self.pool.insert(
            AllocationDomain::DIRECT,
            ResourceSlot::BlendState(descriptor.clone()),
        )
    }

    fn create_depth_stencil_state(
        &mut self,
        descriptor: &DepthStencilDescriptor,
    ) -> Result<ResourceHandle, ResourceError> {
        self.pool.insert(
            AllocationDomain::DIRECT,
            ResourceSlot::DepthStencilState(*descriptor),
        )
    }

    // --- Deferred pipeline state ---

    fn set_vertex_buffer(&mut self, buffer: ResourceHandle, stride: u32) {
        let requested = self.pipeline.requested_mut();
        requested.vertex_buffer = buffer;
        requested.vertex_buffer_stride = stride;
    }

    fn set_index_buffer(&mut self, buffer: ResourceHandle) {
        self.pipeline.requested_mut().index_buffer = buffer;
    }

    fn set_input_layout(&mut self, layout: ResourceHandle) {
        self.pipeline.requested_mut().input_layout = layout;
    }

    fn set_shader(&mut self, shader: ResourceHandle, stage: ShaderStage) {
        let requested = self.pipeline.requested_mut();
        match stage {
            ShaderStage::Vertex => requested.vertex_shader = shader,
            ShaderStage::Pixel => requested.pixel_shader = shader,
        }
    }

    fn set_raster_state(&mut self, state: ResourceHandle) {
        self.pipeline.requested_mut().raster_state = state;
    }

    // --- Immediate state ---

    fn set_blend_state(&mut self, state: ResourceHandle) -> Result<(), ResourceError> {
        let (independent, target) = if state.is_null() {
            (false, None)
        } else {
            let blend = self.pool.blend_state(state)?;
            (
                blend.independent_blend_enable,
                blend.render_targets.first().copied(),
            )
        };

        let Some(target) = target.filter(|target| target.blend_enable) else {
            self.driver.set_capability(Capability::Blend, false);
            return Ok(());
        };
        self.driver.set_capability(Capability::Blend, true);
        if independent {
            self.driver.blend_func_separate(
                target.src_blend,
                target.dest_blend,
                target.src_blend_alpha,
                target.dest_blend_alpha,
            );
            self.driver
                .blend_equation_separate(target.blend_op, target.blend_op_alpha);
        } else {
            self.driver.blend_func(target.src_blend, target.dest_blend);
            self.driver.blend_equation(target.blend_op);
        }
        Ok(())
    }

    fn set_depth_stencil_state(&mut self, state: ResourceHandle) -> Result<(), ResourceError> {
        let depth = if state.is_null() {
            DepthStencilDescriptor {
                depth_enable: false,
                depth_func: CompareFunction::Less,
                depth_write_mask: true,
            }
        } else {
            *self.pool.depth_stencil_state(state)?
        };
        self.driver
            .set_capability(Capability::DepthTest, depth.depth_enable);
        self.driver.depth_func(depth.depth_func);
        self.driver.depth_mask(depth.depth_write_mask);
        Ok(())
    }

    fn set_viewport(&mut self, viewport: &Viewport) {
        self.viewport = *viewport;
        self.driver.viewport(
            viewport.x as i32,
            viewport.y as i32,
            viewport.width as i32,
            viewport.height as i32,
        );
        self.driver.depth_range(viewport.min_depth, viewport.max_depth);
    }

    fn set_scissor_rect(&mut self, rect: &ScissorRect) {
        // Scissor rectangles are top-left origin; the driver is bottom-left.
        let top = self.viewport.height - rect.bottom;
        self.driver.scissor(
            rect.left as i32,
            top as i32,
            (rect.right - rect.left) as i32,
            (rect.bottom - rect.top) as i32,
        );
    }

    fn set_texture(
        &mut self,
        texture: ResourceHandle,
        sampler: ResourceHandle,
        slot: u32,
        _stage: ShaderStage,
    ) -> Result<(), ResourceError> {
        let texture = if texture.is_null() {
            None
        } else {
            Some(self.pool.texture_source(texture)?)
        };
        let sampler = if sampler.is_null() {
            None
        } else {
            Some(*self.pool.sampler(sampler)?)
        };
        sampler::bind_texture_unit(&mut self.driver, slot, texture, sampler.as_ref());
        Ok(())
    }

    fn set_constant_buffer(
        &mut self,
        buffer: ResourceHandle,
        slot: u32,
        _stage: ShaderStage,
    ) -> Result<(), ResourceError> {
        let native = self.resolve_buffer(buffer)?;
        self.driver
            .bind_buffer_base(BufferTarget::Uniform, slot, native);
        Ok(())
    }

    fn set_targets(
        &mut self,
        colour: ResourceHandle,
        depth: ResourceHandle,
    ) -> Result<(), ResourceError> {
        if colour.is_null() {
            self.driver.bind_framebuffer(NativeId::NONE);
        } else {
            let framebuffer = self.pool.render_target(colour)?.framebuffer;
            self.driver.bind_framebuffer(framebuffer);
            self.driver.draw_buffers(1);
        }
        if !depth.is_null() {
            log::trace!("GlDevice: Depth target {depth} ignored, render targets carry colour only");
        }
        Ok(())
    }

    fn clear(&mut self, clear_state: ResourceHandle) -> Result<(), ResourceError> {
        let state = *self.pool.clear_state(clear_state)?;
        self.driver.clear_color(state.rgba);
        self.driver.clear_depth(state.depth);
        self.driver.clear(state.flags);
        Ok(())
    }

    // --- Draw ---

    fn draw(
        &mut self,
        vertex_count: u32,
        start_vertex: u32,
        topology: PrimitiveTopology,
    ) -> Result<(), ResourceError> {
        self.reconcile()?;
        self.driver.draw_arrays(topology, start_vertex, vertex_count);
        self.stats.draw_calls += 1;
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        index_count: u32,
        start_index: u32,
        base_vertex: i32,
        topology: PrimitiveTopology,
    ) -> Result<(), ResourceError> {
        let index_buffer = self.resolve_buffer(self.pipeline.requested().index_buffer)?;
        self.reconcile()?;

        self.driver.bind_buffer(BufferTarget::Index, index_buffer);
        self.pipeline.note_index_buffer();
        let format = IndexFormat::Uint16;
        let byte_offset = start_index as usize * format.size() as usize;
        self.driver
            .draw_elements_base_vertex(topology, index_count, format, byte_offset, base_vertex);
        self.stats.draw_calls += 1;
        Ok(())
    }

    fn update_buffer(
        &mut self,
        buffer: ResourceHandle,
        data: &[u8],
        offset: usize,
    ) -> Result<(), ResourceError> {
        let resource = *self.pool.buffer(buffer)?;
        let end = offset
            .checked_add(data.len())
            .ok_or(ResourceError::OutOfBounds)?;
        if end > resource.size {
            return Err(ResourceError::OutOfBounds);
        }

        self.driver.bind_buffer(resource.target, resource.native);
        self.driver.buffer_sub_data(resource.target, offset, data);
        self.driver.bind_buffer(resource.target, NativeId::NONE);
        if resource.target == BufferTarget::Vertex {
            self.pipeline.note_array_buffer(NativeId::NONE);
        }
        Ok(())
    }

    fn present(&mut self) {
        self.driver.swap_buffers();
    }

    // --- Release ---

    fn release_clear_state(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        self.pool.remove(handle, ResourceKind::ClearState).map(drop)
    }

    fn release_buffer(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        if let ResourceSlot::Buffer(buffer) = self.pool.remove(handle, ResourceKind::Buffer)? {
            self.driver.delete_buffer(buffer.native);
            self.pipeline.note_buffer_deleted(buffer.native);
        }
        self.pipeline.forget(handle);
        Ok(())
    }

    fn release_shader(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        if let ResourceSlot::Shader(shader) = self.pool.remove(handle, ResourceKind::Shader)? {
            self.driver.delete_shader(shader.native);
        }
        let evicted = self.programs.evict_shader(&mut self.driver, handle);
        for program in self.pool.programs_using_mut(handle) {
            program.program = NativeId::NONE;
        }
        if evicted > 0 {
            log::debug!("GlDevice: Released shader {handle} and {evicted} cached programs");
        }
        self.pipeline.forget(handle);
        Ok(())
    }

    fn release_program(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        self.pool.remove(handle, ResourceKind::ShaderProgram).map(drop)
    }

    fn release_input_layout(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        let slot = self.pool.remove(handle, ResourceKind::InputLayout)?;
        if let ResourceSlot::InputLayout(layout) = slot {
            if !layout.vertex_array.is_none() {
                self.driver.delete_vertex_array(layout.vertex_array);
            }
        }
        self.pipeline.forget(handle);
        Ok(())
    }

    fn release_texture2d(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        if let ResourceSlot::Texture(texture) = self.pool.remove(handle, ResourceKind::Texture)? {
            self.driver.delete_texture(texture.native);
        }
        Ok(())
    }

    fn release_render_target(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        let slot = self.pool.remove(handle, ResourceKind::RenderTarget)?;
        if let ResourceSlot::RenderTarget(target) = slot {
            self.driver.delete_framebuffer(target.framebuffer);
            self.driver.delete_texture(target.texture.native);
        }
        Ok(())
    }

    fn release_sampler(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        self.pool.remove(handle, ResourceKind::Sampler).map(drop)
    }

    fn release_raster_state(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        self.pool.remove(handle, ResourceKind::RasterState)?;
        self.pipeline.forget(handle);
        Ok(())
    }

    fn release_blend_state(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        self.pool.remove(handle, ResourceKind::BlendState).map(drop)
    }

    fn release_depth_stencil_state(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        self.pool
            .remove(handle, ResourceKind::DepthStencilState)
            .map(drop)
    }

    // --- Queries ---

    fn create_query(&mut self, query_type: QueryType) -> Result<QueryIndex, QueryError> {
        self.queries.create(&mut self.driver, query_type)
    }

    fn set_query(&mut self, index: QueryIndex, action: QueryAction) -> Result<(), QueryError> {
        self.queries.set(&mut self.driver, index, action)
    }

    fn update_queries(&mut self) {
        self.queries.update(&mut self.driver);
    }

    fn get_last_query_result(&self, index: QueryIndex) -> Result<f64, QueryError> {
        self.queries.last_result(index)
    }

    fn release_query(&mut self, index: QueryIndex) -> Result<(), QueryError> {
        self.queries.release(&mut self.driver, index)
    }

    // --- Introspection ---

    fn shader_platform(&self) -> &'static str {
        "glsl"
    }

    fn stats(&self) -> DeviceStats {
        DeviceStats {
            live_resources: self.pool.live_count() as u64,
            ..self.stats
        }
    }
}
