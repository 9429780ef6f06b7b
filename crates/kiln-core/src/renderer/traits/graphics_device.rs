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

use crate::renderer::api::*;
use crate::renderer::error::{QueryError, ResourceError};

/// The driver-agnostic operation surface of a rendering backend.
///
/// Resources are referred to by [`ResourceHandle`]s into a fixed table owned by
/// the device. Creation calls never return [`ResourceHandle::NULL`]; every setter
/// accepts it as "unbind". Pipeline setters only record the requested state;
/// the backend reconciles it with what the driver was last told immediately
/// before each draw.
///
/// A device is owned by the thread that owns the native context and is not
/// synchronised. Other threads hand work over through a command queue.
pub trait GraphicsDevice {
    // --- Creation ---

    /// Creates a clear-state block.
    /// ## Arguments
    /// * `state` - The colour, depth and flags to store. Copied by value.
    /// ## Returns
    /// The handle of the new slot.
    /// ## Errors
    /// * `ResourceError::Exhausted` - If the resource table is full.
    fn create_clear_state(&mut self, state: &ClearState) -> Result<ResourceHandle, ResourceError>;

    /// Creates a buffer and uploads its initial contents.
    /// ## Errors
    /// * `ResourceError::OutOfBounds` - If the initial data is larger than the buffer.
    fn create_buffer(
        &mut self,
        descriptor: &BufferDescriptor<'_>,
    ) -> Result<ResourceHandle, ResourceError>;

    /// Creates and compiles a shader stage.
    ///
    /// Compile diagnostics are logged, never returned: the handle is valid even if
    /// the driver rejected the source.
    fn create_shader(
        &mut self,
        stage: ShaderStage,
        bytecode: &[u8],
    ) -> Result<ResourceHandle, ResourceError>;

    /// Links a vertex and a pixel shader and applies the constant bindings.
    ///
    /// Linking the same pair twice reuses the cached native program.
    fn link_shader_program(
        &mut self,
        descriptor: &ShaderLinkDescriptor<'_>,
    ) -> Result<ResourceHandle, ResourceError>;

    /// Creates an input layout. Attribute `i` is read from shader location `i`.
    fn create_input_layout(
        &mut self,
        attributes: &[VertexAttributeDescriptor],
    ) -> Result<ResourceHandle, ResourceError>;

    /// Creates a sampled 2D texture and uploads its mip chain.
    /// ## Errors
    /// * `ResourceError::UnsupportedFormat` - If the backend cannot store `descriptor.format`.
    /// * `ResourceError::OutOfBounds` - If `descriptor.data` is shorter than the mip chain.
    fn create_texture2d(
        &mut self,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<ResourceHandle, ResourceError>;

    /// Creates a render target: a framebuffer with a colour texture attached.
    fn create_render_target(
        &mut self,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<ResourceHandle, ResourceError>;

    /// Creates a sampler parameter block.
    fn create_sampler(
        &mut self,
        descriptor: &SamplerDescriptor,
    ) -> Result<ResourceHandle, ResourceError>;

    /// Creates a raster state block.
    fn create_raster_state(
        &mut self,
        descriptor: &RasterStateDescriptor,
    ) -> Result<ResourceHandle, ResourceError>;

    /// Creates a blend state block. The render-target list is copied.
    fn create_blend_state(
        &mut self,
        descriptor: &BlendStateDescriptor,
    ) -> Result<ResourceHandle, ResourceError>;

    /// Creates a depth-stencil state block.
    fn create_depth_stencil_state(
        &mut self,
        descriptor: &DepthStencilDescriptor,
    ) -> Result<ResourceHandle, ResourceError>;

    // --- Deferred pipeline state ---

    /// Requests a vertex buffer and its stride for the next draw.
    fn set_vertex_buffer(&mut self, buffer: ResourceHandle, stride: u32);
    /// Requests an index buffer for the next indexed draw. Indices are 16-bit.
    fn set_index_buffer(&mut self, buffer: ResourceHandle);
    /// Requests an input layout for the next draw.
    fn set_input_layout(&mut self, layout: ResourceHandle);
    /// Requests a shader for `stage` for the next draw.
    fn set_shader(&mut self, shader: ResourceHandle, stage: ShaderStage);
    /// Requests a raster state for the next draw.
    fn set_raster_state(&mut self, state: ResourceHandle);

    // --- Immediate state ---

    /// Applies a blend state.
    fn set_blend_state(&mut self, state: ResourceHandle) -> Result<(), ResourceError>;
    /// Applies a depth-stencil state.
    fn set_depth_stencil_state(&mut self, state: ResourceHandle) -> Result<(), ResourceError>;
    /// Sets the viewport and remembers it for scissor conversion.
    fn set_viewport(&mut self, viewport: &Viewport);
    /// Sets the scissor rectangle, given in top-left origin coordinates.
    fn set_scissor_rect(&mut self, rect: &ScissorRect);
    /// Binds a texture (or a render target's texture) and applies a sampler to unit `slot`.
    fn set_texture(
        &mut self,
        texture: ResourceHandle,
        sampler: ResourceHandle,
        slot: u32,
        stage: ShaderStage,
    ) -> Result<(), ResourceError>;
    /// Binds a buffer to uniform binding point `slot`.
    fn set_constant_buffer(
        &mut self,
        buffer: ResourceHandle,
        slot: u32,
        stage: ShaderStage,
    ) -> Result<(), ResourceError>;
    /// Binds a render target for drawing. A null colour target selects the back buffer.
    fn set_targets(
        &mut self,
        colour: ResourceHandle,
        depth: ResourceHandle,
    ) -> Result<(), ResourceError>;
    /// Clears the bound targets with a clear-state block.
    fn clear(&mut self, clear_state: ResourceHandle) -> Result<(), ResourceError>;

    // --- Draw ---

    /// Reconciles pipeline state and draws non-indexed geometry.
    fn draw(
        &mut self,
        vertex_count: u32,
        start_vertex: u32,
        topology: PrimitiveTopology,
    ) -> Result<(), ResourceError>;
    /// Reconciles pipeline state, re-binds the index buffer and draws indexed geometry.
    fn draw_indexed(
        &mut self,
        index_count: u32,
        start_index: u32,
        base_vertex: i32,
        topology: PrimitiveTopology,
    ) -> Result<(), ResourceError>;
    /// Writes `data` into a buffer at byte `offset`.
    fn update_buffer(
        &mut self,
        buffer: ResourceHandle,
        data: &[u8],
        offset: usize,
    ) -> Result<(), ResourceError>;
    /// Presents the back buffer.
    fn present(&mut self);

    // --- Release ---
    //
    // Each release frees the slot and anything it owns. Releasing a handle of the
    // wrong kind, or one already released, is reported as an error.

    #[allow(missing_docs)]
    fn release_clear_state(&mut self, handle: ResourceHandle) -> Result<(), ResourceError>;
    #[allow(missing_docs)]
    fn release_buffer(&mut self, handle: ResourceHandle) -> Result<(), ResourceError>;
    #[allow(missing_docs)]
    fn release_shader(&mut self, handle: ResourceHandle) -> Result<(), ResourceError>;
    /// Frees the program slot. The linked native program stays in the link cache.
    fn release_program(&mut self, handle: ResourceHandle) -> Result<(), ResourceError>;
    #[allow(missing_docs)]
    fn release_input_layout(&mut self, handle: ResourceHandle) -> Result<(), ResourceError>;
    #[allow(missing_docs)]
    fn release_texture2d(&mut self, handle: ResourceHandle) -> Result<(), ResourceError>;
    #[allow(missing_docs)]
    fn release_render_target(&mut self, handle: ResourceHandle) -> Result<(), ResourceError>;
    #[allow(missing_docs)]
    fn release_sampler(&mut self, handle: ResourceHandle) -> Result<(), ResourceError>;
    #[allow(missing_docs)]
    fn release_raster_state(&mut self, handle: ResourceHandle) -> Result<(), ResourceError>;
    #[allow(missing_docs)]
    fn release_blend_state(&mut self, handle: ResourceHandle) -> Result<(), ResourceError>;
    #[allow(missing_docs)]
    fn release_depth_stencil_state(&mut self, handle: ResourceHandle)
        -> Result<(), ResourceError>;

    // --- Queries ---

    /// Allocates a query slot in the domain of `query_type`.
    /// ## Errors
    /// * `QueryError::Exhausted` - If every index is held in that domain.
    fn create_query(&mut self, query_type: QueryType) -> Result<QueryIndex, QueryError>;
    /// Begins or ends a query.
    fn set_query(&mut self, index: QueryIndex, action: QueryAction) -> Result<(), QueryError>;
    /// Polls issued queries and stores completed results.
    fn update_queries(&mut self);
    /// Returns the last stored result of a query.
    fn get_last_query_result(&self, index: QueryIndex) -> Result<f64, QueryError>;
    /// Deletes the native queries and frees the slot in its domain.
    fn release_query(&mut self, index: QueryIndex) -> Result<(), QueryError>;

    // --- Introspection ---

    /// The shading language this backend consumes, e.g. `"glsl"`.
    fn shader_platform(&self) -> &'static str;
    /// Counters accumulated since creation.
    fn stats(&self) -> DeviceStats;
}
