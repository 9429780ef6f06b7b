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

//! The native driver capability consumed by state-caching backends.
//!
//! [`RenderDriver`] is deliberately narrow and GL-shaped: one method per native
//! call, typed arguments instead of raw enums, and no state of its own that the
//! backend relies on. Backends keep their caches on top of it, which lets the
//! whole reconciliation algorithm run against a recording driver in tests.

use crate::renderer::api::{
    AddressMode, BlendFactor, BlendOperation, BufferTarget, BufferUsage, ClearFlags,
    CompareFunction, CullMode, ElementType, FillMode, IndexFormat, NativeId, PrimitiveTopology,
    ShaderStage,
};

/// A fixed-function switch toggled with [`RenderDriver::set_capability`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Capability {
    CullFace,
    DepthClamp,
    ScissorTest,
    DepthTest,
    Blend,
}

/// Winding order of front-facing triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontFace {
    /// Clockwise.
    Cw,
    /// Counter-clockwise.
    Ccw,
}

/// Native minification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum MinFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapLinear,
}

/// Native magnification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum MagFilter {
    Nearest,
    Linear,
}

/// One texture parameter write on the currently bound 2D texture.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub enum TextureParameter {
    MaxLevel(u32),
    MinFilter(MinFilter),
    MagFilter(MagFilter),
    WrapS(AddressMode),
    WrapT(AddressMode),
    WrapR(AddressMode),
    LodBias(f32),
    MinLod(f32),
    MaxLod(f32),
}

/// Sized storage format of a native texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum InternalFormat {
    Rgba8,
}

/// Channel order of uploaded pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum PixelFormat {
    Rgba,
    Bgra,
}

/// Component type of uploaded pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum PixelType {
    UnsignedByte,
}

/// How a texture is stored and how its upload data is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeTextureFormat {
    /// Storage format.
    pub internal_format: InternalFormat,
    /// Upload channel order.
    pub pixel_format: PixelFormat,
    /// Upload component type.
    pub pixel_type: PixelType,
}

/// What a native query object measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum QueryTarget {
    TimeElapsed,
    Timestamp,
    PrimitivesWritten,
}

/// The native graphics driver, as seen by a state-caching backend.
///
/// Every method maps to one native call. Methods that create objects return a
/// non-zero [`NativeId`]. Methods that may produce diagnostic text (compile and
/// link) return it instead of failing; the caller decides what to do with it.
///
/// Implementations are only ever called from the thread that owns the native
/// context, so they take `&mut self` and need not be `Sync`.
pub trait RenderDriver {
    // --- Context ---

    /// Makes the driver's context current on the calling thread.
    fn make_current(&mut self);
    /// Presents the back buffer.
    fn swap_buffers(&mut self);

    // --- Buffers ---

    /// Creates a buffer object.
    fn gen_buffer(&mut self) -> NativeId;
    /// Binds `buffer` to `target`. [`NativeId::NONE`] unbinds.
    fn bind_buffer(&mut self, target: BufferTarget, buffer: NativeId);
    /// Allocates storage for the buffer bound to `target`, optionally filling it.
    fn buffer_data(&mut self, target: BufferTarget, size: usize, data: Option<&[u8]>, usage: BufferUsage);
    /// Writes `data` at `offset` into the buffer bound to `target`.
    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]);
    /// Binds `buffer` to the indexed binding point `index` of `target`.
    fn bind_buffer_base(&mut self, target: BufferTarget, index: u32, buffer: NativeId);
    /// Deletes a buffer object.
    fn delete_buffer(&mut self, buffer: NativeId);

    // --- Shaders and programs ---

    /// Creates an empty shader object for `stage`.
    fn create_shader(&mut self, stage: ShaderStage) -> NativeId;
    /// Uploads source and compiles. Returns the info log if the driver produced one.
    fn compile_shader(&mut self, shader: NativeId, source: &[u8]) -> Option<String>;
    /// Deletes a shader object.
    fn delete_shader(&mut self, shader: NativeId);
    /// Creates an empty program object.
    fn create_program(&mut self) -> NativeId;
    /// Attaches a compiled shader to a program.
    fn attach_shader(&mut self, program: NativeId, shader: NativeId);
    /// Links a program. Returns the info log if the driver produced one.
    fn link_program(&mut self, program: NativeId) -> Option<String>;
    /// Makes `program` current. [`NativeId::NONE`] unbinds.
    fn use_program(&mut self, program: NativeId);
    /// Deletes a program object.
    fn delete_program(&mut self, program: NativeId);
    /// Looks up a uniform block by name.
    fn uniform_block_index(&mut self, program: NativeId, name: &str) -> Option<u32>;
    /// Assigns a uniform block to a uniform-buffer binding point.
    fn uniform_block_binding(&mut self, program: NativeId, block_index: u32, binding: u32);
    /// Looks up a uniform by name.
    fn uniform_location(&mut self, program: NativeId, name: &str) -> Option<i32>;
    /// Sets an integer uniform on `program` without binding it.
    fn program_uniform_1i(&mut self, program: NativeId, location: i32, value: i32);

    // --- Vertex arrays ---

    /// Creates a vertex array object.
    fn gen_vertex_array(&mut self) -> NativeId;
    /// Binds a vertex array object.
    fn bind_vertex_array(&mut self, vertex_array: NativeId);
    /// Describes one attribute against the buffer currently bound to [`BufferTarget::Vertex`].
    fn vertex_attrib_pointer(
        &mut self,
        location: u32,
        components: u32,
        element_type: ElementType,
        normalized: bool,
        stride: u32,
        offset: u32,
    );
    /// Enables reading from attribute `location`.
    fn enable_vertex_attrib_array(&mut self, location: u32);
    /// Disables reading from attribute `location`.
    fn disable_vertex_attrib_array(&mut self, location: u32);
    /// Deletes a vertex array object.
    fn delete_vertex_array(&mut self, vertex_array: NativeId);

    // --- Fixed-function state ---

    /// Enables or disables a fixed-function capability.
    fn set_capability(&mut self, capability: Capability, enabled: bool);
    /// Sets the front-face winding.
    fn front_face(&mut self, front_face: FrontFace);
    /// Selects the faces discarded when culling is enabled.
    fn cull_face(&mut self, mode: CullMode);
    /// Sets the polygon fill mode for both faces.
    fn polygon_mode(&mut self, mode: FillMode);
    #[allow(missing_docs)]
    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor);
    #[allow(missing_docs)]
    fn blend_func_separate(
        &mut self,
        src: BlendFactor,
        dst: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    );
    #[allow(missing_docs)]
    fn blend_equation(&mut self, op: BlendOperation);
    #[allow(missing_docs)]
    fn blend_equation_separate(&mut self, op: BlendOperation, op_alpha: BlendOperation);
    #[allow(missing_docs)]
    fn depth_func(&mut self, func: CompareFunction);
    #[allow(missing_docs)]
    fn depth_mask(&mut self, write: bool);
    /// Sets the viewport rectangle in bottom-left origin pixels.
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    #[allow(missing_docs)]
    fn depth_range(&mut self, near: f32, far: f32);
    /// Sets the scissor rectangle in bottom-left origin pixels.
    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32);
    #[allow(missing_docs)]
    fn clear_color(&mut self, rgba: [f32; 4]);
    #[allow(missing_docs)]
    fn clear_depth(&mut self, depth: f32);
    /// Clears the buffers named by `flags` of the bound framebuffer.
    fn clear(&mut self, flags: ClearFlags);

    // --- Textures ---

    /// Creates a texture object.
    fn gen_texture(&mut self) -> NativeId;
    /// Selects the texture unit subsequent texture calls affect.
    fn active_texture(&mut self, unit: u32);
    /// Binds a 2D texture to the active unit.
    fn bind_texture(&mut self, texture: NativeId);
    /// Uploads one mip level of the bound 2D texture.
    fn tex_image_2d(
        &mut self,
        level: u32,
        format: NativeTextureFormat,
        width: u32,
        height: u32,
        data: Option<&[u8]>,
    );
    /// Writes one parameter of the bound 2D texture.
    fn tex_parameter(&mut self, parameter: TextureParameter);
    /// Deletes a texture object.
    fn delete_texture(&mut self, texture: NativeId);

    // --- Framebuffers ---

    /// Creates a framebuffer object.
    fn gen_framebuffer(&mut self) -> NativeId;
    /// Binds a framebuffer. [`NativeId::NONE`] binds the default framebuffer.
    fn bind_framebuffer(&mut self, framebuffer: NativeId);
    /// Attaches `texture` as colour attachment `attachment` of the bound framebuffer.
    fn framebuffer_texture(&mut self, attachment: u32, texture: NativeId);
    /// Enables the first `count` colour attachments for drawing.
    fn draw_buffers(&mut self, count: u32);
    /// Deletes a framebuffer object.
    fn delete_framebuffer(&mut self, framebuffer: NativeId);

    // --- Draws ---

    /// Draws `count` vertices starting at `first`.
    fn draw_arrays(&mut self, topology: PrimitiveTopology, first: u32, count: u32);
    /// Draws `count` indices starting at `byte_offset` in the bound index buffer.
    fn draw_elements_base_vertex(
        &mut self,
        topology: PrimitiveTopology,
        count: u32,
        format: IndexFormat,
        byte_offset: usize,
        base_vertex: i32,
    );

    // --- Queries ---

    /// Creates a query object.
    fn gen_query(&mut self) -> NativeId;
    /// Starts measuring into `query`.
    fn begin_query(&mut self, target: QueryTarget, query: NativeId);
    /// Stops the active query of `target`.
    fn end_query(&mut self, target: QueryTarget);
    /// Records the GPU timestamp into `query` once prior commands complete.
    fn query_counter(&mut self, query: NativeId);
    /// Returns the result of `query` if the GPU has produced it.
    fn query_result(&mut self, query: NativeId) -> Option<u64>;
    /// Deletes a query object.
    fn delete_query(&mut self, query: NativeId);
}
