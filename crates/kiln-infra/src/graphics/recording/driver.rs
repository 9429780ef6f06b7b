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

use std::collections::{HashMap, VecDeque};

use kiln_core::renderer::{
    BlendFactor, BlendOperation, BufferTarget, BufferUsage, Capability, ClearFlags,
    CompareFunction, CullMode, ElementType, FillMode, FrontFace, IndexFormat, NativeId,
    NativeTextureFormat, PrimitiveTopology, QueryTarget, RenderDriver, ShaderStage,
    TextureParameter,
};

/// One recorded driver call. Calls that create an object carry the id they returned.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum DriverCall {
    MakeCurrent,
    SwapBuffers,

    GenBuffer(NativeId),
    BindBuffer(BufferTarget, NativeId),
    BufferData {
        target: BufferTarget,
        size: usize,
        data: Option<Vec<u8>>,
        usage: BufferUsage,
    },
    BufferSubData {
        target: BufferTarget,
        offset: usize,
        data: Vec<u8>,
    },
    BindBufferBase {
        target: BufferTarget,
        index: u32,
        buffer: NativeId,
    },
    DeleteBuffer(NativeId),

    CreateShader(ShaderStage, NativeId),
    CompileShader(NativeId, Vec<u8>),
    DeleteShader(NativeId),
    CreateProgram(NativeId),
    AttachShader {
        program: NativeId,
        shader: NativeId,
    },
    LinkProgram(NativeId),
    UseProgram(NativeId),
    DeleteProgram(NativeId),
    UniformBlockIndex {
        program: NativeId,
        name: String,
    },
    UniformBlockBinding {
        program: NativeId,
        block_index: u32,
        binding: u32,
    },
    UniformLocation {
        program: NativeId,
        name: String,
    },
    ProgramUniform1i {
        program: NativeId,
        location: i32,
        value: i32,
    },

    GenVertexArray(NativeId),
    BindVertexArray(NativeId),
    VertexAttribPointer {
        location: u32,
        components: u32,
        element_type: ElementType,
        normalized: bool,
        stride: u32,
        offset: u32,
    },
    EnableVertexAttribArray(u32),
    DisableVertexAttribArray(u32),
    DeleteVertexArray(NativeId),

    SetCapability(Capability, bool),
    FrontFace(FrontFace),
    CullFace(CullMode),
    PolygonMode(FillMode),
    BlendFunc(BlendFactor, BlendFactor),
    BlendFuncSeparate {
        src: BlendFactor,
        dst: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    },
    BlendEquation(BlendOperation),
    BlendEquationSeparate(BlendOperation, BlendOperation),
    DepthFunc(CompareFunction),
    DepthMask(bool),
    Viewport {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    DepthRange(f32, f32),
    Scissor {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    ClearColor([f32; 4]),
    ClearDepth(f32),
    Clear(ClearFlags),

    GenTexture(NativeId),
    ActiveTexture(u32),
    BindTexture(NativeId),
    TexImage2d {
        level: u32,
        format: NativeTextureFormat,
        width: u32,
        height: u32,
        data: Option<Vec<u8>>,
    },
    TexParameter(TextureParameter),
    DeleteTexture(NativeId),

    GenFramebuffer(NativeId),
    BindFramebuffer(NativeId),
    FramebufferTexture {
        attachment: u32,
        texture: NativeId,
    },
    DrawBuffers(u32),
    DeleteFramebuffer(NativeId),

    DrawArrays {
        topology: PrimitiveTopology,
        first: u32,
        count: u32,
    },
    DrawElementsBaseVertex {
        topology: PrimitiveTopology,
        count: u32,
        format: IndexFormat,
        byte_offset: usize,
        base_vertex: i32,
    },

    GenQuery(NativeId),
    BeginQuery(QueryTarget, NativeId),
    EndQuery(QueryTarget),
    QueryCounter(NativeId),
    QueryResult(NativeId),
    DeleteQuery(NativeId),
}

/// A [`RenderDriver`] that records every call.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    calls: Vec<DriverCall>,
    next_id: u32,
    compile_logs: VecDeque<String>,
    link_logs: VecDeque<String>,
    uniform_blocks: HashMap<String, u32>,
    uniform_locations: HashMap<String, i32>,
    query_results: HashMap<NativeId, u64>,
}

impl RecordingDriver {
    /// Creates a driver with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call recorded since creation or the last clear.
    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    /// Returns the recorded calls and empties the log.
    pub fn take_calls(&mut self) -> Vec<DriverCall> {
        std::mem::take(&mut self.calls)
    }

    /// Empties the log.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&DriverCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    /// Makes the next `compile_shader` report `log`.
    pub fn fail_next_compile(&mut self, log: impl Into<String>) {
        self.compile_logs.push_back(log.into());
    }

    /// Makes the next `link_program` report `log`.
    pub fn fail_next_link(&mut self, log: impl Into<String>) {
        self.link_logs.push_back(log.into());
    }

    /// Declares a uniform block `name` at `index` in every program.
    pub fn set_uniform_block(&mut self, name: impl Into<String>, index: u32) {
        self.uniform_blocks.insert(name.into(), index);
    }

    /// Declares a uniform `name` at `location` in every program.
    pub fn set_uniform_location(&mut self, name: impl Into<String>, location: i32) {
        self.uniform_locations.insert(name.into(), location);
    }

    /// Makes `query` report `value` once polled.
    pub fn set_query_result(&mut self, query: NativeId, value: u64) {
        self.query_results.insert(query, value);
    }

    fn next(&mut self) -> NativeId {
        self.next_id += 1;
        NativeId(self.next_id)
    }

    fn generate(&mut self, record: impl FnOnce(NativeId) -> DriverCall) -> NativeId {
        let id = self.next();
        self.calls.push(record(id));
        id
    }
}

impl RenderDriver for RecordingDriver {
    fn make_current(&mut self) {
        self.calls.push(DriverCall::MakeCurrent);
    }

    fn swap_buffers(&mut self) {
        self.calls.push(DriverCall::SwapBuffers);
    }

    // --- Buffers ---

    fn gen_buffer(&mut self) -> NativeId {
        self.generate(DriverCall::GenBuffer)
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: NativeId) {
        self.calls.push(DriverCall::BindBuffer(target, buffer));
    }

    fn buffer_data(
        &mut self,
        target: BufferTarget,
        size: usize,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) {
        self.calls.push(DriverCall::BufferData {
            target,
            size,
            data: data.map(<[u8]>::to_vec),
            usage,
        });
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) {
        self.calls.push(DriverCall::BufferSubData {
            target,
            offset,
            data: data.to_vec(),
        });
    }

    fn bind_buffer_base(&mut self, target: BufferTarget, index: u32, buffer: NativeId) {
        self.calls.push(DriverCall::BindBufferBase {
            target,
            index,
            buffer,
        });
    }

    fn delete_buffer(&mut self, buffer: NativeId) {
        self.calls.push(DriverCall::DeleteBuffer(buffer));
    }

    // --- Shaders and programs ---

    fn create_shader(&mut self, stage: ShaderStage) -> NativeId {
        self.generate(|id| DriverCall::CreateShader(stage, id))
    }

    fn compile_shader(&mut self, shader: NativeId, source: &[u8]) -> Option<String> {
        self.calls.push(DriverCall::CompileShader(shader, source.to_vec()));
        self.compile_logs.pop_front()
    }

    fn delete_shader(&mut self, shader: NativeId) {
        self.calls.push(DriverCall::DeleteShader(shader));
    }

    fn create_program(&mut self) -> NativeId {
        self.generate(DriverCall::CreateProgram)
    }

    fn attach_shader(&mut self, program: NativeId, shader: NativeId) {
        self.calls.push(DriverCall::AttachShader { program, shader });
    }

    fn link_program(&mut self, program: NativeId) -> Option<String> {
        self.calls.push(DriverCall::LinkProgram(program));
        self.link_logs.pop_front()
    }

    fn use_program(&mut self, program: NativeId) {
        self.calls.push(DriverCall::UseProgram(program));
    }

    fn delete_program(&mut self, program: NativeId) {
        self.calls.push(DriverCall::DeleteProgram(program));
    }

    fn uniform_block_index(&mut self, program: NativeId, name: &str) -> Option<u32> {
        self.calls.push(DriverCall::UniformBlockIndex {
            program,
            name: name.to_owned(),
        });
        self.uniform_blocks.get(name).copied()
    }

    fn uniform_block_binding(&mut self, program: NativeId, block_index: u32, binding: u32) {
        self.calls.push(DriverCall::UniformBlockBinding {
            program,
            block_index,
            binding,
        });
    }

    fn uniform_location(&mut self, program: NativeId, name: &str) -> Option<i32> {
        self.calls.push(DriverCall::UniformLocation {
            program,
            name: name.to_owned(),
        });
        self.uniform_locations.get(name).copied()
    }

    fn program_uniform_1i(&mut self, program: NativeId, location: i32, value: i32) {
        self.calls.push(DriverCall::ProgramUniform1i {
            program,
            location,
            value,
        });
    }

    // --- Vertex arrays ---

    fn gen_vertex_array(&mut self) -> NativeId {
        self.generate(DriverCall::GenVertexArray)
    }

    fn bind_vertex_array(&mut self, vertex_array: NativeId) {
        self.calls.push(DriverCall::BindVertexArray(vertex_array));
    }

    fn vertex_attrib_pointer(
        &mut self,
        location: u32,
        components: u32,
        element_type: ElementType,
        normalized: bool,
        stride: u32,
        offset: u32,
    ) {
        self.calls.push(DriverCall::VertexAttribPointer {
            location,
            components,
            element_type,
            normalized,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&mut self, location: u32) {
        self.calls.push(DriverCall::EnableVertexAttribArray(location));
    }

    fn disable_vertex_attrib_array(&mut self, location: u32) {
        self.calls.push(DriverCall::DisableVertexAttribArray(location));
    }

    fn delete_vertex_array(&mut self, vertex_array: NativeId) {
        self.calls.push(DriverCall::DeleteVertexArray(vertex_array));
    }

    // --- Fixed-function state ---

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        self.calls.push(DriverCall::SetCapability(capability, enabled));
    }

    fn front_face(&mut self, front_face: FrontFace) {
        self.calls.push(DriverCall::FrontFace(front_face));
    }

    fn cull_face(&mut self, mode: CullMode) {
        self.calls.push(DriverCall::CullFace(mode));
    }

    fn polygon_mode(&mut self, mode: FillMode) {
        self.calls.push(DriverCall::PolygonMode(mode));
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.calls.push(DriverCall::BlendFunc(src, dst));
    }

    fn blend_func_separate(
        &mut self,
        src: BlendFactor,
        dst: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    ) {
        self.calls.push(DriverCall::BlendFuncSeparate {
            src,
            dst,
            src_alpha,
            dst_alpha,
        });
    }

    fn blend_equation(&mut self, op: BlendOperation) {
        self.calls.push(DriverCall::BlendEquation(op));
    }

    fn blend_equation_separate(&mut self, op: BlendOperation, op_alpha: BlendOperation) {
        self.calls.push(DriverCall::BlendEquationSeparate(op, op_alpha));
    }

    fn depth_func(&mut self, func: CompareFunction) {
        self.calls.push(DriverCall::DepthFunc(func));
    }

    fn depth_mask(&mut self, write: bool) {
        self.calls.push(DriverCall::DepthMask(write));
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.calls.push(DriverCall::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn depth_range(&mut self, near: f32, far: f32) {
        self.calls.push(DriverCall::DepthRange(near, far));
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.calls.push(DriverCall::Scissor {
            x,
            y,
            width,
            height,
        });
    }

    fn clear_color(&mut self, rgba: [f32; 4]) {
        self.calls.push(DriverCall::ClearColor(rgba));
    }

    fn clear_depth(&mut self, depth: f32) {
        self.calls.push(DriverCall::ClearDepth(depth));
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.calls.push(DriverCall::Clear(flags));
    }

    // --- Textures ---

    fn gen_texture(&mut self) -> NativeId {
        self.generate(DriverCall::GenTexture)
    }

    fn active_texture(&mut self, unit: u32) {
        self.calls.push(DriverCall::ActiveTexture(unit));
    }

    fn bind_texture(&mut self, texture: NativeId) {
        self.calls.push(DriverCall::BindTexture(texture));
    }

    fn tex_image_2d(
        &mut self,
        level: u32,
        format: NativeTextureFormat,
        width: u32,
        height: u32,
        data: Option<&[u8]>,
    ) {
        self.calls.push(DriverCall::TexImage2d {
            level,
            format,
            width,
            height,
            data: data.map(<[u8]>::to_vec),
        });
    }

    fn tex_parameter(&mut self, parameter: TextureParameter) {
        self.calls.push(DriverCall::TexParameter(parameter));
    }

    fn delete_texture(&mut self, texture: NativeId) {
        self.calls.push(DriverCall::DeleteTexture(texture));
    }

    // --- Framebuffers ---

    fn gen_framebuffer(&mut self) -> NativeId {
        self.generate(DriverCall::GenFramebuffer)
    }

    fn bind_framebuffer(&mut self, framebuffer: NativeId) {
        self.calls.push(DriverCall::BindFramebuffer(framebuffer));
    }

    fn framebuffer_texture(&mut self, attachment: u32, texture: NativeId) {
        self.calls.push(DriverCall::FramebufferTexture {
            attachment,
            texture,
        });
    }

    fn draw_buffers(&mut self, count: u32) {
        self.calls.push(DriverCall::DrawBuffers(count));
    }

    fn delete_framebuffer(&mut self, framebuffer: NativeId) {
        self.calls.push(DriverCall::DeleteFramebuffer(framebuffer));
    }

    // --- Draws ---

    fn draw_arrays(&mut self, topology: PrimitiveTopology, first: u32, count: u32) {
        self.calls.push(DriverCall::DrawArrays {
            topology,
            first,
            count,
        });
    }

    fn draw_elements_base_vertex(
        &mut self,
        topology: PrimitiveTopology,
        count: u32,
        format: IndexFormat,
        byte_offset: usize,
        base_vertex: i32,
    ) {
        self.calls.push(DriverCall::DrawElementsBaseVertex {
            topology,
            count,
            format,
            byte_offset,
            base_vertex,
        });
    }

    // --- Queries ---

    fn gen_query(&mut self) -> NativeId {
        self.generate(DriverCall::GenQuery)
    }

    fn begin_query(&mut self, target: QueryTarget, query: NativeId) {
        self.calls.push(DriverCall::BeginQuery(target, query));
    }

    fn end_query(&mut self, target: QueryTarget) {
        self.calls.push(DriverCall::EndQuery(target));
    }

    fn query_counter(&mut self, query: NativeId) {
        self.calls.push(DriverCall::QueryCounter(query));
    }

    fn query_result(&mut self, query: NativeId) -> Option<u64> {
        self.calls.push(DriverCall::QueryResult(query));
        self.query_results.get(&query).copied()
    }

    fn delete_query(&mut self, query: NativeId) {
        self.calls.push(DriverCall::DeleteQuery(query));
    }
}
