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

//! Shader stages and link-time constant bindings.

use super::handle::ResourceHandle;
use std::borrow::Cow;

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// The vertex stage.
    Vertex,
    /// The pixel (fragment) stage.
    Pixel,
}

/// What a named shader constant refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantKind {
    /// A uniform block, bound to a uniform-buffer binding point.
    UniformBuffer,
    /// A 2D sampler, bound to a texture unit.
    Sampler2d,
}

/// Maps a named constant in a linked program to a binding slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantBinding<'a> {
    /// The name of the constant as declared in the shader source.
    pub name: Cow<'a, str>,
    /// What the constant refers to.
    pub kind: ConstantKind,
    /// The binding point or texture unit to assign.
    pub location: u32,
}

/// A descriptor used to link a vertex and a pixel shader into one program.
#[derive(Debug, Clone)]
pub struct ShaderLinkDescriptor<'a> {
    /// Handle of a shader created with [`ShaderStage::Vertex`].
    pub vertex_shader: ResourceHandle,
    /// Handle of a shader created with [`ShaderStage::Pixel`].
    pub pixel_shader: ResourceHandle,
    /// Constant bindings applied once after linking.
    pub constants: Cow<'a, [ConstantBinding<'a>]>,
}
