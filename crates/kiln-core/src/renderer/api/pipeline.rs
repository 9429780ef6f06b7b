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

//! Vertex layout description and primitive topology.

/// The scalar type of one vertex attribute component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 32-bit float.
    Float32,
    /// 16-bit float.
    Float16,
    /// Unsigned 8-bit integer. Read as normalized `[0, 1]`.
    Uint8,
    /// Signed 8-bit integer.
    Sint8,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Signed 16-bit integer.
    Sint16,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Signed 32-bit integer.
    Sint32,
}

impl ElementType {
    /// Returns the size in bytes of one component.
    pub const fn size(&self) -> u32 {
        match self {
            ElementType::Uint8 | ElementType::Sint8 => 1,
            ElementType::Float16 | ElementType::Uint16 | ElementType::Sint16 => 2,
            ElementType::Float32 | ElementType::Uint32 | ElementType::Sint32 => 4,
        }
    }

    /// Whether the driver should normalize this type when reading it.
    ///
    /// Only unsigned bytes (packed colours) are normalized.
    pub const fn is_normalized(&self) -> bool {
        matches!(self, ElementType::Uint8)
    }
}

/// Describes one vertex attribute of an input layout.
///
/// Attributes are assigned shader locations by their position in the layout.
/// The stride is not part of the layout: it comes from the vertex buffer binding
/// and is only known at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttributeDescriptor {
    /// The scalar type of each component.
    pub element_type: ElementType,
    /// Number of components (1 to 4).
    pub element_count: u32,
    /// Byte offset of the attribute from the start of a vertex.
    pub offset: u32,
}

/// How vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    /// Isolated points.
    PointList,
    /// Every two vertices form a line.
    LineList,
    /// A connected line strip.
    LineStrip,
    /// Every three vertices form a triangle.
    TriangleList,
    /// A connected triangle strip.
    TriangleStrip,
}
