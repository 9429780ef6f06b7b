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

//! Defines data structures related to GPU buffer resources.

/// The binding point a buffer is created for and updated through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data.
    Vertex,
    /// 16-bit index data.
    Index,
    /// Shader constants bound by integer slot.
    Uniform,
}

/// A hint describing how often the buffer contents change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    #[default]
    Static,
    /// Rewritten occasionally.
    Dynamic,
    /// Rewritten every frame.
    Stream,
}

/// The element format of index buffers. Only 16-bit indices are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// Unsigned 16-bit indices.
    #[default]
    Uint16,
}

impl IndexFormat {
    /// Size of one index in bytes.
    pub const fn size(&self) -> u32 {
        match self {
            IndexFormat::Uint16 => 2,
        }
    }
}

/// A descriptor used to create a buffer.
///
/// The initial contents are copied by the driver during creation; the caller's
/// slice is not retained.
#[derive(Debug, Clone, Copy)]
pub struct BufferDescriptor<'a> {
    /// The binding point the buffer is created for.
    pub target: BufferTarget,
    /// How often the contents are expected to change.
    pub usage: BufferUsage,
    /// The total size of the buffer in bytes.
    pub size: usize,
    /// Optional initial contents; must not be longer than `size`.
    pub data: Option<&'a [u8]>,
}

impl<'a> BufferDescriptor<'a> {
    /// Describes a static buffer initialised from `data`, sized to fit it.
    pub fn with_data(target: BufferTarget, data: &'a [u8]) -> Self {
        Self {
            target,
            usage: BufferUsage::Static,
            size: data.len(),
            data: Some(data),
        }
    }
}
