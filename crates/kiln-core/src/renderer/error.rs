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

//! Error types for the renderer.

use crate::renderer::api::{QueryIndex, ResourceHandle, ResourceKind, ShaderStage, TextureFormat};
use std::fmt;

/// Diagnostics reported by the driver while building shaders.
///
/// Compile and link problems never abort resource creation: the driver's text is
/// logged and the (possibly unusable) native object is kept. This type carries
/// that text to the log sink and to callers that inspect it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// A shader stage reported diagnostics while compiling.
    CompilationFailed {
        /// The stage being compiled.
        stage: ShaderStage,
        /// The driver's info log.
        log: String,
    },
    /// A program reported diagnostics while linking.
    LinkFailed {
        /// The vertex shader handle of the pair.
        vertex_shader: ResourceHandle,
        /// The pixel shader handle of the pair.
        pixel_shader: ResourceHandle,
        /// The driver's info log.
        log: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompilationFailed { stage, log } => {
                write!(f, "Shader compilation reported diagnostics ({stage:?}): {log}")
            }
            ShaderError::LinkFailed {
                vertex_shader,
                pixel_shader,
                log,
            } => {
                write!(
                    f,
                    "Program link reported diagnostics for ({vertex_shader}, {pixel_shader}): {log}"
                )
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// Errors raised while creating, accessing or releasing table resources.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// No slot is free in the requested allocation domain.
    Exhausted {
        /// Name of the table that ran out.
        pool: &'static str,
        /// Number of slots in the table.
        capacity: usize,
    },
    /// The handle is outside the table or refers to the reserved null slot.
    InvalidHandle(ResourceHandle),
    /// The slot holds a different kind of resource than the caller expected.
    KindMismatch {
        /// The handle being accessed.
        handle: ResourceHandle,
        /// The kind the caller asked for.
        expected: ResourceKind,
        /// The kind actually stored.
        found: ResourceKind,
    },
    /// The backend cannot represent this texture format.
    UnsupportedFormat(TextureFormat),
    /// An access went past the end of a buffer or a data block.
    OutOfBounds,
    /// A shader-specific error occurred.
    Shader(ShaderError),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Exhausted { pool, capacity } => {
                write!(f, "The {pool} table is exhausted ({capacity} slots).")
            }
            ResourceError::InvalidHandle(handle) => {
                write!(f, "Invalid resource handle {handle}.")
            }
            ResourceError::KindMismatch {
                handle,
                expected,
                found,
            } => {
                write!(f, "Resource {handle} is a {found}, expected a {expected}.")
            }
            ResourceError::UnsupportedFormat(format) => {
                write!(f, "Texture format {format:?} is not supported by this backend.")
            }
            ResourceError::OutOfBounds => write!(f, "Resource access out of bounds."),
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

/// Errors raised by the query table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Every index is already held in the requested domain.
    Exhausted {
        /// Number of slots in the query table.
        capacity: usize,
    },
    /// The index is outside the query table.
    InvalidIndex(QueryIndex),
    /// The index is not currently allocated.
    NotAllocated(QueryIndex),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Exhausted { capacity } => {
                write!(f, "The query table is exhausted ({capacity} slots).")
            }
            QueryError::InvalidIndex(index) => write!(f, "Invalid {index}."),
            QueryError::NotAllocated(index) => write!(f, "The {index} is not allocated."),
        }
    }
}

impl std::error::Error for QueryError {}

/// Top-level renderer errors.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The renderer settings failed validation or parsing.
    InvalidSettings(String),
    /// A resource operation failed.
    Resource(ResourceError),
    /// A query operation failed.
    Query(QueryError),
    /// The render thread could not be reached.
    Dispatch(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidSettings(msg) => write!(f, "Invalid renderer settings: {msg}"),
            RenderError::Resource(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::Query(err) => write!(f, "Query operation failed: {err}"),
            RenderError::Dispatch(msg) => write!(f, "Render thread dispatch failed: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Resource(err) => Some(err),
            RenderError::Query(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::Resource(err)
    }
}

impl From<QueryError> for RenderError {
    fn from(err: QueryError) -> Self {
        RenderError::Query(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn exhausted_error_display() {
        let err = ResourceError::Exhausted {
            pool: "resource",
            capacity: 8,
        };
        assert_eq!(format!("{err}"), "The resource table is exhausted (8 slots).");
    }

    #[test]
    fn kind_mismatch_display() {
        let err = ResourceError::KindMismatch {
            handle: ResourceHandle(5),
            expected: ResourceKind::Sampler,
            found: ResourceKind::Buffer,
        };
        assert_eq!(format!("{err}"), "Resource #5 is a buffer, expected a sampler.");
    }

    #[test]
    fn render_error_wraps_resource_error() {
        let shader_err = ShaderError::CompilationFailed {
            stage: ShaderStage::Pixel,
            log: "0:1 syntax error".to_string(),
        };
        let res_err: ResourceError = shader_err.into();
        let render_err: RenderError = res_err.into();
        assert_eq!(
            format!("{render_err}"),
            "Graphics resource operation failed: Shader resource error: Shader compilation reported diagnostics (Pixel): 0:1 syntax error"
        );
        assert!(render_err.source().is_some());
        assert!(render_err.source().unwrap().source().is_some());
    }

    #[test]
    fn query_error_converts() {
        let err: RenderError = QueryError::Exhausted { capacity: 64 }.into();
        assert_eq!(
            format!("{err}"),
            "Query operation failed: The query table is exhausted (64 slots)."
        );
    }
}
