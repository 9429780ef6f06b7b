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

//! Resource handles, allocation domains and native object ids.

use crate::kiln_bitflags;
use std::fmt;

/// An index into a device's resource table.
///
/// Handles are weak references: the table owns every slot and a handle carries no
/// ownership. Index `0` is reserved at startup and never handed out, so
/// [`ResourceHandle::NULL`] can be used by every setter to mean "unbind".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ResourceHandle(pub u32);

impl ResourceHandle {
    /// The reserved null handle.
    pub const NULL: Self = Self(0);

    /// Returns `true` for the reserved null handle.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Returns the table index this handle refers to.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

kiln_bitflags! {
    /// Allocation bits stored per table slot.
    ///
    /// Several disjoint allocation policies can share one index space: an index is
    /// free for a domain as long as none of that domain's bits are set, regardless of
    /// what other domains hold it.
    pub struct AllocationDomain: u8 {
        /// Resources created directly on the thread that owns the driver context.
        const DIRECT = 1 << 0;
        /// Indices reserved ahead of time by a deferred command front-end.
        const DEFERRED = 1 << 1;
        /// Every bit; used to pin the null slot.
        const ALL = 0xff;
    }
}

/// The identifier of an object living inside the native graphics driver.
///
/// `0` means "no object", matching the convention of GL-style drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NativeId(pub u32);

impl NativeId {
    /// No native object.
    pub const NONE: Self = Self(0);

    /// Returns `true` if this id does not name a native object.
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// The payload kind stored in a resource slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// The slot holds nothing.
    Empty,
    /// A clear colour/depth/flags block.
    ClearState,
    /// A vertex attribute layout.
    InputLayout,
    /// A rasterizer state block.
    RasterState,
    /// A depth/stencil state block.
    DepthStencilState,
    /// A blend state block.
    BlendState,
    /// A vertex, index or uniform buffer.
    Buffer,
    /// A compiled shader stage.
    Shader,
    /// A sampled 2D texture.
    Texture,
    /// A framebuffer with an attached colour texture.
    RenderTarget,
    /// A sampler parameter block.
    Sampler,
    /// A linked vertex + pixel shader program.
    ShaderProgram,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Empty => "empty",
            ResourceKind::ClearState => "clear state",
            ResourceKind::InputLayout => "input layout",
            ResourceKind::RasterState => "raster state",
            ResourceKind::DepthStencilState => "depth-stencil state",
            ResourceKind::BlendState => "blend state",
            ResourceKind::Buffer => "buffer",
            ResourceKind::Shader => "shader",
            ResourceKind::Texture => "texture",
            ResourceKind::RenderTarget => "render target",
            ResourceKind::Sampler => "sampler",
            ResourceKind::ShaderProgram => "shader program",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_handle_is_index_zero() {
        assert!(ResourceHandle::NULL.is_null());
        assert_eq!(ResourceHandle::NULL.index(), 0);
        assert!(!ResourceHandle(3).is_null());
        assert_eq!(format!("{}", ResourceHandle(3)), "#3");
    }

    #[test]
    fn domains_are_disjoint() {
        assert!(!AllocationDomain::DIRECT.intersects(AllocationDomain::DEFERRED));
        assert!(AllocationDomain::ALL.contains(AllocationDomain::DIRECT | AllocationDomain::DEFERRED));
    }
}
