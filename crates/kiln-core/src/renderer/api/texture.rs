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

//! Defines data structures related to GPU texture and sampler resources.

/// The texel format of a texture.
///
/// Not every backend supports every format. Block-compressed formats can be
/// described here but a backend may reject them at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8-bit BGRA, normalized.
    Bgra8Unorm,
    /// 8-bit RGBA, normalized.
    Rgba8Unorm,
    /// BC1 (DXT1) block compression.
    Bc1Unorm,
    /// BC2 (DXT3) block compression.
    Bc2Unorm,
    /// BC3 (DXT5) block compression.
    Bc3Unorm,
    /// BC4 single-channel block compression.
    Bc4Unorm,
    /// BC5 two-channel block compression.
    Bc5Unorm,
}

impl TextureFormat {
    /// Returns `true` for block-compressed formats.
    pub const fn is_block_compressed(&self) -> bool {
        !matches!(self, TextureFormat::Bgra8Unorm | TextureFormat::Rgba8Unorm)
    }
}

/// A descriptor used to create a 2D texture or a render target.
///
/// `data` holds every mip level back to back, largest first. The size of one
/// level is `(width * height / pixels_per_block) * block_size` bytes; for
/// uncompressed formats `pixels_per_block` is 1 and `block_size` the texel size.
#[derive(Debug, Clone, Copy)]
pub struct TextureDescriptor<'a> {
    /// The texel format.
    pub format: TextureFormat,
    /// Width of mip level 0 in texels.
    pub width: u32,
    /// Height of mip level 0 in texels.
    pub height: u32,
    /// Number of mip levels provided (at least 1).
    pub mip_level_count: u32,
    /// Bytes per block.
    pub block_size: u32,
    /// Texels per block.
    pub pixels_per_block: u32,
    /// Optional initial contents for the whole mip chain.
    pub data: Option<&'a [u8]>,
}

/// The filter combination applied when sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Linear minification, magnification and mip interpolation.
    #[default]
    MinMagMipLinear,
    /// Nearest-texel sampling from the nearest mip.
    MinMagMipPoint,
    /// Linear filtering without mip interpolation.
    Linear,
    /// Nearest-texel filtering without mip interpolation.
    Point,
}

/// Defines how texture coordinates outside `[0, 1]` are resolved.
///
/// Passed to the driver unchanged, one value per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressMode {
    /// Coordinates wrap around.
    #[default]
    Repeat,
    /// Coordinates wrap around, mirroring at each integer boundary.
    MirrorRepeat,
    /// Coordinates are clamped to the edge texel.
    ClampToEdge,
    /// Coordinates outside the range sample the border colour.
    ClampToBorder,
}

/// A sampler parameter block.
///
/// A LOD clamp of exactly [`SamplerDescriptor::LOD_UNSET`] leaves the driver default
/// in place; any greater value is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerDescriptor {
    /// Filter combination.
    pub filter: FilterMode,
    /// Address mode for the U axis.
    pub address_u: AddressMode,
    /// Address mode for the V axis.
    pub address_v: AddressMode,
    /// Address mode for the W axis.
    pub address_w: AddressMode,
    /// Bias added to the computed mip level. Always applied.
    pub mip_lod_bias: f32,
    /// Lowest mip level that may be sampled, or [`Self::LOD_UNSET`].
    pub min_lod: f32,
    /// Highest mip level that may be sampled, or [`Self::LOD_UNSET`].
    pub max_lod: f32,
}

impl SamplerDescriptor {
    /// Sentinel meaning "use the driver default" for LOD clamps.
    pub const LOD_UNSET: f32 = -1.0;

    /// Returns the minimum LOD clamp if one was supplied.
    pub fn min_lod_clamp(&self) -> Option<f32> {
        (self.min_lod > Self::LOD_UNSET).then_some(self.min_lod)
    }

    /// Returns the maximum LOD clamp if one was supplied.
    pub fn max_lod_clamp(&self) -> Option<f32> {
        (self.max_lod > Self::LOD_UNSET).then_some(self.max_lod)
    }
}

impl Default for SamplerDescriptor {
    fn default() -> Self {
        Self {
            filter: FilterMode::MinMagMipLinear,
            address_u: AddressMode::Repeat,
            address_v: AddressMode::Repeat,
            address_w: AddressMode::Repeat,
            mip_lod_bias: 0.0,
            min_lod: Self::LOD_UNSET,
            max_lod: Self::LOD_UNSET,
        }
    }
}
