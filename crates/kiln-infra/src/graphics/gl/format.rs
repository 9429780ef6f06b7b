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

//! Texture format translation and mip-chain upload.

use kiln_core::renderer::{
    InternalFormat, NativeId, NativeTextureFormat, PixelFormat, PixelType, RenderDriver,
    ResourceError, TextureDescriptor, TextureFormat, TextureParameter,
};

use super::pool::TextureInfo;

/// Size in bytes of one mip level of `width` x `height` texels.
///
/// A partially covered block still occupies a whole block.
pub fn calc_mip_level_size(
    width: u32,
    height: u32,
    block_size: u32,
    pixels_per_block: u32,
) -> usize {
    let texels = width as usize * height as usize;
    let blocks = texels.div_ceil(pixels_per_block.max(1) as usize).max(1);
    blocks * block_size as usize
}

/// Size in bytes of the whole mip chain described by `desc`.
pub fn mip_chain_size(desc: &TextureDescriptor<'_>) -> usize {
    (0..desc.mip_level_count.max(1))
        .map(|level| {
            let (width, height) = mip_dimensions(desc.width, desc.height, level);
            calc_mip_level_size(width, height, desc.block_size, desc.pixels_per_block)
        })
        .sum()
}

fn mip_dimensions(width: u32, height: u32, level: u32) -> (u32, u32) {
    let shift = level.min(31);
    ((width >> shift).max(1), (height >> shift).max(1))
}

/// Maps a texture format to the driver's internal format, pixel format and pixel type.
///
/// # Errors
/// * `ResourceError::UnsupportedFormat` - For every format other than the two
///   8-bit four-channel layouts.
pub(crate) fn native_format(format: TextureFormat) -> Result<NativeTextureFormat, ResourceError> {
    let pixel_format = match format {
        TextureFormat::Rgba8Unorm => PixelFormat::Rgba,
        TextureFormat::Bgra8Unorm => PixelFormat::Bgra,
        other => return Err(ResourceError::UnsupportedFormat(other)),
    };
    Ok(NativeTextureFormat {
        internal_format: InternalFormat::Rgba8,
        pixel_format,
        pixel_type: PixelType::UnsignedByte,
    })
}

/// Checks that `desc` can be uploaded and returns its native format.
///
/// # Errors
/// * `ResourceError::UnsupportedFormat` - If the format has no native mapping.
/// * `ResourceError::OutOfBounds` - If `desc.data` is shorter than the mip chain.
pub(crate) fn validate(desc: &TextureDescriptor<'_>) -> Result<NativeTextureFormat, ResourceError> {
    let format = native_format(desc.format)?;
    if let Some(data) = desc.data {
        if data.len() < mip_chain_size(desc) {
            return Err(ResourceError::OutOfBounds);
        }
    }
    Ok(format)
}

/// Creates a native texture and uploads every mip level of `desc`.
///
/// `desc` must have passed [`validate`].
pub(crate) fn upload_texture2d<D: RenderDriver>(
    driver: &mut D,
    desc: &TextureDescriptor<'_>,
    format: NativeTextureFormat,
) -> TextureInfo {
    let levels = desc.mip_level_count.max(1);
    let native = driver.gen_texture();
    driver.bind_texture(native);
    driver.tex_parameter(TextureParameter::MaxLevel(levels - 1));

    let mut offset = 0;
    for level in 0..levels {
        let (width, height) = mip_dimensions(desc.width, desc.height, level);
        let size = calc_mip_level_size(width, height, desc.block_size, desc.pixels_per_block);
        let pixels = desc.data.and_then(|data| data.get(offset..offset + size));
        driver.tex_image_2d(level, format, width, height, pixels);
        offset += size;
    }

    driver.bind_texture(NativeId::NONE);
    TextureInfo {
        native,
        max_mip_level: levels - 1,
    }
}
