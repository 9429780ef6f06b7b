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

//! Binding textures to units and applying sampler blocks.

use kiln_core::renderer::{
    FilterMode, MagFilter, MinFilter, NativeId, RenderDriver, SamplerDescriptor, TextureParameter,
};

use super::pool::TextureInfo;

/// Maps a filter combination to the driver's minification and magnification filters.
pub(crate) fn filter_pair(filter: FilterMode) -> (MinFilter, MagFilter) {
    match filter {
        FilterMode::MinMagMipLinear => (MinFilter::LinearMipmapLinear, MagFilter::Linear),
        FilterMode::MinMagMipPoint => (MinFilter::NearestMipmapNearest, MagFilter::Nearest),
        FilterMode::Linear => (MinFilter::Linear, MagFilter::Linear),
        FilterMode::Point => (MinFilter::Nearest, MagFilter::Nearest),
    }
}

/// Binds `texture` to unit `slot` and writes `sampler` into it.
///
/// The texture's own mip clamp is written on every bind. A `None` texture
/// unbinds the unit; a `None` sampler leaves the other parameters as they are.
pub(crate) fn bind_texture_unit<D: RenderDriver>(
    driver: &mut D,
    slot: u32,
    texture: Option<TextureInfo>,
    sampler: Option<&SamplerDescriptor>,
) {
    driver.active_texture(slot);
    let Some(texture) = texture else {
        driver.bind_texture(NativeId::NONE);
        return;
    };
    driver.bind_texture(texture.native);
    driver.tex_parameter(TextureParameter::MaxLevel(texture.max_mip_level));

    let Some(sampler) = sampler else {
        return;
    };
    let (min, mag) = filter_pair(sampler.filter);
    driver.tex_parameter(TextureParameter::MinFilter(min));
    driver.tex_parameter(TextureParameter::MagFilter(mag));
    driver.tex_parameter(TextureParameter::WrapS(sampler.address_u));
    driver.tex_parameter(TextureParameter::WrapT(sampler.address_v));
    driver.tex_parameter(TextureParameter::WrapR(sampler.address_w));
    driver.tex_parameter(TextureParameter::LodBias(sampler.mip_lod_bias));
    if let Some(min_lod) = sampler.min_lod_clamp() {
        driver.tex_parameter(TextureParameter::MinLod(min_lod));
    }
    if let Some(max_lod) = sampler.max_lod_clamp() {
        driver.tex_parameter(TextureParameter::MaxLod(max_lod));
    }
}

#[cfg(test)]
mod tests {
    use kiln_core::renderer::AddressMode;

    use super::*;
    use crate::graphics::recording::{DriverCall, RecordingDriver};

    const TEXTURE: TextureInfo = TextureInfo {
        native: NativeId(9),
        max_mip_level: 0,
    };

    fn max_lod_calls(driver: &RecordingDriver) -> usize {
        driver.count(|c| matches!(c, DriverCall::TexParameter(TextureParameter::MaxLod(_))))
    }

    #[test]
    fn point_filter_is_nearest() {
        assert_eq!(filter_pair(FilterMode::Point), (MinFilter::Nearest, MagFilter::Nearest));
        assert_eq!(
            filter_pair(FilterMode::MinMagMipLinear),
            (MinFilter::LinearMipmapLinear, MagFilter::Linear)
        );
    }

    #[test]
    fn unset_lod_clamp_is_skipped() {
        let mut driver = RecordingDriver::new();
        let sampler = SamplerDescriptor::default();
        bind_texture_unit(&mut driver, 0, Some(TEXTURE), Some(&sampler));
        assert_eq!(max_lod_calls(&driver), 0);

        driver.clear_calls();
        let clamped = SamplerDescriptor {
            max_lod: 4.0,
            ..SamplerDescriptor::default()
        };
        bind_texture_unit(&mut driver, 0, Some(TEXTURE), Some(&clamped));
        assert_eq!(
            driver.count(|c| *c == DriverCall::TexParameter(TextureParameter::MaxLod(4.0))),
            1
        );
        assert_eq!(max_lod_calls(&driver), 1);
    }

    #[test]
    fn mip_clamp_follows_bind_without_sampler() {
        let mut driver = RecordingDriver::new();
        let texture = TextureInfo {
            native: NativeId(3),
            max_mip_level: 2,
        };
        bind_texture_unit(&mut driver, 0, Some(texture), None);
        assert_eq!(
            driver.calls(),
            &[
                DriverCall::ActiveTexture(0),
                DriverCall::BindTexture(NativeId(3)),
                DriverCall::TexParameter(TextureParameter::MaxLevel(2)),
            ]
        );

        driver.clear_calls();
        bind_texture_unit(&mut driver, 0, Some(texture), Some(&SamplerDescriptor::default()));
        let calls = driver.calls();
        assert_eq!(calls[2], DriverCall::TexParameter(TextureParameter::MaxLevel(2)));
        assert_eq!(
            driver.count(|c| matches!(c, DriverCall::TexParameter(TextureParameter::MaxLevel(_)))),
            1
        );
    }

    #[test]
    fn address_modes_pass_through() {
        let mut driver = RecordingDriver::new();
        let sampler = SamplerDescriptor {
            address_u: AddressMode::ClampToEdge,
            address_v: AddressMode::MirrorRepeat,
            ..SamplerDescriptor::default()
        };
        bind_texture_unit(&mut driver, 2, Some(TEXTURE), Some(&sampler));
        let calls = driver.calls();
        assert_eq!(calls[0], DriverCall::ActiveTexture(2));
        assert_eq!(calls[1], DriverCall::BindTexture(NativeId(9)));
        assert!(calls.contains(&DriverCall::TexParameter(TextureParameter::WrapS(
            AddressMode::ClampToEdge
        ))));
        assert!(calls.contains(&DriverCall::TexParameter(TextureParameter::WrapT(
            AddressMode::MirrorRepeat
        ))));
    }

    #[test]
    fn missing_texture_unbinds_unit() {
        let mut driver = RecordingDriver::new();
        bind_texture_unit(&mut driver, 1, None, Some(&SamplerDescriptor::default()));
        assert_eq!(
            driver.calls(),
            &[DriverCall::ActiveTexture(1), DriverCall::BindTexture(NativeId::NONE)]
        );
    }
}
