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

//! Translation from the backend-independent types to Metal enums.

use metal::{
    MTLCPUCacheMode, MTLCompareFunction, MTLPixelFormat, MTLResourceOptions,
    MTLSamplerAddressMode, MTLSamplerBorderColor, MTLSamplerMinMagFilter, MTLSamplerMipFilter,
    MTLStorageMode, MTLTextureType, MTLTextureUsage,
};
use vanta_core::rhi::api::{
    ComparisonFunc, Format, MemoryType, TextureAddressingMode, TextureDescriptor,
    TextureDimension, TextureFilteringMode,
};
use vanta_core::RhiError;

/// Maps a format to `MTLPixelFormat`.
///
/// Metal has no 4-bit BGRA and no 96-bit three-channel formats; those map to
/// `Unsupported`. The two typeless stencil-read aliases share the pixel
/// format of the depth-stencil resource they view.
pub(crate) fn format_to_mtl(format: Format) -> Result<MTLPixelFormat, RhiError> {
    let mtl = match format {
        Format::R8Uint => MTLPixelFormat::R8Uint,
        Format::R8Sint => MTLPixelFormat::R8Sint,
        Format::R8Unorm => MTLPixelFormat::R8Unorm,
        Format::R8Snorm => MTLPixelFormat::R8Snorm,

        Format::Rg8Uint => MTLPixelFormat::RG8Uint,
        Format::Rg8Sint => MTLPixelFormat::RG8Sint,
        Format::Rg8Unorm => MTLPixelFormat::RG8Unorm,
        Format::Rg8Snorm => MTLPixelFormat::RG8Snorm,

        Format::R16Uint => MTLPixelFormat::R16Uint,
        Format::R16Sint => MTLPixelFormat::R16Sint,
        Format::R16Unorm => MTLPixelFormat::R16Unorm,
        Format::R16Snorm => MTLPixelFormat::R16Snorm,
        Format::R16Float => MTLPixelFormat::R16Float,

        Format::B5G6R5Unorm => MTLPixelFormat::B5G6R5Unorm,
        Format::B5G5R5A1Unorm => MTLPixelFormat::BGR5A1Unorm,

        Format::Rgba8Uint => MTLPixelFormat::RGBA8Uint,
        Format::Rgba8Sint => MTLPixelFormat::RGBA8Sint,
        Format::Rgba8Unorm => MTLPixelFormat::RGBA8Unorm,
        Format::Rgba8Snorm => MTLPixelFormat::RGBA8Snorm,

        Format::Bgra8Unorm => MTLPixelFormat::BGRA8Unorm,
        Format::Rgba8UnormSrgb => MTLPixelFormat::RGBA8Unorm_sRGB,
        Format::Bgra8UnormSrgb => MTLPixelFormat::BGRA8Unorm_sRGB,

        Format::R10G10B10A2Unorm => MTLPixelFormat::RGB10A2Unorm,
        Format::R11G11B10Float => MTLPixelFormat::RG11B10Float,

        Format::Rg16Uint => MTLPixelFormat::RG16Uint,
        Format::Rg16Sint => MTLPixelFormat::RG16Sint,
        Format::Rg16Unorm => MTLPixelFormat::RG16Unorm,
        Format::Rg16Snorm => MTLPixelFormat::RG16Snorm,
        Format::Rg16Float => MTLPixelFormat::RG16Float,

        Format::R32Uint => MTLPixelFormat::R32Uint,
        Format::R32Sint => MTLPixelFormat::R32Sint,
        Format::R32Float => MTLPixelFormat::R32Float,

        Format::Rgba16Uint => MTLPixelFormat::RGBA16Uint,
        Format::Rgba16Sint => MTLPixelFormat::RGBA16Sint,
        Format::Rgba16Unorm => MTLPixelFormat::RGBA16Unorm,
        Format::Rgba16Snorm => MTLPixelFormat::RGBA16Snorm,
        Format::Rgba16Float => MTLPixelFormat::RGBA16Float,

        Format::Rg32Uint => MTLPixelFormat::RG32Uint,
        Format::Rg32Sint => MTLPixelFormat::RG32Sint,
        Format::Rg32Float => MTLPixelFormat::RG32Float,

        Format::Rgba32Uint => MTLPixelFormat::RGBA32Uint,
        Format::Rgba32Sint => MTLPixelFormat::RGBA32Sint,
        Format::Rgba32Float => MTLPixelFormat::RGBA32Float,

        Format::D16Unorm => MTLPixelFormat::Depth16Unorm,
        Format::D24UnormS8Uint => MTLPixelFormat::Depth24Unorm_Stencil8,
        Format::X24TypelessG8Uint => MTLPixelFormat::Depth24Unorm_Stencil8,
        Format::D32Float => MTLPixelFormat::Depth32Float,
        Format::D32FloatS8Uint => MTLPixelFormat::Depth32Float_Stencil8,
        Format::X32TypelessG8Uint => MTLPixelFormat::Depth32Float_Stencil8,

        Format::Bc1Unorm => MTLPixelFormat::BC1_RGBA,
        Format::Bc1UnormSrgb => MTLPixelFormat::BC1_RGBA_sRGB,
        Format::Bc2Unorm => MTLPixelFormat::BC2_RGBA,
        Format::Bc2UnormSrgb => MTLPixelFormat::BC2_RGBA_sRGB,
        Format::Bc3Unorm => MTLPixelFormat::BC3_RGBA,
        Format::Bc3UnormSrgb => MTLPixelFormat::BC3_RGBA_sRGB,
        Format::Bc4Unorm => MTLPixelFormat::BC4_RUnorm,
        Format::Bc4Snorm => MTLPixelFormat::BC4_RSnorm,
        Format::Bc5Unorm => MTLPixelFormat::BC5_RGUnorm,
        Format::Bc5Snorm => MTLPixelFormat::BC5_RGSnorm,
        Format::Bc6HUfloat => MTLPixelFormat::BC6H_RGBUfloat,
        Format::Bc6HSfloat => MTLPixelFormat::BC6H_RGBFloat,
        Format::Bc7Unorm => MTLPixelFormat::BC7_RGBAUnorm,
        Format::Bc7UnormSrgb => MTLPixelFormat::BC7_RGBAUnorm_sRGB,

        Format::Unknown | Format::Bgra4Unorm | Format::Rgb32Uint | Format::Rgb32Sint
        | Format::Rgb32Float => {
            return Err(RhiError::Unsupported(format!(
                "format {format} has no Metal pixel format"
            )))
        }
    };
    Ok(mtl)
}

pub(crate) fn resource_options(memory_type: MemoryType) -> MTLResourceOptions {
    match memory_type {
        MemoryType::DeviceLocal => MTLResourceOptions::StorageModePrivate,
        MemoryType::Upload => {
            MTLResourceOptions::StorageModeShared | MTLResourceOptions::CPUCacheModeWriteCombined
        }
        MemoryType::ReadBack => MTLResourceOptions::StorageModeShared,
    }
}

pub(crate) fn storage_mode(memory_type: MemoryType) -> MTLStorageMode {
    match memory_type {
        MemoryType::DeviceLocal => MTLStorageMode::Private,
        MemoryType::Upload | MemoryType::ReadBack => MTLStorageMode::Shared,
    }
}

pub(crate) fn cpu_cache_mode(memory_type: MemoryType) -> MTLCPUCacheMode {
    match memory_type {
        MemoryType::Upload => MTLCPUCacheMode::WriteCombined,
        MemoryType::DeviceLocal | MemoryType::ReadBack => MTLCPUCacheMode::DefaultCache,
    }
}

pub(crate) fn texture_type(dimension: TextureDimension) -> Result<MTLTextureType, RhiError> {
    let ty = match dimension {
        TextureDimension::Texture1D => MTLTextureType::D1,
        TextureDimension::Texture1DArray => MTLTextureType::D1Array,
        TextureDimension::Texture2D => MTLTextureType::D2,
        TextureDimension::Texture2DArray => MTLTextureType::D2Array,
        TextureDimension::TextureCube => MTLTextureType::Cube,
        TextureDimension::TextureCubeArray => MTLTextureType::CubeArray,
        TextureDimension::Texture2DMs => MTLTextureType::D2Multisample,
        TextureDimension::Texture3D => MTLTextureType::D3,
        TextureDimension::Texture2DMsArray => {
            return Err(RhiError::Unsupported(
                "multisampled texture arrays are unavailable on Metal".to_string(),
            ))
        }
        TextureDimension::Unknown => {
            return Err(RhiError::InvalidDescriptor(
                "texture dimension must be known".to_string(),
            ))
        }
    };
    Ok(ty)
}

pub(crate) fn texture_usage(desc: &TextureDescriptor) -> MTLTextureUsage {
    let mut usage = MTLTextureUsage::empty();
    if desc.is_shader_resource {
        usage |= MTLTextureUsage::ShaderRead;
    }
    if desc.is_render_target {
        usage |= MTLTextureUsage::RenderTarget;
    }
    if desc.is_uav {
        usage |= MTLTextureUsage::ShaderRead | MTLTextureUsage::ShaderWrite;
    }
    if desc.is_typeless {
        usage |= MTLTextureUsage::PixelFormatView;
    }
    usage
}

pub(crate) fn min_mag_filter(mode: TextureFilteringMode) -> MTLSamplerMinMagFilter {
    match mode {
        TextureFilteringMode::Nearest => MTLSamplerMinMagFilter::Nearest,
        TextureFilteringMode::Linear => MTLSamplerMinMagFilter::Linear,
    }
}

pub(crate) fn mip_filter(mode: TextureFilteringMode) -> MTLSamplerMipFilter {
    match mode {
        TextureFilteringMode::Nearest => MTLSamplerMipFilter::Nearest,
        TextureFilteringMode::Linear => MTLSamplerMipFilter::Linear,
    }
}

pub(crate) fn address_mode(mode: TextureAddressingMode) -> MTLSamplerAddressMode {
    match mode {
        TextureAddressingMode::Wrap => MTLSamplerAddressMode::Repeat,
        TextureAddressingMode::ClampToEdge => MTLSamplerAddressMode::ClampToEdge,
        TextureAddressingMode::ClampToBorder => MTLSamplerAddressMode::ClampToBorderColor,
        TextureAddressingMode::MirrorRepeat => MTLSamplerAddressMode::MirrorRepeat,
        TextureAddressingMode::MirrorOnce => MTLSamplerAddressMode::MirrorClampToEdge,
    }
}

pub(crate) fn compare_function(func: ComparisonFunc) -> MTLCompareFunction {
    match func {
        ComparisonFunc::Never => MTLCompareFunction::Never,
        ComparisonFunc::Less => MTLCompareFunction::Less,
        ComparisonFunc::Equal => MTLCompareFunction::Equal,
        ComparisonFunc::LessEqual => MTLCompareFunction::LessEqual,
        ComparisonFunc::Greater => MTLCompareFunction::Greater,
        ComparisonFunc::NotEqual => MTLCompareFunction::NotEqual,
        ComparisonFunc::GreaterEqual => MTLCompareFunction::GreaterEqual,
        ComparisonFunc::Always => MTLCompareFunction::Always,
    }
}

/// Metal samplers take a border color enum, not an arbitrary color. Pick
/// the closest of the three by alpha first, then luminance.
pub(crate) fn border_color(color: [f32; 4]) -> MTLSamplerBorderColor {
    if color[3] < 0.5 {
        MTLSamplerBorderColor::TransparentBlack
    } else if 0.299 * color[0] + 0.587 * color[1] + 0.114 * color[2] < 0.5 {
        MTLSamplerBorderColor::OpaqueBlack
    } else {
        MTLSamplerBorderColor::OpaqueWhite
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_channel_formats_have_no_metal_equivalent() {
        assert!(format_to_mtl(Format::Rgb32Float).is_err());
        assert!(format_to_mtl(Format::Rgba32Float).is_ok());
    }

    #[test]
    fn typeless_aliases_share_depth_formats() {
        assert_eq!(
            format_to_mtl(Format::X24TypelessG8Uint).ok(),
            format_to_mtl(Format::D24UnormS8Uint).ok()
        );
    }

    #[test]
    fn upload_memory_is_shared_write_combined() {
        let options = resource_options(MemoryType::Upload);
        assert!(options.contains(MTLResourceOptions::StorageModeShared));
        assert!(options.contains(MTLResourceOptions::CPUCacheModeWriteCombined));
    }
}
