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

//! Translation between the portable API types and Vulkan equivalents.

use ash::vk;
use vanta_core::rhi::api::{
    BufferDescriptor, ComparisonFunc, Format, MemoryType, ResourceStates, TextureAddressingMode,
    TextureDescriptor, TextureDimension, TextureFilteringMode,
};

pub(crate) fn format_to_vk(format: Format) -> vk::Format {
    match format {
        Format::Unknown => vk::Format::UNDEFINED,

        Format::R8Uint => vk::Format::R8_UINT,
        Format::R8Sint => vk::Format::R8_SINT,
        Format::R8Unorm => vk::Format::R8_UNORM,
        Format::R8Snorm => vk::Format::R8_SNORM,

        Format::Rg8Uint => vk::Format::R8G8_UINT,
        Format::Rg8Sint => vk::Format::R8G8_SINT,
        Format::Rg8Unorm => vk::Format::R8G8_UNORM,
        Format::Rg8Snorm => vk::Format::R8G8_SNORM,

        Format::R16Uint => vk::Format::R16_UINT,
        Format::R16Sint => vk::Format::R16_SINT,
        Format::R16Unorm => vk::Format::R16_UNORM,
        Format::R16Snorm => vk::Format::R16_SNORM,
        Format::R16Float => vk::Format::R16_SFLOAT,

        Format::Bgra4Unorm => vk::Format::B4G4R4A4_UNORM_PACK16,
        Format::B5G6R5Unorm => vk::Format::B5G6R5_UNORM_PACK16,
        Format::B5G5R5A1Unorm => vk::Format::B5G5R5A1_UNORM_PACK16,

        Format::Rgba8Uint => vk::Format::R8G8B8A8_UINT,
        Format::Rgba8Sint => vk::Format::R8G8B8A8_SINT,
        Format::Rgba8Unorm => vk::Format::R8G8B8A8_UNORM,
        Format::Rgba8Snorm => vk::Format::R8G8B8A8_SNORM,

        Format::Bgra8Unorm => vk::Format::B8G8R8A8_UNORM,
        Format::Rgba8UnormSrgb => vk::Format::R8G8B8A8_SRGB,
        Format::Bgra8UnormSrgb => vk::Format::B8G8R8A8_SRGB,

        Format::R10G10B10A2Unorm => vk::Format::A2B10G10R10_UNORM_PACK32,
        Format::R11G11B10Float => vk::Format::B10G11R11_UFLOAT_PACK32,

        Format::Rg16Uint => vk::Format::R16G16_UINT,
        Format::Rg16Sint => vk::Format::R16G16_SINT,
        Format::Rg16Unorm => vk::Format::R16G16_UNORM,
        Format::Rg16Snorm => vk::Format::R16G16_SNORM,
        Format::Rg16Float => vk::Format::R16G16_SFLOAT,

        Format::R32Uint => vk::Format::R32_UINT,
        Format::R32Sint => vk::Format::R32_SINT,
        Format::R32Float => vk::Format::R32_SFLOAT,

        Format::Rgba16Uint => vk::Format::R16G16B16A16_UINT,
        Format::Rgba16Sint => vk::Format::R16G16B16A16_SINT,
        Format::Rgba16Unorm => vk::Format::R16G16B16A16_UNORM,
        Format::Rgba16Snorm => vk::Format::R16G16B16A16_SNORM,
        Format::Rgba16Float => vk::Format::R16G16B16A16_SFLOAT,

        Format::Rg32Uint => vk::Format::R32G32_UINT,
        Format::Rg32Sint => vk::Format::R32G32_SINT,
        Format::Rg32Float => vk::Format::R32G32_SFLOAT,

        Format::Rgb32Uint => vk::Format::R32G32B32_UINT,
        Format::Rgb32Sint => vk::Format::R32G32B32_SINT,
        Format::Rgb32Float => vk::Format::R32G32B32_SFLOAT,

        Format::Rgba32Uint => vk::Format::R32G32B32A32_UINT,
        Format::Rgba32Sint => vk::Format::R32G32B32A32_SINT,
        Format::Rgba32Float => vk::Format::R32G32B32A32_SFLOAT,

        Format::D16Unorm => vk::Format::D16_UNORM,
        Format::D24UnormS8Uint => vk::Format::D24_UNORM_S8_UINT,
        Format::X24TypelessG8Uint => vk::Format::D24_UNORM_S8_UINT,
        Format::D32Float => vk::Format::D32_SFLOAT,
        Format::D32FloatS8Uint => vk::Format::D32_SFLOAT_S8_UINT,
        Format::X32TypelessG8Uint => vk::Format::D32_SFLOAT_S8_UINT,

        Format::Bc1Unorm => vk::Format::BC1_RGBA_UNORM_BLOCK,
        Format::Bc1UnormSrgb => vk::Format::BC1_RGBA_SRGB_BLOCK,
        Format::Bc2Unorm => vk::Format::BC2_UNORM_BLOCK,
        Format::Bc2UnormSrgb => vk::Format::BC2_SRGB_BLOCK,
        Format::Bc3Unorm => vk::Format::BC3_UNORM_BLOCK,
        Format::Bc3UnormSrgb => vk::Format::BC3_SRGB_BLOCK,
        Format::Bc4Unorm => vk::Format::BC4_UNORM_BLOCK,
        Format::Bc4Snorm => vk::Format::BC4_SNORM_BLOCK,
        Format::Bc5Unorm => vk::Format::BC5_UNORM_BLOCK,
        Format::Bc5Snorm => vk::Format::BC5_SNORM_BLOCK,
        Format::Bc6HUfloat => vk::Format::BC6H_UFLOAT_BLOCK,
        Format::Bc6HSfloat => vk::Format::BC6H_SFLOAT_BLOCK,
        Format::Bc7Unorm => vk::Format::BC7_UNORM_BLOCK,
        Format::Bc7UnormSrgb => vk::Format::BC7_SRGB_BLOCK,
    }
}

pub(crate) fn buffer_usage(
    desc: &BufferDescriptor,
    supports_device_address: bool,
) -> vk::BufferUsageFlags {
    let mut usage = vk::BufferUsageFlags::TRANSFER_SRC | vk::BufferUsageFlags::TRANSFER_DST;
    if desc.is_vertex_buffer {
        usage |= vk::BufferUsageFlags::VERTEX_BUFFER;
    }
    if desc.is_index_buffer {
        usage |= vk::BufferUsageFlags::INDEX_BUFFER;
    }
    if desc.allowed_states.contains(ResourceStates::CONSTANT_BUFFER) {
        usage |= vk::BufferUsageFlags::UNIFORM_BUFFER;
    }
    if desc.allowed_states.contains(ResourceStates::UNORDERED_ACCESS) || desc.struct_stride != 0 {
        usage |= vk::BufferUsageFlags::STORAGE_BUFFER;
    }
    if desc.allowed_states.contains(ResourceStates::INDIRECT_ARGUMENT) {
        usage |= vk::BufferUsageFlags::INDIRECT_BUFFER;
    }
    if desc.format != Format::Unknown {
        usage |= vk::BufferUsageFlags::UNIFORM_TEXEL_BUFFER;
    }
    if supports_device_address {
        usage |= vk::BufferUsageFlags::SHADER_DEVICE_ADDRESS;
    }
    usage
}

/// Candidate memory property sets for a memory class, most specific first.
pub(crate) fn memory_property_candidates(memory_type: MemoryType) -> Vec<vk::MemoryPropertyFlags> {
    match memory_type {
        MemoryType::DeviceLocal => vec![vk::MemoryPropertyFlags::DEVICE_LOCAL],
        MemoryType::Upload => vec![
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        ],
        MemoryType::ReadBack => vec![
            vk::MemoryPropertyFlags::HOST_VISIBLE
                | vk::MemoryPropertyFlags::HOST_COHERENT
                | vk::MemoryPropertyFlags::HOST_CACHED,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        ],
    }
}

pub(crate) fn image_type(dimension: TextureDimension) -> vk::ImageType {
    match dimension {
        TextureDimension::Texture3D => vk::ImageType::TYPE_3D,
        TextureDimension::Texture1D | TextureDimension::Texture1DArray => vk::ImageType::TYPE_1D,
        _ => vk::ImageType::TYPE_2D,
    }
}

pub(crate) fn is_cube(dimension: TextureDimension) -> bool {
    matches!(
        dimension,
        TextureDimension::TextureCube | TextureDimension::TextureCubeArray
    )
}

pub(crate) fn sample_count_to_vk(count: u32) -> vk::SampleCountFlags {
    match count {
        2 => vk::SampleCountFlags::TYPE_2,
        4 => vk::SampleCountFlags::TYPE_4,
        8 => vk::SampleCountFlags::TYPE_8,
        16 => vk::SampleCountFlags::TYPE_16,
        32 => vk::SampleCountFlags::TYPE_32,
        64 => vk::SampleCountFlags::TYPE_64,
        _ => vk::SampleCountFlags::TYPE_1,
    }
}

pub(crate) fn image_usage(desc: &TextureDescriptor) -> vk::ImageUsageFlags {
    let mut usage = vk::ImageUsageFlags::TRANSFER_SRC | vk::ImageUsageFlags::TRANSFER_DST;
    if desc.is_shader_resource {
        usage |= vk::ImageUsageFlags::SAMPLED;
    }
    if desc.is_uav {
        usage |= vk::ImageUsageFlags::STORAGE;
    }
    if desc.is_render_target {
        if desc.format.info().has_depth || desc.format.info().has_stencil {
            usage |= vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT;
        } else {
            usage |= vk::ImageUsageFlags::COLOR_ATTACHMENT;
        }
    }
    usage
}

pub(crate) fn filter_to_vk(filter: TextureFilteringMode) -> vk::Filter {
    match filter {
        TextureFilteringMode::Nearest => vk::Filter::NEAREST,
        TextureFilteringMode::Linear => vk::Filter::LINEAR,
    }
}

pub(crate) fn mipmap_mode_to_vk(filter: TextureFilteringMode) -> vk::SamplerMipmapMode {
    match filter {
        TextureFilteringMode::Nearest => vk::SamplerMipmapMode::NEAREST,
        TextureFilteringMode::Linear => vk::SamplerMipmapMode::LINEAR,
    }
}

pub(crate) fn address_mode_to_vk(mode: TextureAddressingMode) -> vk::SamplerAddressMode {
    match mode {
        TextureAddressingMode::Wrap => vk::SamplerAddressMode::REPEAT,
        TextureAddressingMode::ClampToEdge => vk::SamplerAddressMode::CLAMP_TO_EDGE,
        TextureAddressingMode::ClampToBorder => vk::SamplerAddressMode::CLAMP_TO_BORDER,
        TextureAddressingMode::MirrorRepeat => vk::SamplerAddressMode::MIRRORED_REPEAT,
        TextureAddressingMode::MirrorOnce => vk::SamplerAddressMode::MIRROR_CLAMP_TO_EDGE,
    }
}

pub(crate) fn compare_op_to_vk(func: ComparisonFunc) -> vk::CompareOp {
    match func {
        ComparisonFunc::Never => vk::CompareOp::NEVER,
        ComparisonFunc::Less => vk::CompareOp::LESS,
        ComparisonFunc::Equal => vk::CompareOp::EQUAL,
        ComparisonFunc::LessEqual => vk::CompareOp::LESS_OR_EQUAL,
        ComparisonFunc::Greater => vk::CompareOp::GREATER,
        ComparisonFunc::NotEqual => vk::CompareOp::NOT_EQUAL,
        ComparisonFunc::GreaterEqual => vk::CompareOp::GREATER_OR_EQUAL,
        ComparisonFunc::Always => vk::CompareOp::ALWAYS,
    }
}

/// Picks the fixed Vulkan border color closest to an arbitrary RGBA value.
pub(crate) fn border_color_to_vk(color: [f32; 4]) -> vk::BorderColor {
    if color[3] < 0.5 {
        vk::BorderColor::FLOAT_TRANSPARENT_BLACK
    } else if (color[0] + color[1] + color[2]) / 3.0 < 0.5 {
        vk::BorderColor::FLOAT_OPAQUE_BLACK
    } else {
        vk::BorderColor::FLOAT_OPAQUE_WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_translation_spot_checks() {
        assert_eq!(format_to_vk(Format::Unknown), vk::Format::UNDEFINED);
        assert_eq!(format_to_vk(Format::Rgba8Unorm), vk::Format::R8G8B8A8_UNORM);
        assert_eq!(format_to_vk(Format::Bgra8UnormSrgb), vk::Format::B8G8R8A8_SRGB);
        assert_eq!(format_to_vk(Format::D32Float), vk::Format::D32_SFLOAT);
        assert_eq!(format_to_vk(Format::Bc7UnormSrgb), vk::Format::BC7_SRGB_BLOCK);
    }

    #[test]
    fn vertex_and_index_usage_follow_descriptor() {
        let desc = BufferDescriptor {
            size: 64,
            is_vertex_buffer: true,
            is_index_buffer: true,
            ..BufferDescriptor::default()
        };
        let usage = buffer_usage(&desc, false);
        assert!(usage.contains(vk::BufferUsageFlags::VERTEX_BUFFER));
        assert!(usage.contains(vk::BufferUsageFlags::INDEX_BUFFER));
        assert!(usage.contains(vk::BufferUsageFlags::TRANSFER_SRC));
        assert!(!usage.contains(vk::BufferUsageFlags::SHADER_DEVICE_ADDRESS));
    }

    #[test]
    fn host_visible_candidates_for_host_memory() {
        for memory_type in [MemoryType::Upload, MemoryType::ReadBack] {
            for candidate in memory_property_candidates(memory_type) {
                assert!(candidate.contains(vk::MemoryPropertyFlags::HOST_VISIBLE));
            }
        }
        let local = memory_property_candidates(MemoryType::DeviceLocal);
        assert_eq!(local, vec![vk::MemoryPropertyFlags::DEVICE_LOCAL]);
    }

    #[test]
    fn border_colors_snap_to_fixed_palette() {
        assert_eq!(
            border_color_to_vk([0.0, 0.0, 0.0, 0.0]),
            vk::BorderColor::FLOAT_TRANSPARENT_BLACK
        );
        assert_eq!(
            border_color_to_vk([0.0, 0.0, 0.0, 1.0]),
            vk::BorderColor::FLOAT_OPAQUE_BLACK
        );
        assert_eq!(
            border_color_to_vk([1.0, 1.0, 1.0, 1.0]),
            vk::BorderColor::FLOAT_OPAQUE_WHITE
        );
    }
}
