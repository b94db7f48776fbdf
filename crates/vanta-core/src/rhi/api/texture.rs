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

//! Texture descriptor.

use super::enums::TextureDimension;
use super::format::Format;

/// Describes a texture resource.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDescriptor {
    /// Shape of the texture.
    pub dimension: TextureDimension,
    /// Pixel format. Must not be [`Format::Unknown`].
    pub format: Format,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels; 1 for 1D textures.
    pub height: u32,
    /// Depth in pixels; 1 for non-3D textures.
    pub depth: u32,
    /// Number of array layers; 1 for non-array textures.
    pub array_size: u32,
    /// Number of mip levels.
    pub mip_levels: u32,
    /// Samples per pixel; 1 for non-multisampled textures.
    pub sample_count: u32,
    /// Vendor-specific multisample quality level.
    pub sample_quality: u32,
    /// Texture may be read through a shader resource view.
    pub is_shader_resource: bool,
    /// Texture may be bound as a render target.
    pub is_render_target: bool,
    /// Texture may be accessed through an unordered access view.
    pub is_uav: bool,
    /// Texture is created typeless and cast per view.
    pub is_typeless: bool,
    /// Optional name surfaced to native debugging tools and logs.
    pub debug_name: Option<String>,
}

impl Default for TextureDescriptor {
    fn default() -> Self {
        Self {
            dimension: TextureDimension::Texture2D,
            format: Format::Unknown,
            width: 1,
            height: 1,
            depth: 1,
            array_size: 1,
            mip_levels: 1,
            sample_count: 1,
            sample_quality: 0,
            is_shader_resource: true,
            is_render_target: false,
            is_uav: false,
            is_typeless: false,
            debug_name: None,
        }
    }
}
