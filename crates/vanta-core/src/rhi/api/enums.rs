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

//! Core enumerations shared by all backends.

use std::fmt;

/// The native graphics API a backend is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GraphicsApi {
    /// Pick the platform's preferred API: D3D12 on Windows, Metal on macOS,
    /// Vulkan everywhere else. CUDA is never selected automatically.
    #[default]
    Automatic,
    /// Direct3D 12.
    D3d12,
    /// Vulkan.
    Vulkan,
    /// Metal.
    Metal,
    /// CUDA driver API (compute-only resources).
    Cuda,
}

impl fmt::Display for GraphicsApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GraphicsApi::Automatic => "automatic",
            GraphicsApi::D3d12 => "d3d12",
            GraphicsApi::Vulkan => "vulkan",
            GraphicsApi::Metal => "metal",
            GraphicsApi::Cuda => "cuda",
        };
        write!(f, "{name}")
    }
}

/// Which kind of memory a resource lives in.
///
/// Backends translate this to native heap/storage types; see each backend's
/// conversion module for the exact mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemoryType {
    /// GPU-only memory. Not host-visible; mapping such a resource yields
    /// no pointer.
    #[default]
    DeviceLocal,
    /// Host-visible memory optimized for CPU writes / GPU reads.
    Upload,
    /// Host-visible memory optimized for GPU writes / CPU reads.
    ReadBack,
}

/// Shape of a texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum TextureDimension {
    Unknown,
    Texture1D,
    Texture1DArray,
    #[default]
    Texture2D,
    Texture2DArray,
    TextureCube,
    TextureCubeArray,
    Texture2DMs,
    Texture2DMsArray,
    Texture3D,
}

/// Minification/magnification/mip filtering mode for samplers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFilteringMode {
    /// Nearest-texel sampling.
    Nearest,
    /// Linear interpolation between texels.
    #[default]
    Linear,
}

/// Addressing mode applied to texture coordinates outside [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum TextureAddressingMode {
    #[default]
    Wrap,
    ClampToEdge,
    ClampToBorder,
    MirrorRepeat,
    MirrorOnce,
}

/// How multiple samples are reduced to a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum TextureReductionOp {
    #[default]
    Average,
    Comparison,
    Minimum,
    Maximum,
}

/// Comparison function for comparison samplers and depth tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum ComparisonFunc {
    #[default]
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphics_api_display() {
        assert_eq!(GraphicsApi::Vulkan.to_string(), "vulkan");
        assert_eq!(GraphicsApi::Automatic.to_string(), "automatic");
        assert_eq!(GraphicsApi::Cuda.to_string(), "cuda");
    }

    #[test]
    fn defaults() {
        assert_eq!(GraphicsApi::default(), GraphicsApi::Automatic);
        assert_eq!(MemoryType::default(), MemoryType::DeviceLocal);
        assert_eq!(TextureDimension::default(), TextureDimension::Texture2D);
        assert_eq!(TextureFilteringMode::default(), TextureFilteringMode::Linear);
    }
}
