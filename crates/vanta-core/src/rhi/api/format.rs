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

//! Resource formats and their static property table.
//!
//! [`FORMAT_INFOS`] is kept in lockstep with the [`Format`] enum; a const
//! assertion ties the table length to [`Format::COUNT`] and a test checks
//! that every row names its own format.

use std::fmt;

/// Broad classification of a format's interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    /// Raw integer channels.
    Integer,
    /// Fixed-point channels normalized to [0, 1] or [-1, 1].
    Normalized,
    /// Floating-point channels.
    Float,
    /// Depth and/or stencil data.
    DepthStencil,
}

/// Pixel and block formats for buffers and textures.
///
/// The discriminants are stable indices into [`FORMAT_INFOS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
#[repr(u32)]
pub enum Format {
    #[default]
    Unknown = 0,

    R8Uint,
    R8Sint,
    R8Unorm,
    R8Snorm,

    Rg8Uint,
    Rg8Sint,
    Rg8Unorm,
    Rg8Snorm,

    R16Uint,
    R16Sint,
    R16Unorm,
    R16Snorm,
    R16Float,

    Bgra4Unorm,
    B5G6R5Unorm,
    B5G5R5A1Unorm,

    Rgba8Uint,
    Rgba8Sint,
    Rgba8Unorm,
    Rgba8Snorm,

    Bgra8Unorm,
    Rgba8UnormSrgb,
    Bgra8UnormSrgb,

    R10G10B10A2Unorm,
    R11G11B10Float,

    Rg16Uint,
    Rg16Sint,
    Rg16Unorm,
    Rg16Snorm,
    Rg16Float,

    R32Uint,
    R32Sint,
    R32Float,

    Rgba16Uint,
    Rgba16Sint,
    Rgba16Unorm,
    Rgba16Snorm,
    Rgba16Float,

    Rg32Uint,
    Rg32Sint,
    Rg32Float,

    Rgb32Uint,
    Rgb32Sint,
    Rgb32Float,

    Rgba32Uint,
    Rgba32Sint,
    Rgba32Float,

    D16Unorm,
    D24UnormS8Uint,
    X24TypelessG8Uint,
    D32Float,
    D32FloatS8Uint,
    X32TypelessG8Uint,

    Bc1Unorm,
    Bc1UnormSrgb,
    Bc2Unorm,
    Bc2UnormSrgb,
    Bc3Unorm,
    Bc3UnormSrgb,
    Bc4Unorm,
    Bc4Snorm,
    Bc5Unorm,
    Bc5Snorm,
    Bc6HUfloat,
    Bc6HSfloat,
    Bc7Unorm,
    Bc7UnormSrgb,
}

impl Format {
    /// Number of formats, including [`Format::Unknown`].
    pub const COUNT: usize = 68;

    /// Looks a format up by its stable index.
    ///
    /// Returns `None` at or beyond [`Format::COUNT`].
    pub fn from_index(index: u32) -> Option<Format> {
        FORMAT_INFOS.get(index as usize).map(|info| info.format)
    }

    /// The static properties of this format.
    pub fn info(&self) -> &'static FormatInfo {
        &FORMAT_INFOS[*self as usize]
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info().name)
    }
}

/// Static properties of a [`Format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// The format this row describes.
    pub format: Format,
    /// Lower-case format name.
    pub name: &'static str,
    /// Interpretation of the channel data.
    pub kind: FormatKind,
    /// Bytes per block. For uncompressed formats this is bytes per pixel.
    pub bytes_per_block: u8,
    /// Block edge length in pixels; 1 for uncompressed formats.
    pub block_size: u8,
    /// Format carries a red channel.
    pub has_red: bool,
    /// Format carries a green channel.
    pub has_green: bool,
    /// Format carries a blue channel.
    pub has_blue: bool,
    /// Format carries an alpha channel.
    pub has_alpha: bool,
    /// Format carries depth data.
    pub has_depth: bool,
    /// Format carries stencil data.
    pub has_stencil: bool,
    /// Channels are signed.
    pub is_signed: bool,
    /// Color channels are sRGB-encoded.
    pub is_srgb: bool,
}

impl FormatInfo {
    /// Returns the property row for `format`.
    pub fn get(format: Format) -> &'static FormatInfo {
        &FORMAT_INFOS[format as usize]
    }
}

impl fmt::Display for FormatInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:?}, {} bytes/block, block size {})",
            self.name, self.kind, self.bytes_per_block, self.block_size
        )
    }
}

// Channel masks for the table below.
const R: u8 = 1 << 0;
const G: u8 = 1 << 1;
const B: u8 = 1 << 2;
const A: u8 = 1 << 3;
const D: u8 = 1 << 4;
const S: u8 = 1 << 5;
const RG: u8 = R | G;
const RGB: u8 = R | G | B;
const RGBA: u8 = R | G | B | A;
const DS: u8 = D | S;
const NONE: u8 = 0;

const fn fi(
    format: Format,
    name: &'static str,
    kind: FormatKind,
    bytes_per_block: u8,
    block_size: u8,
    mask: u8,
    is_signed: bool,
    is_srgb: bool,
) -> FormatInfo {
    FormatInfo {
        format,
        name,
        kind,
        bytes_per_block,
        block_size,
        has_red: mask & R != 0,
        has_green: mask & G != 0,
        has_blue: mask & B != 0,
        has_alpha: mask & A != 0,
        has_depth: mask & D != 0,
        has_stencil: mask & S != 0,
        is_signed,
        is_srgb,
    }
}

use FormatKind::{DepthStencil, Float, Integer, Normalized};

/// Property table, indexed by `Format as usize`.
#[rustfmt::skip]
pub const FORMAT_INFOS: [FormatInfo; Format::COUNT] = [
    fi(Format::Unknown,           "unknown",              Integer,      0,  1, NONE, false, false),

    fi(Format::R8Uint,            "r8_uint",              Integer,      1,  1, R,    false, false),
    fi(Format::R8Sint,            "r8_sint",              Integer,      1,  1, R,    true,  false),
    fi(Format::R8Unorm,           "r8_unorm",             Normalized,   1,  1, R,    false, false),
    fi(Format::R8Snorm,           "r8_snorm",             Normalized,   1,  1, R,    true,  false),

    fi(Format::Rg8Uint,           "rg8_uint",             Integer,      2,  1, RG,   false, false),
    fi(Format::Rg8Sint,           "rg8_sint",             Integer,      2,  1, RG,   true,  false),
    fi(Format::Rg8Unorm,          "rg8_unorm",            Normalized,   2,  1, RG,   false, false),
    fi(Format::Rg8Snorm,          "rg8_snorm",            Normalized,   2,  1, RG,   true,  false),

    fi(Format::R16Uint,           "r16_uint",             Integer,      2,  1, R,    false, false),
    fi(Format::R16Sint,           "r16_sint",             Integer,      2,  1, R,    true,  false),
    fi(Format::R16Unorm,          "r16_unorm",            Normalized,   2,  1, R,    false, false),
    fi(Format::R16Snorm,          "r16_snorm",            Normalized,   2,  1, R,    true,  false),
    fi(Format::R16Float,          "r16_float",            Float,        2,  1, R,    true,  false),

    fi(Format::Bgra4Unorm,        "bgra4_unorm",          Normalized,   2,  1, RGBA, false, false),
    fi(Format::B5G6R5Unorm,       "b5g6r5_unorm",         Normalized,   2,  1, RGB,  false, false),
    fi(Format::B5G5R5A1Unorm,     "b5g5r5a1_unorm",       Normalized,   2,  1, RGBA, false, false),

    fi(Format::Rgba8Uint,         "rgba8_uint",           Integer,      4,  1, RGBA, false, false),
    fi(Format::Rgba8Sint,         "rgba8_sint",           Integer,      4,  1, RGBA, true,  false),
    fi(Format::Rgba8Unorm,        "rgba8_unorm",          Normalized,   4,  1, RGBA, false, false),
    fi(Format::Rgba8Snorm,        "rgba8_snorm",          Normalized,   4,  1, RGBA, true,  false),

    fi(Format::Bgra8Unorm,        "bgra8_unorm",          Normalized,   4,  1, RGBA, false, false),
    fi(Format::Rgba8UnormSrgb,    "rgba8_unorm_srgb",     Normalized,   4,  1, RGBA, false, true),
    fi(Format::Bgra8UnormSrgb,    "bgra8_unorm_srgb",     Normalized,   4,  1, RGBA, false, true),

    fi(Format::R10G10B10A2Unorm,  "r10g10b10a2_unorm",    Normalized,   4,  1, RGBA, false, false),
    fi(Format::R11G11B10Float,    "r11g11b10_float",      Float,        4,  1, RGB,  false, false),

    fi(Format::Rg16Uint,          "rg16_uint",            Integer,      4,  1, RG,   false, false),
    fi(Format::Rg16Sint,          "rg16_sint",            Integer,      4,  1, RG,   true,  false),
    fi(Format::Rg16Unorm,         "rg16_unorm",           Normalized,   4,  1, RG,   false, false),
    fi(Format::Rg16Snorm,         "rg16_snorm",           Normalized,   4,  1, RG,   true,  false),
    fi(Format::Rg16Float,         "rg16_float",           Float,        4,  1, RG,   true,  false),

    fi(Format::R32Uint,           "r32_uint",             Integer,      4,  1, R,    false, false),
    fi(Format::R32Sint,           "r32_sint",             Integer,      4,  1, R,    true,  false),
    fi(Format::R32Float,          "r32_float",            Float,        4,  1, R,    true,  false),

    fi(Format::Rgba16Uint,        "rgba16_uint",          Integer,      8,  1, RGBA, false, false),
    fi(Format::Rgba16Sint,        "rgba16_sint",          Integer,      8,  1, RGBA, true,  false),
    fi(Format::Rgba16Unorm,       "rgba16_unorm",         Normalized,   8,  1, RGBA, false, false),
    fi(Format::Rgba16Snorm,       "rgba16_snorm",         Normalized,   8,  1, RGBA, true,  false),
    fi(Format::Rgba16Float,       "rgba16_float",         Float,        8,  1, RGBA, true,  false),

    fi(Format::Rg32Uint,          "rg32_uint",            Integer,      8,  1, RG,   false, false),
    fi(Format::Rg32Sint,          "rg32_sint",            Integer,      8,  1, RG,   true,  false),
    fi(Format::Rg32Float,         "rg32_float",           Float,        8,  1, RG,   true,  false),

    fi(Format::Rgb32Uint,         "rgb32_uint",           Integer,      12, 1, RGB,  false, false),
    fi(Format::Rgb32Sint,         "rgb32_sint",           Integer,      12, 1, RGB,  true,  false),
    fi(Format::Rgb32Float,        "rgb32_float",          Float,        12, 1, RGB,  true,  false),

    fi(Format::Rgba32Uint,        "rgba32_uint",          Integer,      16, 1, RGBA, false, false),
    fi(Format::Rgba32Sint,        "rgba32_sint",          Integer,      16, 1, RGBA, true,  false),
    fi(Format::Rgba32Float,       "rgba32_float",         Float,        16, 1, RGBA, true,  false),

    fi(Format::D16Unorm,          "d16_unorm",            DepthStencil, 2,  1, D,    false, false),
    fi(Format::D24UnormS8Uint,    "d24_unorm_s8_uint",    DepthStencil, 4,  1, DS,   false, false),
    fi(Format::X24TypelessG8Uint, "x24_typeless_g8_uint", Integer,      4,  1, S,    false, false),
    fi(Format::D32Float,          "d32_float",            DepthStencil, 4,  1, D,    false, false),
    fi(Format::D32FloatS8Uint,    "d32_float_s8_uint",    DepthStencil, 8,  1, DS,   false, false),
    fi(Format::X32TypelessG8Uint, "x32_typeless_g8_uint", Integer,      8,  1, S,    false, false),

    fi(Format::Bc1Unorm,          "bc1_unorm",            Normalized,   8,  4, RGBA, false, false),
    fi(Format::Bc1UnormSrgb,      "bc1_unorm_srgb",       Normalized,   8,  4, RGBA, false, true),
    fi(Format::Bc2Unorm,          "bc2_unorm",            Normalized,   16, 4, RGBA, false, false),
    fi(Format::Bc2UnormSrgb,      "bc2_unorm_srgb",       Normalized,   16, 4, RGBA, false, true),
    fi(Format::Bc3Unorm,          "bc3_unorm",            Normalized,   16, 4, RGBA, false, false),
    fi(Format::Bc3UnormSrgb,      "bc3_unorm_srgb",       Normalized,   16, 4, RGBA, false, true),
    fi(Format::Bc4Unorm,          "bc4_unorm",            Normalized,   8,  4, R,    false, false),
    fi(Format::Bc4Snorm,          "bc4_snorm",            Normalized,   8,  4, R,    true,  false),
    fi(Format::Bc5Unorm,          "bc5_unorm",            Normalized,   16, 4, RG,   false, false),
    fi(Format::Bc5Snorm,          "bc5_snorm",            Normalized,   16, 4, RG,   true,  false),
    fi(Format::Bc6HUfloat,        "bc6h_ufloat",          Float,        16, 4, RGB,  false, false),
    fi(Format::Bc6HSfloat,        "bc6h_sfloat",          Float,        16, 4, RGB,  true,  false),
    fi(Format::Bc7Unorm,          "bc7_unorm",            Normalized,   16, 4, RGBA, false, false),
    fi(Format::Bc7UnormSrgb,      "bc7_unorm_srgb",       Normalized,   16, 4, RGBA, false, true),
];

const _: () = assert!(FORMAT_INFOS.len() == Format::COUNT);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_in_lockstep_with_enum() {
        for (index, info) in FORMAT_INFOS.iter().enumerate() {
            assert_eq!(
                info.format as usize, index,
                "row {index} ({}) is out of order",
                info.name
            );
            assert_eq!(Format::from_index(index as u32), Some(info.format));
        }
    }

    #[test]
    fn from_index_rejects_out_of_range() {
        assert_eq!(Format::from_index(Format::COUNT as u32), None);
        assert_eq!(Format::from_index(u32::MAX), None);
    }

    #[test]
    fn known_rows() {
        let info = FormatInfo::get(Format::Rgba8UnormSrgb);
        assert_eq!(info.bytes_per_block, 4);
        assert_eq!(info.block_size, 1);
        assert!(info.has_alpha);
        assert!(info.is_srgb);
        assert!(!info.is_signed);

        let info = FormatInfo::get(Format::D24UnormS8Uint);
        assert!(info.has_depth);
        assert!(info.has_stencil);
        assert!(!info.has_red);
        assert_eq!(info.kind, FormatKind::DepthStencil);

        let info = FormatInfo::get(Format::Bc1Unorm);
        assert_eq!(info.bytes_per_block, 8);
        assert_eq!(info.block_size, 4);
    }

    #[test]
    fn display_uses_table_name() {
        assert_eq!(Format::Rg16Float.to_string(), "rg16_float");
        assert_eq!(Format::Unknown.to_string(), "unknown");
    }
}
