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

//! Sampler descriptor.

use super::enums::{
    ComparisonFunc, TextureAddressingMode, TextureFilteringMode, TextureReductionOp,
};

/// Describes a texture sampler.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerDescriptor {
    /// Filter applied when minifying.
    pub min_filter: TextureFilteringMode,
    /// Filter applied when magnifying.
    pub mag_filter: TextureFilteringMode,
    /// Filter applied between mip levels.
    pub mip_filter: TextureFilteringMode,
    /// How fetched samples are reduced.
    pub reduction_op: TextureReductionOp,
    /// Addressing along U.
    pub address_u: TextureAddressingMode,
    /// Addressing along V.
    pub address_v: TextureAddressingMode,
    /// Addressing along W.
    pub address_w: TextureAddressingMode,
    /// Bias added to the computed mip level.
    pub mip_bias: f32,
    /// Maximum anisotropy; 1 disables anisotropic filtering. Must be at
    /// least 1.
    pub max_anisotropy: u32,
    /// Comparison applied when `reduction_op` is
    /// [`TextureReductionOp::Comparison`].
    pub comparison_func: ComparisonFunc,
    /// Border color used with [`TextureAddressingMode::ClampToBorder`].
    pub border_color: [f32; 4],
    /// Lowest mip level the sampler may select.
    pub mip_min: f32,
    /// Highest mip level the sampler may select.
    pub mip_max: f32,
    /// Optional name surfaced to native debugging tools and logs.
    pub debug_name: Option<String>,
}

impl Default for SamplerDescriptor {
    fn default() -> Self {
        Self {
            min_filter: TextureFilteringMode::Linear,
            mag_filter: TextureFilteringMode::Linear,
            mip_filter: TextureFilteringMode::Linear,
            reduction_op: TextureReductionOp::Average,
            address_u: TextureAddressingMode::Wrap,
            address_v: TextureAddressingMode::Wrap,
            address_w: TextureAddressingMode::Wrap,
            mip_bias: 0.0,
            max_anisotropy: 1,
            comparison_func: ComparisonFunc::Never,
            border_color: [1.0, 1.0, 1.0, 1.0],
            mip_min: -1000.0,
            mip_max: 1000.0,
            debug_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_covers_full_mip_chain() {
        let desc = SamplerDescriptor::default();
        assert!(desc.mip_min < 0.0);
        assert!(desc.mip_max > 0.0);
        assert_eq!(desc.max_anisotropy, 1);
    }
}
