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

//! Device descriptor, limits and post-creation info.

use std::fmt;

use super::enums::GraphicsApi;
use super::flags::DeviceFeatures;

/// Options controlling device creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Wrap the created device in the validation layer.
    pub enable_validation: bool,
    /// Additionally enable the native API's own validation/debug layer
    /// where one exists.
    pub enable_api_validation: bool,
}

impl Default for DeviceDescriptor {
    fn default() -> Self {
        Self {
            enable_validation: true,
            enable_api_validation: false,
        }
    }
}

/// Hard limits reported by a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub struct DeviceLimits {
    pub max_texture_dimension_1d: u32,
    pub max_texture_dimension_2d: u32,
    pub max_texture_dimension_3d: u32,
    pub max_texture_dimension_cube: u32,
    pub max_texture_array_layers: u32,

    pub max_vertex_input_elements: u32,
    pub max_vertex_input_element_offset: u32,
    pub max_vertex_streams: u32,
    pub max_vertex_stream_stride: u32,

    pub max_compute_threads_per_group: u32,
    pub max_compute_thread_group_size: [u32; 3],
    pub max_compute_dispatch_thread_groups: [u32; 3],

    pub max_viewports: u32,
    pub max_viewport_dimensions: [u32; 2],
    pub max_framebuffer_dimensions: [u32; 3],

    pub max_shader_visible_samplers: u32,
}

impl fmt::Display for DeviceLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DeviceLimits {{")?;
        writeln!(f, "  max_texture_dimension_1d: {}", self.max_texture_dimension_1d)?;
        writeln!(f, "  max_texture_dimension_2d: {}", self.max_texture_dimension_2d)?;
        writeln!(f, "  max_texture_dimension_3d: {}", self.max_texture_dimension_3d)?;
        writeln!(f, "  max_texture_dimension_cube: {}", self.max_texture_dimension_cube)?;
        writeln!(f, "  max_texture_array_layers: {}", self.max_texture_array_layers)?;
        writeln!(f, "  max_vertex_input_elements: {}", self.max_vertex_input_elements)?;
        writeln!(
            f,
            "  max_vertex_input_element_offset: {}",
            self.max_vertex_input_element_offset
        )?;
        writeln!(f, "  max_vertex_streams: {}", self.max_vertex_streams)?;
        writeln!(f, "  max_vertex_stream_stride: {}", self.max_vertex_stream_stride)?;
        writeln!(
            f,
            "  max_compute_threads_per_group: {}",
            self.max_compute_threads_per_group
        )?;
        writeln!(
            f,
            "  max_compute_thread_group_size: {:?}",
            self.max_compute_thread_group_size
        )?;
        writeln!(
            f,
            "  max_compute_dispatch_thread_groups: {:?}",
            self.max_compute_dispatch_thread_groups
        )?;
        writeln!(f, "  max_viewports: {}", self.max_viewports)?;
        writeln!(f, "  max_viewport_dimensions: {:?}", self.max_viewport_dimensions)?;
        writeln!(
            f,
            "  max_framebuffer_dimensions: {:?}",
            self.max_framebuffer_dimensions
        )?;
        writeln!(
            f,
            "  max_shader_visible_samplers: {}",
            self.max_shader_visible_samplers
        )?;
        write!(f, "}}")
    }
}

/// Everything a device reports about itself after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    /// The API the device runs on. Never [`GraphicsApi::Automatic`].
    pub api: GraphicsApi,
    /// Hard limits of the underlying adapter.
    pub limits: DeviceLimits,
    /// Optional capabilities the device enabled.
    pub features: DeviceFeatures,
    /// Names of native extensions/features enabled beyond the core API.
    pub extended_features: Vec<String>,
    /// Name of the adapter the device was created on.
    pub adapter_name: String,
    /// Timestamp ticks per second; zero when timestamps are unavailable.
    pub timestamp_frequency: u64,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DeviceInfo {{")?;
        writeln!(f, "  api: {}", self.api)?;
        writeln!(f, "  adapter_name: \"{}\"", self.adapter_name)?;
        writeln!(f, "  timestamp_frequency: {}", self.timestamp_frequency)?;
        writeln!(f, "  features: {:?}", self.features)?;
        writeln!(f, "  extended_features: {:?}", self.extended_features)?;
        for line in self.limits.to_string().lines() {
            writeln!(f, "  {line}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_on_by_default() {
        let desc = DeviceDescriptor::default();
        assert!(desc.enable_validation);
        assert!(!desc.enable_api_validation);
    }

    #[test]
    fn device_info_display() {
        let info = DeviceInfo {
            api: GraphicsApi::Cuda,
            limits: DeviceLimits::default(),
            features: DeviceFeatures::NONE,
            extended_features: Vec::new(),
            adapter_name: "Test GPU".to_string(),
            timestamp_frequency: 1_000_000,
        };
        let text = info.to_string();
        assert!(text.contains("cuda"));
        assert!(text.contains("Test GPU"));
        assert!(text.contains("max_texture_dimension_2d"));
    }
}
