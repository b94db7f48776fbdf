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

//! Vulkan backend.
//!
//! The loader is resolved at runtime; a machine without a Vulkan driver
//! simply enumerates no adapters. Enumeration uses a scratch instance that
//! is destroyed before any adapter is returned, so adapters are pure
//! identity snapshots.

mod adapter;
mod conversions;
mod device;
mod resources;

pub use adapter::{enum_adapters, VulkanAdapter};
pub use device::VulkanDevice;
pub use resources::{VulkanBuffer, VulkanHeap, VulkanSampler, VulkanTexture};

use std::ffi::CStr;
use std::os::raw::c_char;

use ash::vk;
use vanta_core::rhi::api::AdapterLuid;
use vanta_core::RhiError;

pub(crate) fn check<T>(call: &'static str, result: Result<T, vk::Result>) -> Result<T, RhiError> {
    result.map_err(|code| RhiError::Backend {
        call,
        code: code.as_raw() as i64,
    })
}

pub(crate) fn load_entry() -> Option<ash::Entry> {
    match unsafe { ash::Entry::load() } {
        Ok(entry) => Some(entry),
        Err(err) => {
            log::debug!("Vulkan loader unavailable: {err}");
            None
        }
    }
}

pub(crate) fn cstr_to_string(ptr: *const c_char) -> String {
    unsafe { CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}

const VALIDATION_LAYER: &CStr =
    unsafe { CStr::from_bytes_with_nul_unchecked(b"VK_LAYER_KHRONOS_validation\0") };

/// Creates an instance targeting the highest API version the loader offers,
/// capped at 1.3. Returns the instance together with that version.
pub(crate) fn create_instance(
    entry: &ash::Entry,
    enable_api_validation: bool,
) -> Result<(ash::Instance, u32), RhiError> {
    let loader_version = match entry.try_enumerate_instance_version() {
        Ok(Some(version)) => version,
        _ => vk::API_VERSION_1_0,
    };
    let api_version = loader_version.min(vk::API_VERSION_1_3);

    let app_info = vk::ApplicationInfo::builder().api_version(api_version);

    let mut layers: Vec<*const c_char> = Vec::new();
    if enable_api_validation {
        if validation_layer_available(entry) {
            layers.push(VALIDATION_LAYER.as_ptr());
        } else {
            log::warn!("VK_LAYER_KHRONOS_validation requested but not installed");
        }
    }

    let create_info = vk::InstanceCreateInfo::builder()
        .application_info(&app_info)
        .enabled_layer_names(&layers);
    let instance = check("vkCreateInstance", unsafe {
        entry.create_instance(&create_info, None)
    })?;
    Ok((instance, api_version))
}

fn validation_layer_available(entry: &ash::Entry) -> bool {
    let layers = match entry.enumerate_instance_layer_properties() {
        Ok(layers) => layers,
        Err(_) => return false,
    };
    layers.iter().any(|layer| {
        let name = unsafe { CStr::from_ptr(layer.layer_name.as_ptr()) };
        name == VALIDATION_LAYER
    })
}

/// Reads the 16-byte adapter identity of a physical device.
///
/// On 1.1+ this is the LUID when the driver marks it valid, else the device
/// UUID; 1.0 loaders fall back to the pipeline cache UUID.
pub(crate) fn adapter_luid(
    instance: &ash::Instance,
    api_version: u32,
    physical_device: vk::PhysicalDevice,
) -> AdapterLuid {
    if api_version >= vk::API_VERSION_1_1 {
        let mut id_props = vk::PhysicalDeviceIDProperties::default();
        let mut props2 = vk::PhysicalDeviceProperties2::builder().push_next(&mut id_props);
        unsafe { instance.get_physical_device_properties2(physical_device, &mut props2) };
        let mut luid = [0u8; 16];
        if id_props.device_luid_valid == vk::TRUE {
            luid[..8].copy_from_slice(&id_props.device_luid);
        } else {
            luid.copy_from_slice(&id_props.device_uuid);
        }
        luid
    } else {
        let props = unsafe { instance.get_physical_device_properties(physical_device) };
        props.pipeline_cache_uuid
    }
}
