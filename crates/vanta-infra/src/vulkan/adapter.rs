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

//! Vulkan adapter enumeration.

use std::sync::Arc;

use vanta_core::rhi::api::{AdapterInfo, DeviceDescriptor, GraphicsApi};
use vanta_core::rhi::traits::{GraphicsAdapter, GraphicsDevice};
use vanta_core::rhi::DeviceValidator;
use vanta_core::RhiError;

use super::device::VulkanDevice;
use super::{adapter_luid, check, create_instance, cstr_to_string, load_entry};

/// Lists Vulkan physical devices.
///
/// Creates a scratch instance, copies each device's identity out, and
/// destroys the instance before returning. A missing loader yields an empty
/// list.
pub fn enum_adapters() -> Result<Vec<Arc<dyn GraphicsAdapter>>, RhiError> {
    let entry = match load_entry() {
        Some(entry) => entry,
        None => return Ok(Vec::new()),
    };
    let (instance, api_version) = create_instance(&entry, false)?;

    let infos = collect_adapter_infos(&instance, api_version);
    unsafe { instance.destroy_instance(None) };

    let infos = infos?;
    log::debug!("enumerated {} Vulkan adapter(s)", infos.len());
    Ok(infos
        .into_iter()
        .map(|info| Arc::new(VulkanAdapter { info }) as Arc<dyn GraphicsAdapter>)
        .collect())
}

fn collect_adapter_infos(
    instance: &ash::Instance,
    api_version: u32,
) -> Result<Vec<AdapterInfo>, RhiError> {
    let physical_devices = check("vkEnumeratePhysicalDevices", unsafe {
        instance.enumerate_physical_devices()
    })?;
    Ok(physical_devices
        .into_iter()
        .map(|physical_device| {
            let props = unsafe { instance.get_physical_device_properties(physical_device) };
            AdapterInfo {
                name: cstr_to_string(props.device_name.as_ptr()),
                api: GraphicsApi::Vulkan,
                vendor_id: props.vendor_id,
                device_id: props.device_id,
                luid: adapter_luid(instance, api_version, physical_device),
            }
        })
        .collect())
}

/// A Vulkan physical device identity.
#[derive(Debug)]
pub struct VulkanAdapter {
    pub(crate) info: AdapterInfo,
}

impl GraphicsAdapter for VulkanAdapter {
    fn info(&self) -> &AdapterInfo {
        &self.info
    }

    fn create_device(
        &self,
        desc: &DeviceDescriptor,
    ) -> Result<Arc<dyn GraphicsDevice>, RhiError> {
        let device: Arc<dyn GraphicsDevice> = Arc::new(VulkanDevice::new(&self.info, desc)?);
        if desc.enable_validation {
            Ok(DeviceValidator::wrap(device))
        } else {
            Ok(device)
        }
    }
}
