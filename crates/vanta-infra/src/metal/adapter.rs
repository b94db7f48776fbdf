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

//! Metal adapter enumeration.

use std::sync::Arc;

use metal::Device;
use vanta_core::rhi::api::{AdapterInfo, AdapterLuid, DeviceDescriptor, GraphicsApi};
use vanta_core::rhi::traits::{GraphicsAdapter, GraphicsDevice};
use vanta_core::rhi::DeviceValidator;
use vanta_core::RhiError;

use super::device::MetalDevice;

const APPLE_VENDOR_ID: u32 = 0x106b;

/// The IORegistry id, stable for the machine's uptime, stands in for a LUID.
pub(crate) fn registry_luid(device: &Device) -> AdapterLuid {
    let mut luid = [0u8; 16];
    luid[..8].copy_from_slice(&device.registry_id().to_le_bytes());
    luid
}

/// Lists Metal devices. Headless configurations yield an empty list.
pub fn enum_adapters() -> Result<Vec<Arc<dyn GraphicsAdapter>>, RhiError> {
    let devices = Device::all();
    log::debug!("enumerated {} metal adapter(s)", devices.len());
    Ok(devices
        .iter()
        .enumerate()
        .map(|(index, device)| {
            Arc::new(MetalAdapter {
                info: AdapterInfo {
                    name: device.name().to_string(),
                    api: GraphicsApi::Metal,
                    vendor_id: APPLE_VENDOR_ID,
                    device_id: index as u32,
                    luid: registry_luid(device),
                },
            }) as Arc<dyn GraphicsAdapter>
        })
        .collect())
}

/// A Metal device identity. Holds no native object; device creation looks
/// the `MTLDevice` up again by registry id.
#[derive(Debug)]
pub struct MetalAdapter {
    pub(crate) info: AdapterInfo,
}

impl GraphicsAdapter for MetalAdapter {
    fn info(&self) -> &AdapterInfo {
        &self.info
    }

    fn create_device(
        &self,
        desc: &DeviceDescriptor,
    ) -> Result<Arc<dyn GraphicsDevice>, RhiError> {
        let device: Arc<dyn GraphicsDevice> = Arc::new(MetalDevice::new(&self.info, desc)?);
        if desc.enable_validation {
            Ok(DeviceValidator::wrap(device))
        } else {
            Ok(device)
        }
    }
}
