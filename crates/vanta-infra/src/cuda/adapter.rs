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

//! CUDA adapter enumeration.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::sync::Arc;

use vanta_core::rhi::api::{AdapterInfo, DeviceDescriptor, GraphicsApi};
use vanta_core::rhi::traits::{GraphicsAdapter, GraphicsDevice};
use vanta_core::rhi::DeviceValidator;
use vanta_core::RhiError;

use super::api::{CuDevice, CudaApi, CUDA_SUCCESS};
use super::check;
use super::device::CudaDevice;

const NVIDIA_VENDOR_ID: u32 = 0x10de;

/// Lists CUDA devices. A missing driver yields an empty list.
pub fn enum_adapters() -> Result<Vec<Arc<dyn GraphicsAdapter>>, RhiError> {
    let api = match CudaApi::load() {
        Some(api) => api,
        None => return Ok(Vec::new()),
    };

    let mut count = 0;
    check("cuDeviceGetCount", unsafe {
        (api.cu_device_get_count)(&mut count)
    })?;
    log::debug!("enumerated {count} CUDA adapter(s)");

    let mut adapters: Vec<Arc<dyn GraphicsAdapter>> = Vec::with_capacity(count.max(0) as usize);
    for ordinal in 0..count {
        let mut device: CuDevice = 0;
        check("cuDeviceGet", unsafe {
            (api.cu_device_get)(&mut device, ordinal)
        })?;

        let mut name_buf = [0 as c_char; 256];
        check("cuDeviceGetName", unsafe {
            (api.cu_device_get_name)(name_buf.as_mut_ptr(), name_buf.len() as i32, device)
        })?;
        let name = unsafe { CStr::from_ptr(name_buf.as_ptr()) }
            .to_string_lossy()
            .into_owned();

        // Old drivers may not expose UUIDs; fall back to the ordinal.
        let mut luid = [0u8; 16];
        let code = unsafe { (api.cu_device_get_uuid)(luid.as_mut_ptr(), device) };
        if code != CUDA_SUCCESS {
            luid[..4].copy_from_slice(&(ordinal as u32).to_le_bytes());
        }

        adapters.push(Arc::new(CudaAdapter {
            api: Arc::clone(&api),
            device,
            info: AdapterInfo {
                name,
                api: GraphicsApi::Cuda,
                vendor_id: NVIDIA_VENDOR_ID,
                device_id: ordinal as u32,
                luid,
            },
        }));
    }
    Ok(adapters)
}

/// A CUDA device identity. Holds the driver library open but no context.
pub struct CudaAdapter {
    pub(crate) api: Arc<CudaApi>,
    pub(crate) device: CuDevice,
    pub(crate) info: AdapterInfo,
}

impl std::fmt::Debug for CudaAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CudaAdapter")
            .field("info", &self.info)
            .finish()
    }
}

impl GraphicsAdapter for CudaAdapter {
    fn info(&self) -> &AdapterInfo {
        &self.info
    }

    fn create_device(
        &self,
        desc: &DeviceDescriptor,
    ) -> Result<Arc<dyn GraphicsDevice>, RhiError> {
        let device: Arc<dyn GraphicsDevice> = Arc::new(CudaDevice::new(
            Arc::clone(&self.api),
            self.device,
            &self.info,
            desc,
        )?);
        if desc.enable_validation {
            Ok(DeviceValidator::wrap(device))
        } else {
            Ok(device)
        }
    }
}
