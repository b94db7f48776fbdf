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

//! Minimal CUDA driver API binding, resolved at runtime through
//! `libloading`. Only the entry points the backend needs are loaded.

use std::os::raw::{c_char, c_int, c_uint, c_void};
use std::sync::Arc;

use libloading::Library;

pub(crate) type CuResult = c_int;
pub(crate) type CuDevice = c_int;
pub(crate) type CuContext = *mut c_void;
pub(crate) type CuDeviceptr = u64;

pub(crate) const CUDA_SUCCESS: CuResult = 0;

// CUdevice_attribute values from cuda.h.
pub(crate) const ATTR_MAX_THREADS_PER_BLOCK: c_int = 1;
pub(crate) const ATTR_MAX_BLOCK_DIM_X: c_int = 2;
pub(crate) const ATTR_MAX_BLOCK_DIM_Y: c_int = 3;
pub(crate) const ATTR_MAX_BLOCK_DIM_Z: c_int = 4;
pub(crate) const ATTR_MAX_GRID_DIM_X: c_int = 5;
pub(crate) const ATTR_MAX_GRID_DIM_Y: c_int = 6;
pub(crate) const ATTR_MAX_GRID_DIM_Z: c_int = 7;
pub(crate) const ATTR_CLOCK_RATE_KHZ: c_int = 13;
pub(crate) const ATTR_MAX_TEXTURE1D_WIDTH: c_int = 21;
pub(crate) const ATTR_MAX_TEXTURE2D_WIDTH: c_int = 22;
pub(crate) const ATTR_MAX_TEXTURE3D_WIDTH: c_int = 24;
pub(crate) const ATTR_MAX_TEXTURE2D_ARRAY_LAYERS: c_int = 29;
pub(crate) const ATTR_MAX_TEXTURECUBEMAP_WIDTH: c_int = 52;

#[cfg(windows)]
const LIBRARY_NAMES: &[&str] = &["nvcuda.dll"];
#[cfg(not(windows))]
const LIBRARY_NAMES: &[&str] = &["libcuda.so.1", "libcuda.so"];

/// Resolved driver entry points. The library handle is kept last so the
/// function pointers never outlive it.
pub(crate) struct CudaApi {
    pub cu_device_get_count: unsafe extern "C" fn(*mut c_int) -> CuResult,
    pub cu_device_get: unsafe extern "C" fn(*mut CuDevice, c_int) -> CuResult,
    pub cu_device_get_name: unsafe extern "C" fn(*mut c_char, c_int, CuDevice) -> CuResult,
    pub cu_device_get_uuid: unsafe extern "C" fn(*mut u8, CuDevice) -> CuResult,
    pub cu_device_get_attribute: unsafe extern "C" fn(*mut c_int, c_int, CuDevice) -> CuResult,
    pub cu_device_primary_ctx_retain: unsafe extern "C" fn(*mut CuContext, CuDevice) -> CuResult,
    pub cu_device_primary_ctx_release: unsafe extern "C" fn(CuDevice) -> CuResult,
    pub cu_ctx_set_current: unsafe extern "C" fn(CuContext) -> CuResult,
    pub cu_mem_alloc: unsafe extern "C" fn(*mut CuDeviceptr, usize) -> CuResult,
    pub cu_mem_free: unsafe extern "C" fn(CuDeviceptr) -> CuResult,
    pub cu_mem_alloc_host: unsafe extern "C" fn(*mut *mut c_void, usize) -> CuResult,
    pub cu_mem_free_host: unsafe extern "C" fn(*mut c_void) -> CuResult,
    pub cu_mem_host_get_device_pointer:
        unsafe extern "C" fn(*mut CuDeviceptr, *mut c_void, c_uint) -> CuResult,
    _lib: Library,
}

impl CudaApi {
    /// Loads and initializes the driver. Returns `None` (with a debug log)
    /// when the library or a required symbol is missing, or when `cuInit`
    /// fails; callers treat that as "no CUDA adapters".
    pub(crate) fn load() -> Option<Arc<CudaApi>> {
        let lib = LIBRARY_NAMES
            .iter()
            .find_map(|name| unsafe { Library::new(name) }.ok());
        let lib = match lib {
            Some(lib) => lib,
            None => {
                log::debug!("CUDA driver library not found");
                return None;
            }
        };

        macro_rules! sym {
            ($ty:ty, $name:literal) => {
                match unsafe { lib.get::<$ty>($name) } {
                    Ok(symbol) => *symbol,
                    Err(err) => {
                        log::debug!(
                            "CUDA driver is missing {}: {err}",
                            String::from_utf8_lossy(&$name[..$name.len() - 1])
                        );
                        return None;
                    }
                }
            };
        }

        let cu_init = sym!(unsafe extern "C" fn(c_uint) -> CuResult, b"cuInit\0");
        let api = CudaApi {
            cu_device_get_count: sym!(
                unsafe extern "C" fn(*mut c_int) -> CuResult,
                b"cuDeviceGetCount\0"
            ),
            cu_device_get: sym!(
                unsafe extern "C" fn(*mut CuDevice, c_int) -> CuResult,
                b"cuDeviceGet\0"
            ),
            cu_device_get_name: sym!(
                unsafe extern "C" fn(*mut c_char, c_int, CuDevice) -> CuResult,
                b"cuDeviceGetName\0"
            ),
            cu_device_get_uuid: sym!(
                unsafe extern "C" fn(*mut u8, CuDevice) -> CuResult,
                b"cuDeviceGetUuid\0"
            ),
            cu_device_get_attribute: sym!(
                unsafe extern "C" fn(*mut c_int, c_int, CuDevice) -> CuResult,
                b"cuDeviceGetAttribute\0"
            ),
            cu_device_primary_ctx_retain: sym!(
                unsafe extern "C" fn(*mut CuContext, CuDevice) -> CuResult,
                b"cuDevicePrimaryCtxRetain\0"
            ),
            cu_device_primary_ctx_release: sym!(
                unsafe extern "C" fn(CuDevice) -> CuResult,
                b"cuDevicePrimaryCtxRelease_v2\0"
            ),
            cu_ctx_set_current: sym!(
                unsafe extern "C" fn(CuContext) -> CuResult,
                b"cuCtxSetCurrent\0"
            ),
            cu_mem_alloc: sym!(
                unsafe extern "C" fn(*mut CuDeviceptr, usize) -> CuResult,
                b"cuMemAlloc_v2\0"
            ),
            cu_mem_free: sym!(
                unsafe extern "C" fn(CuDeviceptr) -> CuResult,
                b"cuMemFree_v2\0"
            ),
            cu_mem_alloc_host: sym!(
                unsafe extern "C" fn(*mut *mut c_void, usize) -> CuResult,
                b"cuMemAllocHost_v2\0"
            ),
            cu_mem_free_host: sym!(
                unsafe extern "C" fn(*mut c_void) -> CuResult,
                b"cuMemFreeHost\0"
            ),
            cu_mem_host_get_device_pointer: sym!(
                unsafe extern "C" fn(*mut CuDeviceptr, *mut c_void, c_uint) -> CuResult,
                b"cuMemHostGetDevicePointer_v2\0"
            ),
            _lib: lib,
        };

        let code = unsafe { cu_init(0) };
        if code != CUDA_SUCCESS {
            log::debug!("cuInit failed with error {code}");
            return None;
        }
        Some(Arc::new(api))
    }

    /// Reads a device attribute, returning 0 when the query fails.
    pub(crate) fn attribute(&self, device: CuDevice, attribute: c_int) -> u32 {
        let mut value: c_int = 0;
        let code = unsafe { (self.cu_device_get_attribute)(&mut value, attribute, device) };
        if code != CUDA_SUCCESS {
            log::debug!("cuDeviceGetAttribute({attribute}) failed with error {code}");
            return 0;
        }
        value.max(0) as u32
    }
}
