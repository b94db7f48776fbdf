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

//! CUDA heaps and buffers over driver allocations.
//!
//! `DeviceLocal` memory comes from `cuMemAlloc`; `Upload` and `ReadBack`
//! memory is page-locked host memory with a matching device pointer, so
//! mapping never involves a driver call.

use std::fmt;
use std::os::raw::c_void;
use std::ptr::NonNull;
use std::sync::Arc;

use vanta_core::rhi::api::{
    BufferDescriptor, DeviceAddress, HeapDescriptor, MemoryType, NativeHandle, NativeHandleType,
};
use vanta_core::rhi::base::{BufferBase, HeapBase};
use vanta_core::rhi::traits::{Buffer, Heap, Resource};
use vanta_core::RhiError;

use super::api::CuDeviceptr;
use super::check;
use super::device::CudaDevice;

const PLACEMENT_ALIGN: u64 = 256;

pub(crate) struct Allocation {
    device_ptr: CuDeviceptr,
    host_ptr: *mut c_void,
}

/// Allocates per the memory type. Host allocations are mapped into the
/// device address space so both pointers are always available.
fn allocate(device: &CudaDevice, memory_type: MemoryType, size: u64) -> Result<Allocation, RhiError> {
    device.make_current()?;
    let api = &device.inner.api;
    match memory_type {
        MemoryType::DeviceLocal => {
            let mut device_ptr: CuDeviceptr = 0;
            check("cuMemAlloc", unsafe {
                (api.cu_mem_alloc)(&mut device_ptr, size as usize)
            })?;
            Ok(Allocation {
                device_ptr,
                host_ptr: std::ptr::null_mut(),
            })
        }
        MemoryType::Upload | MemoryType::ReadBack => {
            let mut host_ptr: *mut c_void = std::ptr::null_mut();
            check("cuMemAllocHost", unsafe {
                (api.cu_mem_alloc_host)(&mut host_ptr, size as usize)
            })?;
            let mut device_ptr: CuDeviceptr = 0;
            if let Err(err) = check("cuMemHostGetDevicePointer", unsafe {
                (api.cu_mem_host_get_device_pointer)(&mut device_ptr, host_ptr, 0)
            }) {
                let _ = unsafe { (api.cu_mem_free_host)(host_ptr) };
                return Err(err);
            }
            Ok(Allocation {
                device_ptr,
                host_ptr,
            })
        }
    }
}

fn free(device: &CudaDevice, memory_type: MemoryType, alloc: &Allocation) {
    if let Err(err) = device.make_current() {
        log::warn!("failed to bind CUDA context while freeing memory: {err}");
        return;
    }
    let api = &device.inner.api;
    let code = match memory_type {
        MemoryType::DeviceLocal => unsafe { (api.cu_mem_free)(alloc.device_ptr) },
        MemoryType::Upload | MemoryType::ReadBack => unsafe {
            (api.cu_mem_free_host)(alloc.host_ptr)
        },
    };
    if code != super::api::CUDA_SUCCESS {
        log::warn!("freeing CUDA memory failed with error {code}");
    }
}

/// A single driver allocation that placed buffers carve sub-ranges from.
pub struct CudaHeap {
    base: HeapBase,
    pub(crate) device: CudaDevice,
    pub(crate) alloc: Allocation,
}

unsafe impl Send for CudaHeap {}
unsafe impl Sync for CudaHeap {}

impl CudaHeap {
    pub(crate) fn create(
        device: &CudaDevice,
        desc: &HeapDescriptor,
    ) -> Result<Arc<dyn Heap>, RhiError> {
        if desc.size == 0 {
            return Err(RhiError::InvalidDescriptor(
                "heap size must be non-zero".to_string(),
            ));
        }
        let alloc = allocate(device, desc.memory_type, desc.size)?;
        Ok(Arc::new(Self {
            base: HeapBase::new(desc),
            device: device.clone(),
            alloc,
        }))
    }
}

impl fmt::Debug for CudaHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CudaHeap")
            .field("desc", self.base.desc())
            .finish()
    }
}

impl Drop for CudaHeap {
    fn drop(&mut self) {
        free(&self.device, self.base.desc().memory_type, &self.alloc);
    }
}

impl Resource for CudaHeap {
    fn native_handle(&self, handle_type: NativeHandleType) -> NativeHandle {
        match handle_type {
            NativeHandleType::CuDevicePtr => {
                NativeHandle::new(handle_type, self.alloc.device_ptr)
            }
            NativeHandleType::CuHostPtr if !self.alloc.host_ptr.is_null() => {
                NativeHandle::new(handle_type, self.alloc.host_ptr as u64)
            }
            _ => NativeHandle::invalid(),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Heap for CudaHeap {
    fn desc(&self) -> &HeapDescriptor {
        self.base.desc()
    }
}

/// Linear device memory, either owning its allocation or placed in a heap.
pub struct CudaBuffer {
    base: BufferBase,
    pub(crate) device: CudaDevice,
    alloc: Allocation,
    owns_memory: bool,
    _heap: Option<Arc<dyn Heap>>,
}

unsafe impl Send for CudaBuffer {}
unsafe impl Sync for CudaBuffer {}

impl CudaBuffer {
    pub(crate) fn create(
        device: &CudaDevice,
        desc: &BufferDescriptor,
    ) -> Result<Arc<dyn Buffer>, RhiError> {
        if desc.size == 0 {
            return Err(RhiError::InvalidDescriptor(
                "buffer size must be non-zero".to_string(),
            ));
        }
        let alloc = allocate(device, desc.memory_type, desc.size)?;
        Ok(Arc::new(Self {
            base: BufferBase::new(desc),
            device: device.clone(),
            alloc,
            owns_memory: true,
            _heap: None,
        }))
    }

    pub(crate) fn create_on_heap(
        device: &CudaDevice,
        desc: &BufferDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Buffer>, RhiError> {
        if desc.size == 0 {
            return Err(RhiError::InvalidDescriptor(
                "buffer size must be non-zero".to_string(),
            ));
        }
        let cuda_heap = heap.as_any().downcast_ref::<CudaHeap>().ok_or_else(|| {
            RhiError::InvalidResource("heap was not created by a CUDA device".to_string())
        })?;
        if !Arc::ptr_eq(&cuda_heap.device.inner, &device.inner) {
            return Err(RhiError::InvalidResource(
                "heap belongs to a different CUDA device".to_string(),
            ));
        }
        if cuda_heap.desc().memory_type != desc.memory_type {
            return Err(RhiError::InvalidResource(format!(
                "buffer memory type {:?} does not match heap memory type {:?}",
                desc.memory_type,
                cuda_heap.desc().memory_type
            )));
        }
        if offset % PLACEMENT_ALIGN != 0 {
            return Err(RhiError::InvalidResource(format!(
                "placement offset {offset} is not {PLACEMENT_ALIGN}-byte aligned"
            )));
        }
        let end = offset.checked_add(desc.size).ok_or_else(|| {
            RhiError::InvalidResource("placement range overflows".to_string())
        })?;
        if end > cuda_heap.desc().size {
            return Err(RhiError::InvalidResource(format!(
                "placement range [{offset}, {end}) exceeds heap size {}",
                cuda_heap.desc().size
            )));
        }

        let host_ptr = if cuda_heap.alloc.host_ptr.is_null() {
            std::ptr::null_mut()
        } else {
            unsafe { cuda_heap.alloc.host_ptr.cast::<u8>().add(offset as usize) }.cast()
        };
        Ok(Arc::new(Self {
            base: BufferBase::new(desc),
            device: device.clone(),
            alloc: Allocation {
                device_ptr: cuda_heap.alloc.device_ptr + offset,
                host_ptr,
            },
            owns_memory: false,
            _heap: Some(Arc::clone(heap)),
        }))
    }

    /// Host pointer at `offset` bytes into the buffer, `None` for
    /// device-only memory.
    pub(crate) fn host_ptr(&self, offset: u64) -> Option<NonNull<u8>> {
        NonNull::new(self.alloc.host_ptr.cast::<u8>())
            .map(|ptr| unsafe { NonNull::new_unchecked(ptr.as_ptr().add(offset as usize)) })
    }
}

impl fmt::Debug for CudaBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CudaBuffer")
            .field("desc", self.base.desc())
            .field("owns_memory", &self.owns_memory)
            .finish()
    }
}

impl Drop for CudaBuffer {
    fn drop(&mut self) {
        if self.owns_memory {
            free(&self.device, self.base.desc().memory_type, &self.alloc);
        }
    }
}

impl Resource for CudaBuffer {
    fn native_handle(&self, handle_type: NativeHandleType) -> NativeHandle {
        match handle_type {
            NativeHandleType::CuDevicePtr => {
                NativeHandle::new(handle_type, self.alloc.device_ptr)
            }
            NativeHandleType::CuHostPtr if !self.alloc.host_ptr.is_null() => {
                NativeHandle::new(handle_type, self.alloc.host_ptr as u64)
            }
            _ => NativeHandle::invalid(),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Buffer for CudaBuffer {
    fn desc(&self) -> &BufferDescriptor {
        self.base.desc()
    }

    fn device_address(&self) -> Result<DeviceAddress, RhiError> {
        Ok(self.alloc.device_ptr)
    }
}
