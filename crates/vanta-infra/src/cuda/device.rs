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

//! CUDA logical device, backed by the device's primary context.

use std::fmt;
use std::ptr::NonNull;
use std::sync::Arc;

use vanta_core::rhi::api::{
    AdapterInfo, BufferDescriptor, BufferRange, DeviceDescriptor, DeviceFeatures, DeviceInfo,
    DeviceLimits, GraphicsApi, HeapDescriptor, MemoryType, SamplerDescriptor, SizeAndAlign,
    TextureDescriptor,
};
use vanta_core::rhi::base::DeviceBase;
use vanta_core::rhi::traits::{Buffer, GraphicsDevice, Heap, Sampler, Texture};
use vanta_core::RhiError;

use super::api::{self, CuContext, CuDevice, CudaApi};
use super::check;
use super::resources::{CudaBuffer, CudaHeap};

/// A CUDA device handle. Cloning is cheap; resources keep a clone alive so
/// the primary context outlives every allocation made in it.
#[derive(Clone)]
pub struct CudaDevice {
    pub(crate) inner: Arc<DeviceShared>,
}

pub(crate) struct DeviceShared {
    pub(crate) base: DeviceBase,
    pub(crate) api: Arc<CudaApi>,
    pub(crate) device: CuDevice,
    context: CuContext,
}

// The driver API is thread-safe; the context pointer is only handed back
// to the driver.
unsafe impl Send for DeviceShared {}
unsafe impl Sync for DeviceShared {}

impl Drop for DeviceShared {
    fn drop(&mut self) {
        log::debug!(
            "releasing CUDA primary context on \"{}\"",
            self.base.info().adapter_name
        );
        let code = unsafe { (self.api.cu_device_primary_ctx_release)(self.device) };
        if code != api::CUDA_SUCCESS {
            log::warn!("cuDevicePrimaryCtxRelease failed with error {code}");
        }
    }
}

impl fmt::Debug for CudaDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CudaDevice")
            .field("adapter", &self.inner.base.info().adapter_name)
            .finish()
    }
}

impl CudaDevice {
    pub(crate) fn new(
        api: Arc<CudaApi>,
        device: CuDevice,
        adapter: &AdapterInfo,
        desc: &DeviceDescriptor,
    ) -> Result<Self, RhiError> {
        let mut context: CuContext = std::ptr::null_mut();
        check("cuDevicePrimaryCtxRetain", unsafe {
            (api.cu_device_primary_ctx_retain)(&mut context, device)
        })?;
        if let Err(err) = check("cuCtxSetCurrent", unsafe {
            (api.cu_ctx_set_current)(context)
        }) {
            let _ = unsafe { (api.cu_device_primary_ctx_release)(device) };
            return Err(err);
        }

        let info = build_info(&api, device, adapter);
        log::info!("created CUDA device on \"{}\"", info.adapter_name);
        Ok(Self {
            inner: Arc::new(DeviceShared {
                base: DeviceBase::new(desc, info),
                api,
                device,
                context,
            }),
        })
    }

    /// Binds this device's primary context to the calling thread. Memory
    /// operations require it.
    pub(crate) fn make_current(&self) -> Result<(), RhiError> {
        check("cuCtxSetCurrent", unsafe {
            (self.inner.api.cu_ctx_set_current)(self.inner.context)
        })
    }

    fn expect_own_buffer<'a>(&self, buffer: &'a dyn Buffer) -> Result<&'a CudaBuffer, RhiError> {
        let buffer = buffer.as_any().downcast_ref::<CudaBuffer>().ok_or_else(|| {
            RhiError::InvalidResource("buffer was not created by a CUDA device".to_string())
        })?;
        if !Arc::ptr_eq(&buffer.device.inner, &self.inner) {
            return Err(RhiError::InvalidResource(
                "buffer belongs to a different CUDA device".to_string(),
            ));
        }
        Ok(buffer)
    }
}

impl GraphicsDevice for CudaDevice {
    fn desc(&self) -> &DeviceDescriptor {
        self.inner.base.desc()
    }

    fn info(&self) -> &DeviceInfo {
        self.inner.base.info()
    }

    fn create_heap(&self, desc: &HeapDescriptor) -> Result<Arc<dyn Heap>, RhiError> {
        CudaHeap::create(self, desc)
    }

    fn create_buffer(&self, desc: &BufferDescriptor) -> Result<Arc<dyn Buffer>, RhiError> {
        CudaBuffer::create(self, desc)
    }

    fn create_buffer_on_heap(
        &self,
        desc: &BufferDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Buffer>, RhiError> {
        CudaBuffer::create_on_heap(self, desc, heap, offset)
    }

    fn buffer_size_and_align(&self, desc: &BufferDescriptor) -> SizeAndAlign {
        // Driver allocations are 256-byte aligned.
        SizeAndAlign {
            size: desc.size,
            align: 256,
        }
    }

    fn map_buffer(
        &self,
        buffer: &dyn Buffer,
        range: BufferRange,
    ) -> Result<Option<NonNull<u8>>, RhiError> {
        let buffer = self.expect_own_buffer(buffer)?;
        if buffer.desc().memory_type == MemoryType::DeviceLocal {
            return Ok(None);
        }
        let range = range.resolve(buffer.desc().size);
        Ok(buffer.host_ptr(range.offset))
    }

    fn unmap_buffer(&self, buffer: &dyn Buffer) -> Result<(), RhiError> {
        // Page-locked host memory stays mapped for the buffer's lifetime.
        self.expect_own_buffer(buffer)?;
        Ok(())
    }

    fn create_texture(&self, _desc: &TextureDescriptor) -> Result<Arc<dyn Texture>, RhiError> {
        Err(RhiError::Unsupported(
            "the CUDA backend exposes linear memory only; textures are unavailable".to_string(),
        ))
    }

    fn create_texture_on_heap(
        &self,
        _desc: &TextureDescriptor,
        _heap: &Arc<dyn Heap>,
        _offset: u64,
    ) -> Result<Arc<dyn Texture>, RhiError> {
        Err(RhiError::Unsupported(
            "the CUDA backend exposes linear memory only; textures are unavailable".to_string(),
        ))
    }

    fn texture_size_and_align(&self, desc: &TextureDescriptor) -> SizeAndAlign {
        let info = desc.format.info();
        let pixels = desc.width as u64 * desc.height as u64 * desc.depth as u64;
        SizeAndAlign {
            size: pixels * info.bytes_per_block as u64 * desc.array_size as u64,
            align: 512,
        }
    }

    fn create_sampler(&self, _desc: &SamplerDescriptor) -> Result<Arc<dyn Sampler>, RhiError> {
        Err(RhiError::Unsupported(
            "the CUDA backend has no sampler objects".to_string(),
        ))
    }
}

fn build_info(api: &CudaApi, device: CuDevice, adapter: &AdapterInfo) -> DeviceInfo {
    let limits = DeviceLimits {
        max_texture_dimension_1d: api.attribute(device, api::ATTR_MAX_TEXTURE1D_WIDTH),
        max_texture_dimension_2d: api.attribute(device, api::ATTR_MAX_TEXTURE2D_WIDTH),
        max_texture_dimension_3d: api.attribute(device, api::ATTR_MAX_TEXTURE3D_WIDTH),
        max_texture_dimension_cube: api.attribute(device, api::ATTR_MAX_TEXTURECUBEMAP_WIDTH),
        max_texture_array_layers: api.attribute(device, api::ATTR_MAX_TEXTURE2D_ARRAY_LAYERS),
        max_compute_threads_per_group: api.attribute(device, api::ATTR_MAX_THREADS_PER_BLOCK),
        max_compute_thread_group_size: [
            api.attribute(device, api::ATTR_MAX_BLOCK_DIM_X),
            api.attribute(device, api::ATTR_MAX_BLOCK_DIM_Y),
            api.attribute(device, api::ATTR_MAX_BLOCK_DIM_Z),
        ],
        max_compute_dispatch_thread_groups: [
            api.attribute(device, api::ATTR_MAX_GRID_DIM_X),
            api.attribute(device, api::ATTR_MAX_GRID_DIM_Y),
            api.attribute(device, api::ATTR_MAX_GRID_DIM_Z),
        ],
        ..DeviceLimits::default()
    };
    let clock_khz = api.attribute(device, api::ATTR_CLOCK_RATE_KHZ) as u64;
    DeviceInfo {
        api: GraphicsApi::Cuda,
        limits,
        // Every allocation has a device pointer, so addresses always work.
        features: DeviceFeatures::BUFFER_DEVICE_ADDRESS,
        extended_features: Vec::new(),
        adapter_name: adapter.name.clone(),
        timestamp_frequency: clock_khz * 1000,
    }
}
