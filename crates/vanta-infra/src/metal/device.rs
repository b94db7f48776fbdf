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

//! Metal logical device.

use std::fmt;
use std::ptr::NonNull;
use std::sync::Arc;

use metal::Device;
use vanta_core::rhi::api::{
    AdapterInfo, BufferDescriptor, BufferRange, DeviceDescriptor, DeviceFeatures, DeviceInfo,
    DeviceLimits, GraphicsApi, HeapDescriptor, MemoryType, SamplerDescriptor, SizeAndAlign,
    TextureDescriptor,
};
use vanta_core::rhi::base::DeviceBase;
use vanta_core::rhi::traits::{Buffer, GraphicsDevice, Heap, Sampler, Texture};
use vanta_core::RhiError;

use super::adapter::registry_luid;
use super::conversions;
use super::resources::{MetalBuffer, MetalHeap, MetalSampler, MetalTexture};

/// A Metal device handle. Cloning is cheap; resources keep a clone alive.
#[derive(Clone)]
pub struct MetalDevice {
    pub(crate) inner: Arc<DeviceShared>,
}

pub(crate) struct DeviceShared {
    pub(crate) base: DeviceBase,
    pub(crate) device: Device,
}

// MTLDevice is documented as thread-safe.
unsafe impl Send for DeviceShared {}
unsafe impl Sync for DeviceShared {}

impl fmt::Debug for MetalDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetalDevice")
            .field("adapter", &self.inner.base.info().adapter_name)
            .finish()
    }
}

impl MetalDevice {
    pub(crate) fn new(adapter: &AdapterInfo, desc: &DeviceDescriptor) -> Result<Self, RhiError> {
        let device = Device::all()
            .into_iter()
            .find(|device| registry_luid(device) == adapter.luid)
            .ok_or(RhiError::AdapterNotFound)?;

        let info = build_info(&device, adapter);
        log::info!("created metal device on \"{}\"", info.adapter_name);
        Ok(Self {
            inner: Arc::new(DeviceShared {
                base: DeviceBase::new(desc, info),
                device,
            }),
        })
    }

    pub(crate) fn raw(&self) -> &Device {
        &self.inner.device
    }

    fn expect_own_buffer<'a>(&self, buffer: &'a dyn Buffer) -> Result<&'a MetalBuffer, RhiError> {
        let buffer = buffer.as_any().downcast_ref::<MetalBuffer>().ok_or_else(|| {
            RhiError::InvalidResource("buffer was not created by a metal device".to_string())
        })?;
        if !Arc::ptr_eq(&buffer.device.inner, &self.inner) {
            return Err(RhiError::InvalidResource(
                "buffer belongs to a different metal device".to_string(),
            ));
        }
        Ok(buffer)
    }
}

impl GraphicsDevice for MetalDevice {
    fn desc(&self) -> &DeviceDescriptor {
        self.inner.base.desc()
    }

    fn info(&self) -> &DeviceInfo {
        self.inner.base.info()
    }

    fn create_heap(&self, desc: &HeapDescriptor) -> Result<Arc<dyn Heap>, RhiError> {
        MetalHeap::create(self, desc)
    }

    fn create_buffer(&self, desc: &BufferDescriptor) -> Result<Arc<dyn Buffer>, RhiError> {
        MetalBuffer::create(self, desc)
    }

    fn create_buffer_on_heap(
        &self,
        desc: &BufferDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Buffer>, RhiError> {
        MetalBuffer::create_on_heap(self, desc, heap, offset)
    }

    fn buffer_size_and_align(&self, desc: &BufferDescriptor) -> SizeAndAlign {
        let options = conversions::resource_options(desc.memory_type);
        let required = self.inner.device.heap_buffer_size_and_align(desc.size, options);
        SizeAndAlign {
            size: required.size,
            align: required.align,
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
        if range.size == 0 {
            return Err(RhiError::InvalidDescriptor(
                "mapped range is empty".to_string(),
            ));
        }
        Ok(buffer.host_ptr(range.offset))
    }

    fn unmap_buffer(&self, buffer: &dyn Buffer) -> Result<(), RhiError> {
        // Shared storage stays CPU-visible for the buffer's lifetime.
        self.expect_own_buffer(buffer)?;
        Ok(())
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> Result<Arc<dyn Texture>, RhiError> {
        MetalTexture::create(self, desc)
    }

    fn create_texture_on_heap(
        &self,
        desc: &TextureDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Texture>, RhiError> {
        MetalTexture::create_on_heap(self, desc, heap, offset)
    }

    fn texture_size_and_align(&self, desc: &TextureDescriptor) -> SizeAndAlign {
        match MetalTexture::native_descriptor(desc) {
            Ok(native) => {
                let required = self.inner.device.heap_texture_size_and_align(&native);
                SizeAndAlign {
                    size: required.size,
                    align: required.align,
                }
            }
            Err(err) => {
                log::warn!("texture size query fell back to a linear estimate: {err}");
                let info = desc.format.info();
                let pixels = desc.width as u64 * desc.height as u64 * desc.depth as u64;
                SizeAndAlign {
                    size: pixels * info.bytes_per_block as u64 * desc.array_size as u64,
                    align: 4096,
                }
            }
        }
    }

    fn create_sampler(&self, desc: &SamplerDescriptor) -> Result<Arc<dyn Sampler>, RhiError> {
        MetalSampler::create(self, desc)
    }
}

fn build_info(device: &Device, adapter: &AdapterInfo) -> DeviceInfo {
    let threadgroup = device.max_threads_per_threadgroup();
    let limits = DeviceLimits {
        // MTLDevice has no query for these; common macOS GPU family limits.
        max_texture_dimension_1d: 16384,
        max_texture_dimension_2d: 16384,
        max_texture_dimension_3d: 2048,
        max_texture_dimension_cube: 16384,
        max_texture_array_layers: 2048,
        max_vertex_input_elements: 31,
        max_vertex_input_element_offset: u32::MAX,
        max_vertex_streams: 31,
        max_vertex_stream_stride: u32::MAX,
        max_compute_threads_per_group: threadgroup.width as u32,
        max_compute_thread_group_size: [
            threadgroup.width as u32,
            threadgroup.height as u32,
            threadgroup.depth as u32,
        ],
        max_compute_dispatch_thread_groups: [u16::MAX as u32; 3],
        max_viewports: 16,
        max_viewport_dimensions: [16384, 16384],
        max_framebuffer_dimensions: [16384, 16384, 2048],
        max_shader_visible_samplers: 16,
    };
    DeviceInfo {
        api: GraphicsApi::Metal,
        limits,
        features: DeviceFeatures::BUFFER_DEVICE_ADDRESS | DeviceFeatures::SAMPLER_ANISOTROPY,
        extended_features: Vec::new(),
        adapter_name: adapter.name.clone(),
        // GPU timestamps are converted to nanoseconds.
        timestamp_frequency: 1_000_000_000,
    }
}
