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

//! Vulkan logical device.

use std::fmt;
use std::ptr::NonNull;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use ash::vk;
use vanta_core::rhi::api::{
    AdapterInfo, BufferDescriptor, BufferRange, DeviceDescriptor, DeviceFeatures, DeviceInfo,
    DeviceLimits, GraphicsApi, HeapDescriptor, MemoryType, SamplerDescriptor, SizeAndAlign,
    TextureDescriptor,
};
use vanta_core::rhi::base::DeviceBase;
use vanta_core::rhi::traits::{Buffer, GraphicsDevice, Heap, Sampler, Texture};
use vanta_core::RhiError;

use super::resources::{VulkanBuffer, VulkanHeap, VulkanSampler, VulkanTexture};
use super::{check, conversions, create_instance, cstr_to_string, load_entry};

/// A Vulkan logical device. Cloning is cheap; all clones share the same
/// native device, and resources keep a clone alive until they are dropped.
#[derive(Clone)]
pub struct VulkanDevice {
    pub(crate) inner: Arc<DeviceShared>,
}

pub(crate) struct DeviceShared {
    pub(crate) base: DeviceBase,
    pub(crate) device: ash::Device,
    pub(crate) physical_device: vk::PhysicalDevice,
    pub(crate) memory_props: vk::PhysicalDeviceMemoryProperties,
    pub(crate) supports_device_address: bool,
    instance: ash::Instance,
    // Keeps the loader library mapped for as long as any handle exists.
    _entry: ash::Entry,
}

impl Drop for DeviceShared {
    fn drop(&mut self) {
        log::debug!(
            "destroying Vulkan device on \"{}\"",
            self.base.info().adapter_name
        );
        unsafe {
            let _ = self.device.device_wait_idle();
            self.device.destroy_device(None);
            self.instance.destroy_instance(None);
        }
    }
}

impl fmt::Debug for VulkanDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VulkanDevice")
            .field("adapter", &self.inner.base.info().adapter_name)
            .finish()
    }
}

impl VulkanDevice {
    pub(crate) fn new(adapter: &AdapterInfo, desc: &DeviceDescriptor) -> Result<Self, RhiError> {
        let entry = match load_entry() {
            Some(entry) => entry,
            None => {
                return Err(RhiError::Unsupported(
                    "Vulkan loader is not available".to_string(),
                ))
            }
        };
        let (instance, api_version) = create_instance(&entry, desc.enable_api_validation)?;
        match Self::init(&instance, api_version, adapter) {
            Ok(parts) => {
                let (device, physical_device, memory_props, info, supports_device_address) = parts;
                Ok(Self {
                    inner: Arc::new(DeviceShared {
                        base: DeviceBase::new(desc, info),
                        device,
                        physical_device,
                        memory_props,
                        supports_device_address,
                        instance,
                        _entry: entry,
                    }),
                })
            }
            Err(err) => {
                unsafe { instance.destroy_instance(None) };
                Err(err)
            }
        }
    }

    fn init(
        instance: &ash::Instance,
        api_version: u32,
        adapter: &AdapterInfo,
    ) -> Result<
        (
            ash::Device,
            vk::PhysicalDevice,
            vk::PhysicalDeviceMemoryProperties,
            DeviceInfo,
            bool,
        ),
        RhiError,
    > {
        let physical_devices = check("vkEnumeratePhysicalDevices", unsafe {
            instance.enumerate_physical_devices()
        })?;
        let physical_device = physical_devices
            .into_iter()
            .find(|pd| super::adapter_luid(instance, api_version, *pd) == adapter.luid)
            .ok_or(RhiError::AdapterNotFound)?;

        let props = unsafe { instance.get_physical_device_properties(physical_device) };
        let features = unsafe { instance.get_physical_device_features(physical_device) };
        let device_version = props.api_version.min(api_version);

        let mut supports_device_address = false;
        if device_version >= vk::API_VERSION_1_2 {
            let mut bda = vk::PhysicalDeviceBufferDeviceAddressFeatures::default();
            let mut features2 = vk::PhysicalDeviceFeatures2::builder().push_next(&mut bda);
            unsafe { instance.get_physical_device_features2(physical_device, &mut features2) };
            supports_device_address = bda.buffer_device_address == vk::TRUE;
        }

        let queue_props =
            unsafe { instance.get_physical_device_queue_family_properties(physical_device) };
        if queue_props.is_empty() {
            return Err(RhiError::Unsupported(
                "adapter reports no queue families".to_string(),
            ));
        }
        let priorities = [1.0f32];
        let queue_infos = [vk::DeviceQueueCreateInfo::builder()
            .queue_family_index(0)
            .queue_priorities(&priorities)
            .build()];

        let enabled_features = vk::PhysicalDeviceFeatures {
            sampler_anisotropy: features.sampler_anisotropy,
            ..Default::default()
        };
        let mut bda_enable =
            vk::PhysicalDeviceBufferDeviceAddressFeatures::builder().buffer_device_address(true);
        let mut create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_features(&enabled_features);
        if supports_device_address {
            create_info = create_info.push_next(&mut bda_enable);
        }
        let device = check("vkCreateDevice", unsafe {
            instance.create_device(physical_device, &create_info, None)
        })?;

        let memory_props =
            unsafe { instance.get_physical_device_memory_properties(physical_device) };

        let mut feature_flags = DeviceFeatures::NONE;
        let mut extended_features = Vec::new();
        if supports_device_address {
            feature_flags |= DeviceFeatures::BUFFER_DEVICE_ADDRESS;
            extended_features.push("buffer_device_address".to_string());
        }
        if features.sampler_anisotropy == vk::TRUE {
            feature_flags |= DeviceFeatures::SAMPLER_ANISOTROPY;
        }
        if props.limits.timestamp_compute_and_graphics == vk::TRUE {
            feature_flags |= DeviceFeatures::TIMESTAMP_QUERY;
        }

        let timestamp_frequency = if props.limits.timestamp_period > 0.0 {
            (1_000_000_000.0 / props.limits.timestamp_period as f64) as u64
        } else {
            0
        };

        let info = DeviceInfo {
            api: GraphicsApi::Vulkan,
            limits: translate_limits(&props.limits),
            features: feature_flags,
            extended_features,
            adapter_name: cstr_to_string(props.device_name.as_ptr()),
            timestamp_frequency,
        };

        log::info!(
            "created Vulkan device on \"{}\" (api {}.{}.{})",
            info.adapter_name,
            vk::api_version_major(props.api_version),
            vk::api_version_minor(props.api_version),
            vk::api_version_patch(props.api_version),
        );

        Ok((
            device,
            physical_device,
            memory_props,
            info,
            supports_device_address,
        ))
    }

    pub(crate) fn raw(&self) -> &ash::Device {
        &self.inner.device
    }

    /// Picks a memory type index compatible with `type_bits` for the given
    /// memory class, preferring the most specific property set.
    pub(crate) fn find_memory_type(
        &self,
        type_bits: u32,
        memory_type: MemoryType,
    ) -> Result<u32, RhiError> {
        let props = &self.inner.memory_props;
        for wanted in conversions::memory_property_candidates(memory_type) {
            let found = (0..props.memory_type_count).find(|&i| {
                (type_bits & (1 << i)) != 0
                    && props.memory_types[i as usize].property_flags.contains(wanted)
            });
            if let Some(index) = found {
                return Ok(index);
            }
        }
        Err(RhiError::Unsupported(format!(
            "no compatible Vulkan memory type for {memory_type:?}"
        )))
    }

    fn expect_own_buffer<'a>(&self, buffer: &'a dyn Buffer) -> Result<&'a VulkanBuffer, RhiError> {
        let buffer = buffer
            .as_any()
            .downcast_ref::<VulkanBuffer>()
            .ok_or_else(|| {
                RhiError::InvalidResource("buffer was not created by a Vulkan device".to_string())
            })?;
        if !Arc::ptr_eq(&buffer.device.inner, &self.inner) {
            return Err(RhiError::InvalidResource(
                "buffer belongs to a different Vulkan device".to_string(),
            ));
        }
        Ok(buffer)
    }
}

impl GraphicsDevice for VulkanDevice {
    fn desc(&self) -> &DeviceDescriptor {
        self.inner.base.desc()
    }

    fn info(&self) -> &DeviceInfo {
        self.inner.base.info()
    }

    fn create_heap(&self, desc: &HeapDescriptor) -> Result<Arc<dyn Heap>, RhiError> {
        VulkanHeap::create(self, desc)
    }

    fn create_buffer(&self, desc: &BufferDescriptor) -> Result<Arc<dyn Buffer>, RhiError> {
        VulkanBuffer::create(self, desc)
    }

    fn create_buffer_on_heap(
        &self,
        desc: &BufferDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Buffer>, RhiError> {
        VulkanBuffer::create_on_heap(self, desc, heap, offset)
    }

    fn buffer_size_and_align(&self, desc: &BufferDescriptor) -> SizeAndAlign {
        match VulkanBuffer::requirements(self, desc) {
            Ok(requirements) => SizeAndAlign {
                size: requirements.size,
                align: requirements.alignment,
            },
            Err(err) => {
                log::warn!("buffer requirements query failed: {err}");
                SizeAndAlign {
                    size: desc.size,
                    align: 256,
                }
            }
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
                "cannot map an empty buffer range".to_string(),
            ));
        }
        // Buffers placed into a heap share its memory object, so the
        // mapping reference lives on the block, not the buffer.
        let base = if buffer.mapped.swap(true, Ordering::AcqRel) {
            buffer.block.mapped_ptr()
        } else {
            match buffer.block.map_ref() {
                Ok(ptr) => ptr,
                Err(err) => {
                    buffer.mapped.store(false, Ordering::Release);
                    return Err(err);
                }
            }
        };
        let ptr = unsafe { base.add((buffer.memory_offset + range.offset) as usize) };
        Ok(NonNull::new(ptr))
    }

    fn unmap_buffer(&self, buffer: &dyn Buffer) -> Result<(), RhiError> {
        let buffer = self.expect_own_buffer(buffer)?;
        if buffer.mapped.swap(false, Ordering::AcqRel) {
            buffer.block.unmap_ref();
        }
        Ok(())
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> Result<Arc<dyn Texture>, RhiError> {
        VulkanTexture::create(self, desc)
    }

    fn create_texture_on_heap(
        &self,
        desc: &TextureDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Texture>, RhiError> {
        VulkanTexture::create_on_heap(self, desc, heap, offset)
    }

    fn texture_size_and_align(&self, desc: &TextureDescriptor) -> SizeAndAlign {
        match VulkanTexture::requirements(self, desc) {
            Ok(requirements) => SizeAndAlign {
                size: requirements.size,
                align: requirements.alignment,
            },
            Err(err) => {
                log::warn!("texture requirements query failed: {err}");
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
        VulkanSampler::create(self, desc)
    }
}

fn translate_limits(limits: &vk::PhysicalDeviceLimits) -> DeviceLimits {
    DeviceLimits {
        max_texture_dimension_1d: limits.max_image_dimension1_d,
        max_texture_dimension_2d: limits.max_image_dimension2_d,
        max_texture_dimension_3d: limits.max_image_dimension3_d,
        max_texture_dimension_cube: limits.max_image_dimension_cube,
        max_texture_array_layers: limits.max_image_array_layers,
        max_vertex_input_elements: limits.max_vertex_input_attributes,
        max_vertex_input_element_offset: limits.max_vertex_input_attribute_offset,
        max_vertex_streams: limits.max_vertex_input_bindings,
        max_vertex_stream_stride: limits.max_vertex_input_binding_stride,
        max_compute_threads_per_group: limits.max_compute_work_group_invocations,
        max_compute_thread_group_size: limits.max_compute_work_group_size,
        max_compute_dispatch_thread_groups: limits.max_compute_work_group_count,
        max_viewports: limits.max_viewports,
        max_viewport_dimensions: limits.max_viewport_dimensions,
        max_framebuffer_dimensions: [
            limits.max_framebuffer_width,
            limits.max_framebuffer_height,
            limits.max_framebuffer_layers,
        ],
        max_shader_visible_samplers: limits.max_descriptor_set_samplers,
    }
}
