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

//! Vulkan heap, buffer, texture and sampler resources.
//!
//! Every resource keeps a clone of its [`VulkanDevice`] (and placed
//! resources additionally their heap), so native handles are destroyed
//! before the device they were created on.

use std::any::Any;
use std::os::raw::c_void;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

use ash::vk;
use ash::vk::Handle as _;
use vanta_core::rhi::api::{
    BufferDescriptor, DeviceAddress, DeviceFeatures, Format, HeapDescriptor, MemoryType,
    NativeHandle, NativeHandleType, SamplerDescriptor, TextureDescriptor, TextureReductionOp,
};
use vanta_core::rhi::base::{BufferBase, HeapBase, SamplerBase, TextureBase};
use vanta_core::rhi::traits::{Buffer, Heap, Resource, Sampler, Texture};
use vanta_core::RhiError;

use super::device::VulkanDevice;
use super::{check, conversions};

/// A `VkDeviceMemory` allocation shared by every resource bound into it.
///
/// Vulkan allows at most one outstanding `vkMapMemory` per memory object,
/// so the mapping is tracked here: the first map call maps the whole
/// allocation and later calls reuse the base pointer until the last
/// reference is released.
#[derive(Debug)]
pub(crate) struct MemoryBlock {
    device: VulkanDevice,
    pub(crate) memory: vk::DeviceMemory,
    map: Mutex<MapState>,
}

#[derive(Debug)]
struct MapState {
    ptr: *mut c_void,
    refs: u32,
}

// The pointer is plain host-visible memory guarded by the mutex.
unsafe impl Send for MemoryBlock {}
unsafe impl Sync for MemoryBlock {}

impl MemoryBlock {
    fn allocate(
        device: &VulkanDevice,
        size: u64,
        memory_type_index: u32,
        device_address: bool,
    ) -> Result<Arc<Self>, RhiError> {
        let mut flags_info =
            vk::MemoryAllocateFlagsInfo::builder().flags(vk::MemoryAllocateFlags::DEVICE_ADDRESS);
        let mut alloc_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(size)
            .memory_type_index(memory_type_index);
        if device_address {
            alloc_info = alloc_info.push_next(&mut flags_info);
        }
        let memory = check("vkAllocateMemory", unsafe {
            device.raw().allocate_memory(&alloc_info, None)
        })?;
        Ok(Arc::new(Self {
            device: device.clone(),
            memory,
            map: Mutex::new(MapState {
                ptr: std::ptr::null_mut(),
                refs: 0,
            }),
        }))
    }

    fn lock_map(&self) -> MutexGuard<'_, MapState> {
        match self.map.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Takes a mapping reference, mapping the whole allocation on the
    /// first one. Returns the base pointer of the allocation.
    pub(crate) fn map_ref(&self) -> Result<*mut u8, RhiError> {
        let mut state = self.lock_map();
        if state.refs == 0 {
            state.ptr = check("vkMapMemory", unsafe {
                self.device.raw().map_memory(
                    self.memory,
                    0,
                    vk::WHOLE_SIZE,
                    vk::MemoryMapFlags::empty(),
                )
            })?;
        }
        state.refs += 1;
        Ok(state.ptr as *mut u8)
    }

    /// Base pointer while at least one mapping reference is held.
    pub(crate) fn mapped_ptr(&self) -> *mut u8 {
        self.lock_map().ptr as *mut u8
    }

    /// Releases one mapping reference, unmapping with the last one.
    pub(crate) fn unmap_ref(&self) {
        let mut state = self.lock_map();
        match state.refs {
            0 => log::warn!("unbalanced unmap on a Vulkan memory block"),
            1 => {
                unsafe { self.device.raw().unmap_memory(self.memory) };
                state.ptr = std::ptr::null_mut();
                state.refs = 0;
            }
            _ => state.refs -= 1,
        }
    }
}

impl Drop for MemoryBlock {
    fn drop(&mut self) {
        // Freeing implicitly unmaps any outstanding mapping.
        unsafe { self.device.raw().free_memory(self.memory, None) };
    }
}

/// A dedicated `VkDeviceMemory` block that resources can be placed into.
#[derive(Debug)]
pub struct VulkanHeap {
    base: HeapBase,
    pub(crate) device: VulkanDevice,
    pub(crate) block: Arc<MemoryBlock>,
    pub(crate) memory_type_index: u32,
}

impl VulkanHeap {
    pub(crate) fn create(
        device: &VulkanDevice,
        desc: &HeapDescriptor,
    ) -> Result<Arc<dyn Heap>, RhiError> {
        if desc.size == 0 {
            return Err(RhiError::InvalidDescriptor(
                "heap size must be non-zero".to_string(),
            ));
        }
        // All memory type bits allowed; the heap only constrains properties.
        let memory_type_index = device.find_memory_type(u32::MAX, desc.memory_type)?;
        // Placed buffers carry device-address usage when the device
        // supports it, so the backing memory needs the allocate flag.
        let block = MemoryBlock::allocate(
            device,
            desc.size,
            memory_type_index,
            device.inner.supports_device_address,
        )?;
        Ok(Arc::new(Self {
            base: HeapBase::new(desc),
            device: device.clone(),
            block,
            memory_type_index,
        }))
    }
}

impl Resource for VulkanHeap {
    fn native_handle(&self, handle_type: NativeHandleType) -> NativeHandle {
        match handle_type {
            NativeHandleType::VkDeviceMemory => {
                NativeHandle::new(handle_type, self.block.memory.as_raw())
            }
            _ => NativeHandle::invalid(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Heap for VulkanHeap {
    fn desc(&self) -> &HeapDescriptor {
        self.base.desc()
    }
}

/// A `VkBuffer` with either its own allocation or a placement into a heap.
#[derive(Debug)]
pub struct VulkanBuffer {
    base: BufferBase,
    pub(crate) device: VulkanDevice,
    buffer: vk::Buffer,
    pub(crate) block: Arc<MemoryBlock>,
    pub(crate) memory_offset: u64,
    address: Option<DeviceAddress>,
    pub(crate) mapped: AtomicBool,
    _heap: Option<Arc<dyn Heap>>,
}

impl VulkanBuffer {
    pub(crate) fn requirements(
        device: &VulkanDevice,
        desc: &BufferDescriptor,
    ) -> Result<vk::MemoryRequirements, RhiError> {
        let raw = device.raw();
        let buffer = Self::create_raw(device, desc)?;
        let requirements = unsafe { raw.get_buffer_memory_requirements(buffer) };
        unsafe { raw.destroy_buffer(buffer, None) };
        Ok(requirements)
    }

    fn create_raw(device: &VulkanDevice, desc: &BufferDescriptor) -> Result<vk::Buffer, RhiError> {
        if desc.size == 0 {
            return Err(RhiError::InvalidDescriptor(
                "buffer size must be non-zero".to_string(),
            ));
        }
        let usage = conversions::buffer_usage(desc, device.inner.supports_device_address);
        let create_info = vk::BufferCreateInfo::builder()
            .size(desc.size)
            .usage(usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);
        check("vkCreateBuffer", unsafe {
            device.raw().create_buffer(&create_info, None)
        })
    }

    fn query_address(device: &VulkanDevice, buffer: vk::Buffer) -> Option<DeviceAddress> {
        if !device.inner.supports_device_address {
            return None;
        }
        let info = vk::BufferDeviceAddressInfo::builder().buffer(buffer);
        Some(unsafe { device.raw().get_buffer_device_address(&info) })
    }

    pub(crate) fn create(
        device: &VulkanDevice,
        desc: &BufferDescriptor,
    ) -> Result<Arc<dyn Buffer>, RhiError> {
        let raw = device.raw();
        let buffer = Self::create_raw(device, desc)?;
        let requirements = unsafe { raw.get_buffer_memory_requirements(buffer) };

        let memory_type_index =
            match device.find_memory_type(requirements.memory_type_bits, desc.memory_type) {
                Ok(index) => index,
                Err(err) => {
                    unsafe { raw.destroy_buffer(buffer, None) };
                    return Err(err);
                }
            };

        let block = match MemoryBlock::allocate(
            device,
            requirements.size,
            memory_type_index,
            device.inner.supports_device_address,
        ) {
            Ok(block) => block,
            Err(err) => {
                unsafe { raw.destroy_buffer(buffer, None) };
                return Err(err);
            }
        };

        if let Err(err) = check("vkBindBufferMemory", unsafe {
            raw.bind_buffer_memory(buffer, block.memory, 0)
        }) {
            unsafe { raw.destroy_buffer(buffer, None) };
            return Err(err);
        }

        let address = Self::query_address(device, buffer);
        Ok(Arc::new(Self {
            base: BufferBase::new(desc),
            device: device.clone(),
            buffer,
            block,
            memory_offset: 0,
            address,
            mapped: AtomicBool::new(false),
            _heap: None,
        }))
    }

    pub(crate) fn create_on_heap(
        device: &VulkanDevice,
        desc: &BufferDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Buffer>, RhiError> {
        let heap_impl = heap.as_any().downcast_ref::<VulkanHeap>().ok_or_else(|| {
            RhiError::InvalidResource("heap was not created by a Vulkan device".to_string())
        })?;
        if !Arc::ptr_eq(&heap_impl.device.inner, &device.inner) {
            return Err(RhiError::InvalidResource(
                "heap belongs to a different Vulkan device".to_string(),
            ));
        }
        if heap_impl.desc().memory_type != desc.memory_type {
            return Err(RhiError::InvalidDescriptor(format!(
                "buffer memory type {:?} does not match heap memory type {:?}",
                desc.memory_type,
                heap_impl.desc().memory_type
            )));
        }

        let raw = device.raw();
        let buffer = Self::create_raw(device, desc)?;
        let requirements = unsafe { raw.get_buffer_memory_requirements(buffer) };

        if let Err(err) = validate_placement(heap_impl, &requirements, offset) {
            unsafe { raw.destroy_buffer(buffer, None) };
            return Err(err);
        }
        if let Err(err) = check("vkBindBufferMemory", unsafe {
            raw.bind_buffer_memory(buffer, heap_impl.block.memory, offset)
        }) {
            unsafe { raw.destroy_buffer(buffer, None) };
            return Err(err);
        }

        let address = Self::query_address(device, buffer);
        Ok(Arc::new(Self {
            base: BufferBase::new(desc),
            device: device.clone(),
            buffer,
            block: Arc::clone(&heap_impl.block),
            memory_offset: offset,
            address,
            mapped: AtomicBool::new(false),
            _heap: Some(Arc::clone(heap)),
        }))
    }
}

fn validate_placement(
    heap: &VulkanHeap,
    requirements: &vk::MemoryRequirements,
    offset: u64,
) -> Result<(), RhiError> {
    if requirements.alignment != 0 && offset % requirements.alignment != 0 {
        return Err(RhiError::InvalidDescriptor(format!(
            "placement offset {offset} is not aligned to {}",
            requirements.alignment
        )));
    }
    match offset.checked_add(requirements.size) {
        Some(end) if end <= heap.desc().size => {}
        _ => {
            return Err(RhiError::InvalidDescriptor(format!(
                "placement [{offset}, {offset} + {}) exceeds heap size {}",
                requirements.size,
                heap.desc().size
            )));
        }
    }
    if requirements.memory_type_bits & (1 << heap.memory_type_index) == 0 {
        return Err(RhiError::Unsupported(format!(
            "resource cannot live in heap memory type {}",
            heap.memory_type_index
        )));
    }
    Ok(())
}

impl Drop for VulkanBuffer {
    fn drop(&mut self) {
        if *self.mapped.get_mut() {
            self.block.unmap_ref();
        }
        unsafe { self.device.raw().destroy_buffer(self.buffer, None) };
    }
}

impl Resource for VulkanBuffer {
    fn native_handle(&self, handle_type: NativeHandleType) -> NativeHandle {
        match handle_type {
            NativeHandleType::VkBuffer => NativeHandle::new(handle_type, self.buffer.as_raw()),
            NativeHandleType::VkDeviceMemory => {
                NativeHandle::new(handle_type, self.block.memory.as_raw())
            }
            _ => NativeHandle::invalid(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Buffer for VulkanBuffer {
    fn desc(&self) -> &BufferDescriptor {
        self.base.desc()
    }

    fn device_address(&self) -> Result<DeviceAddress, RhiError> {
        self.address.ok_or_else(|| {
            RhiError::Unsupported(
                "buffer device addresses are not supported by this adapter".to_string(),
            )
        })
    }
}

/// A `VkImage` with either its own allocation or a placement into a heap.
#[derive(Debug)]
pub struct VulkanTexture {
    base: TextureBase,
    device: VulkanDevice,
    image: vk::Image,
    block: Arc<MemoryBlock>,
    _heap: Option<Arc<dyn Heap>>,
}

impl VulkanTexture {
    pub(crate) fn requirements(
        device: &VulkanDevice,
        desc: &TextureDescriptor,
    ) -> Result<vk::MemoryRequirements, RhiError> {
        let raw = device.raw();
        let image = Self::create_raw(device, desc)?;
        let requirements = unsafe { raw.get_image_memory_requirements(image) };
        unsafe { raw.destroy_image(image, None) };
        Ok(requirements)
    }

    fn create_raw(device: &VulkanDevice, desc: &TextureDescriptor) -> Result<vk::Image, RhiError> {
        if desc.format == Format::Unknown {
            return Err(RhiError::InvalidDescriptor(
                "texture format must be known".to_string(),
            ));
        }
        if desc.width == 0 || desc.height == 0 || desc.depth == 0 {
            return Err(RhiError::InvalidDescriptor(format!(
                "texture extents must be non-zero (got {}x{}x{})",
                desc.width, desc.height, desc.depth
            )));
        }
        let mut flags = vk::ImageCreateFlags::empty();
        if conversions::is_cube(desc.dimension) {
            flags |= vk::ImageCreateFlags::CUBE_COMPATIBLE;
        }
        let create_info = vk::ImageCreateInfo::builder()
            .flags(flags)
            .image_type(conversions::image_type(desc.dimension))
            .format(conversions::format_to_vk(desc.format))
            .extent(vk::Extent3D {
                width: desc.width,
                height: desc.height,
                depth: desc.depth,
            })
            .mip_levels(desc.mip_levels)
            .array_layers(desc.array_size)
            .samples(conversions::sample_count_to_vk(desc.sample_count))
            .tiling(vk::ImageTiling::OPTIMAL)
            .usage(conversions::image_usage(desc))
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED);
        check("vkCreateImage", unsafe {
            device.raw().create_image(&create_info, None)
        })
    }

    pub(crate) fn create(
        device: &VulkanDevice,
        desc: &TextureDescriptor,
    ) -> Result<Arc<dyn Texture>, RhiError> {
        let raw = device.raw();
        let image = Self::create_raw(device, desc)?;
        let requirements = unsafe { raw.get_image_memory_requirements(image) };

        let memory_type_index =
            match device.find_memory_type(requirements.memory_type_bits, MemoryType::DeviceLocal) {
                Ok(index) => index,
                Err(err) => {
                    unsafe { raw.destroy_image(image, None) };
                    return Err(err);
                }
            };
        let block = match MemoryBlock::allocate(device, requirements.size, memory_type_index, false)
        {
            Ok(block) => block,
            Err(err) => {
                unsafe { raw.destroy_image(image, None) };
                return Err(err);
            }
        };
        if let Err(err) = check("vkBindImageMemory", unsafe {
            raw.bind_image_memory(image, block.memory, 0)
        }) {
            unsafe { raw.destroy_image(image, None) };
            return Err(err);
        }

        Ok(Arc::new(Self {
            base: TextureBase::new(desc),
            device: device.clone(),
            image,
            block,
            _heap: None,
        }))
    }

    pub(crate) fn create_on_heap(
        device: &VulkanDevice,
        desc: &TextureDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Texture>, RhiError> {
        let heap_impl = heap.as_any().downcast_ref::<VulkanHeap>().ok_or_else(|| {
            RhiError::InvalidResource("heap was not created by a Vulkan device".to_string())
        })?;
        if !Arc::ptr_eq(&heap_impl.device.inner, &device.inner) {
            return Err(RhiError::InvalidResource(
                "heap belongs to a different Vulkan device".to_string(),
            ));
        }

        let raw = device.raw();
        let image = Self::create_raw(device, desc)?;
        let requirements = unsafe { raw.get_image_memory_requirements(image) };

        if let Err(err) = validate_placement(heap_impl, &requirements, offset) {
            unsafe { raw.destroy_image(image, None) };
            return Err(err);
        }
        if let Err(err) = check("vkBindImageMemory", unsafe {
            raw.bind_image_memory(image, heap_impl.block.memory, offset)
        }) {
            unsafe { raw.destroy_image(image, None) };
            return Err(err);
        }

        Ok(Arc::new(Self {
            base: TextureBase::new(desc),
            device: device.clone(),
            image,
            block: Arc::clone(&heap_impl.block),
            _heap: Some(Arc::clone(heap)),
        }))
    }
}

impl Drop for VulkanTexture {
    fn drop(&mut self) {
        unsafe { self.device.raw().destroy_image(self.image, None) };
    }
}

impl Resource for VulkanTexture {
    fn native_handle(&self, handle_type: NativeHandleType) -> NativeHandle {
        match handle_type {
            NativeHandleType::VkImage => NativeHandle::new(handle_type, self.image.as_raw()),
            NativeHandleType::VkDeviceMemory => {
                NativeHandle::new(handle_type, self.block.memory.as_raw())
            }
            _ => NativeHandle::invalid(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Texture for VulkanTexture {
    fn desc(&self) -> &TextureDescriptor {
        self.base.desc()
    }

    fn device_address(&self) -> Result<DeviceAddress, RhiError> {
        Err(RhiError::Unimplemented("texture device address"))
    }
}

/// A `VkSampler`.
#[derive(Debug)]
pub struct VulkanSampler {
    base: SamplerBase,
    device: VulkanDevice,
    sampler: vk::Sampler,
}

impl VulkanSampler {
    pub(crate) fn create(
        device: &VulkanDevice,
        desc: &SamplerDescriptor,
    ) -> Result<Arc<dyn Sampler>, RhiError> {
        if matches!(
            desc.reduction_op,
            TextureReductionOp::Minimum | TextureReductionOp::Maximum
        ) {
            return Err(RhiError::Unsupported(
                "min/max sampler reduction is not supported by this backend".to_string(),
            ));
        }
        let anisotropy_supported = device
            .inner
            .base
            .info()
            .features
            .contains(DeviceFeatures::SAMPLER_ANISOTROPY);
        let create_info = vk::SamplerCreateInfo::builder()
            .min_filter(conversions::filter_to_vk(desc.min_filter))
            .mag_filter(conversions::filter_to_vk(desc.mag_filter))
            .mipmap_mode(conversions::mipmap_mode_to_vk(desc.mip_filter))
            .address_mode_u(conversions::address_mode_to_vk(desc.address_u))
            .address_mode_v(conversions::address_mode_to_vk(desc.address_v))
            .address_mode_w(conversions::address_mode_to_vk(desc.address_w))
            .mip_lod_bias(desc.mip_bias)
            .anisotropy_enable(desc.max_anisotropy > 1 && anisotropy_supported)
            .max_anisotropy(desc.max_anisotropy as f32)
            .compare_enable(desc.reduction_op == TextureReductionOp::Comparison)
            .compare_op(conversions::compare_op_to_vk(desc.comparison_func))
            .min_lod(desc.mip_min)
            .max_lod(desc.mip_max)
            .border_color(conversions::border_color_to_vk(desc.border_color));
        let sampler = check("vkCreateSampler", unsafe {
            device.raw().create_sampler(&create_info, None)
        })?;
        Ok(Arc::new(Self {
            base: SamplerBase::new(desc),
            device: device.clone(),
            sampler,
        }))
    }
}

impl Drop for VulkanSampler {
    fn drop(&mut self) {
        unsafe { self.device.raw().destroy_sampler(self.sampler, None) };
    }
}

impl Resource for VulkanSampler {
    fn native_handle(&self, handle_type: NativeHandleType) -> NativeHandle {
        match handle_type {
            NativeHandleType::VkSampler => NativeHandle::new(handle_type, self.sampler.as_raw()),
            _ => NativeHandle::invalid(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Sampler for VulkanSampler {
    fn desc(&self) -> &SamplerDescriptor {
        self.base.desc()
    }
}
