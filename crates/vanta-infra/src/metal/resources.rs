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

//! Metal heaps, buffers, textures and samplers.

use std::fmt;
use std::ptr::NonNull;
use std::sync::Arc;

use metal::foreign_types::ForeignType;
use metal::{MTLHeapType, NSUInteger};
use vanta_core::rhi::api::{
    BufferDescriptor, DeviceAddress, HeapDescriptor, NativeHandle, NativeHandleType,
    SamplerDescriptor, TextureDescriptor, TextureDimension, TextureReductionOp,
};
use vanta_core::rhi::base::{BufferBase, HeapBase, SamplerBase, TextureBase};
use vanta_core::rhi::traits::{Buffer, Heap, Resource, Sampler, Texture};
use vanta_core::RhiError;

use super::conversions;
use super::device::MetalDevice;
use super::nil_error;

fn expect_own_heap<'a>(device: &MetalDevice, heap: &'a Arc<dyn Heap>) -> Result<&'a MetalHeap, RhiError> {
    let metal_heap = heap.as_any().downcast_ref::<MetalHeap>().ok_or_else(|| {
        RhiError::InvalidResource("heap was not created by a metal device".to_string())
    })?;
    if !Arc::ptr_eq(&metal_heap.device.inner, &device.inner) {
        return Err(RhiError::InvalidResource(
            "heap belongs to a different metal device".to_string(),
        ));
    }
    Ok(metal_heap)
}

fn validate_placement(
    heap: &MetalHeap,
    offset: u64,
    required: &metal::MTLSizeAndAlign,
) -> Result<(), RhiError> {
    if offset % required.align != 0 {
        return Err(RhiError::InvalidResource(format!(
            "placement offset {offset} is not {}-byte aligned",
            required.align
        )));
    }
    let end = offset.checked_add(required.size).ok_or_else(|| {
        RhiError::InvalidResource("placement range overflows".to_string())
    })?;
    if end > heap.desc().size {
        return Err(RhiError::InvalidResource(format!(
            "placement range [{offset}, {end}) exceeds heap size {}",
            heap.desc().size
        )));
    }
    Ok(())
}

/// A placement `MTLHeap`; resources bind at caller-chosen offsets.
pub struct MetalHeap {
    base: HeapBase,
    pub(crate) device: MetalDevice,
    pub(crate) heap: metal::Heap,
}

unsafe impl Send for MetalHeap {}
unsafe impl Sync for MetalHeap {}

impl MetalHeap {
    pub(crate) fn create(
        device: &MetalDevice,
        desc: &HeapDescriptor,
    ) -> Result<Arc<dyn Heap>, RhiError> {
        if desc.size == 0 {
            return Err(RhiError::InvalidDescriptor(
                "heap size must be non-zero".to_string(),
            ));
        }
        let native = metal::HeapDescriptor::new();
        native.set_size(desc.size as NSUInteger);
        native.set_storage_mode(conversions::storage_mode(desc.memory_type));
        native.set_cpu_cache_mode(conversions::cpu_cache_mode(desc.memory_type));
        native.set_heap_type(MTLHeapType::Placement);
        let heap = device.raw().new_heap(&native);
        if let Some(name) = &desc.debug_name {
            heap.set_label(name);
        }
        Ok(Arc::new(Self {
            base: HeapBase::new(desc),
            device: device.clone(),
            heap,
        }))
    }
}

impl fmt::Debug for MetalHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetalHeap")
            .field("desc", self.base.desc())
            .finish()
    }
}

impl Resource for MetalHeap {
    fn native_handle(&self, handle_type: NativeHandleType) -> NativeHandle {
        match handle_type {
            NativeHandleType::MtlHeap => {
                NativeHandle::new(handle_type, self.heap.as_ptr() as u64)
            }
            _ => NativeHandle::invalid(),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Heap for MetalHeap {
    fn desc(&self) -> &HeapDescriptor {
        self.base.desc()
    }
}

/// An `MTLBuffer`, either owning its allocation or placed in a heap.
pub struct MetalBuffer {
    base: BufferBase,
    pub(crate) device: MetalDevice,
    buffer: metal::Buffer,
    _heap: Option<Arc<dyn Heap>>,
}

unsafe impl Send for MetalBuffer {}
unsafe impl Sync for MetalBuffer {}

impl MetalBuffer {
    pub(crate) fn create(
        device: &MetalDevice,
        desc: &BufferDescriptor,
    ) -> Result<Arc<dyn Buffer>, RhiError> {
        if desc.size == 0 {
            return Err(RhiError::InvalidDescriptor(
                "buffer size must be non-zero".to_string(),
            ));
        }
        let options = conversions::resource_options(desc.memory_type);
        let buffer = device.raw().new_buffer(desc.size as NSUInteger, options);
        if let Some(name) = &desc.debug_name {
            buffer.set_label(name);
        }
        Ok(Arc::new(Self {
            base: BufferBase::new(desc),
            device: device.clone(),
            buffer,
            _heap: None,
        }))
    }

    pub(crate) fn create_on_heap(
        device: &MetalDevice,
        desc: &BufferDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Buffer>, RhiError> {
        if desc.size == 0 {
            return Err(RhiError::InvalidDescriptor(
                "buffer size must be non-zero".to_string(),
            ));
        }
        let metal_heap = expect_own_heap(device, heap)?;
        if metal_heap.desc().memory_type != desc.memory_type {
            return Err(RhiError::InvalidResource(format!(
                "buffer memory type {:?} does not match heap memory type {:?}",
                desc.memory_type,
                metal_heap.desc().memory_type
            )));
        }
        let options = conversions::resource_options(desc.memory_type);
        let required = device.raw().heap_buffer_size_and_align(desc.size, options);
        validate_placement(metal_heap, offset, &required)?;

        let buffer = metal_heap
            .heap
            .new_buffer_with_offset(desc.size as NSUInteger, options, offset as NSUInteger)
            .ok_or_else(|| nil_error("newBufferWithLength:options:offset:"))?;
        if let Some(name) = &desc.debug_name {
            buffer.set_label(name);
        }
        Ok(Arc::new(Self {
            base: BufferBase::new(desc),
            device: device.clone(),
            buffer,
            _heap: Some(Arc::clone(heap)),
        }))
    }

    /// Host pointer at `offset` bytes into the buffer, `None` for private
    /// storage.
    pub(crate) fn host_ptr(&self, offset: u64) -> Option<NonNull<u8>> {
        NonNull::new(self.buffer.contents().cast::<u8>())
            .map(|ptr| unsafe { NonNull::new_unchecked(ptr.as_ptr().add(offset as usize)) })
    }
}

impl fmt::Debug for MetalBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetalBuffer")
            .field("desc", self.base.desc())
            .finish()
    }
}

impl Resource for MetalBuffer {
    fn native_handle(&self, handle_type: NativeHandleType) -> NativeHandle {
        match handle_type {
            NativeHandleType::MtlBuffer => {
                NativeHandle::new(handle_type, self.buffer.as_ptr() as u64)
            }
            _ => NativeHandle::invalid(),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Buffer for MetalBuffer {
    fn desc(&self) -> &BufferDescriptor {
        self.base.desc()
    }

    fn device_address(&self) -> Result<DeviceAddress, RhiError> {
        Ok(self.buffer.gpu_address())
    }
}

/// An `MTLTexture`.
pub struct MetalTexture {
    base: TextureBase,
    pub(crate) device: MetalDevice,
    texture: metal::Texture,
    _heap: Option<Arc<dyn Heap>>,
}

unsafe impl Send for MetalTexture {}
unsafe impl Sync for MetalTexture {}

impl MetalTexture {
    /// Builds the native descriptor for `desc`.
    ///
    /// Metal folds array-ness and multisampling into the texture type, so
    /// only the per-layer extents and the layer count carry over directly.
    pub(crate) fn native_descriptor(
        desc: &TextureDescriptor,
    ) -> Result<metal::TextureDescriptor, RhiError> {
        let native = metal::TextureDescriptor::new();
        native.set_texture_type(conversions::texture_type(desc.dimension)?);
        native.set_pixel_format(conversions::format_to_mtl(desc.format)?);
        native.set_width(desc.width as NSUInteger);
        native.set_height(desc.height as NSUInteger);
        native.set_depth(desc.depth as NSUInteger);
        native.set_mipmap_level_count(desc.mip_levels as NSUInteger);
        native.set_sample_count(desc.sample_count as NSUInteger);
        let layers = match desc.dimension {
            // Cube types count faces separately from layers.
            TextureDimension::TextureCube | TextureDimension::TextureCubeArray => {
                (desc.array_size / 6).max(1)
            }
            _ => desc.array_size,
        };
        native.set_array_length(layers as NSUInteger);
        native.set_usage(conversions::texture_usage(desc));
        // Textures always live in GPU-only memory.
        native.set_storage_mode(metal::MTLStorageMode::Private);
        Ok(native)
    }

    pub(crate) fn create(
        device: &MetalDevice,
        desc: &TextureDescriptor,
    ) -> Result<Arc<dyn Texture>, RhiError> {
        let native = Self::native_descriptor(desc)?;
        let texture = device.raw().new_texture(&native);
        if let Some(name) = &desc.debug_name {
            texture.set_label(name);
        }
        Ok(Arc::new(Self {
            base: TextureBase::new(desc),
            device: device.clone(),
            texture,
            _heap: None,
        }))
    }

    pub(crate) fn create_on_heap(
        device: &MetalDevice,
        desc: &TextureDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Texture>, RhiError> {
        let metal_heap = expect_own_heap(device, heap)?;
        let native = Self::native_descriptor(desc)?;
        let required = device.raw().heap_texture_size_and_align(&native);
        validate_placement(metal_heap, offset, &required)?;

        let texture = metal_heap
            .heap
            .new_texture_with_offset(&native, offset as NSUInteger)
            .ok_or_else(|| nil_error("newTextureWithDescriptor:offset:"))?;
        if let Some(name) = &desc.debug_name {
            texture.set_label(name);
        }
        Ok(Arc::new(Self {
            base: TextureBase::new(desc),
            device: device.clone(),
            texture,
            _heap: Some(Arc::clone(heap)),
        }))
    }
}

impl fmt::Debug for MetalTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetalTexture")
            .field("desc", self.base.desc())
            .field("device", &self.device)
            .finish()
    }
}

impl Resource for MetalTexture {
    fn native_handle(&self, handle_type: NativeHandleType) -> NativeHandle {
        match handle_type {
            NativeHandleType::MtlTexture => {
                NativeHandle::new(handle_type, self.texture.as_ptr() as u64)
            }
            _ => NativeHandle::invalid(),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Texture for MetalTexture {
    fn desc(&self) -> &TextureDescriptor {
        self.base.desc()
    }

    fn device_address(&self) -> Result<DeviceAddress, RhiError> {
        Err(RhiError::Unimplemented("texture device address"))
    }
}

/// An `MTLSamplerState`.
pub struct MetalSampler {
    base: SamplerBase,
    pub(crate) device: MetalDevice,
    sampler: metal::SamplerState,
}

unsafe impl Send for MetalSampler {}
unsafe impl Sync for MetalSampler {}

impl MetalSampler {
    pub(crate) fn create(
        device: &MetalDevice,
        desc: &SamplerDescriptor,
    ) -> Result<Arc<dyn Sampler>, RhiError> {
        match desc.reduction_op {
            TextureReductionOp::Minimum | TextureReductionOp::Maximum => {
                return Err(RhiError::Unsupported(
                    "min/max sampler reduction is unavailable on Metal".to_string(),
                ))
            }
            TextureReductionOp::Average | TextureReductionOp::Comparison => {}
        }

        let native = metal::SamplerDescriptor::new();
        native.set_min_filter(conversions::min_mag_filter(desc.min_filter));
        native.set_mag_filter(conversions::min_mag_filter(desc.mag_filter));
        native.set_mip_filter(conversions::mip_filter(desc.mip_filter));
        native.set_address_mode_s(conversions::address_mode(desc.address_u));
        native.set_address_mode_t(conversions::address_mode(desc.address_v));
        native.set_address_mode_r(conversions::address_mode(desc.address_w));
        native.set_max_anisotropy(desc.max_anisotropy.max(1) as NSUInteger);
        if desc.reduction_op == TextureReductionOp::Comparison {
            native.set_compare_function(conversions::compare_function(desc.comparison_func));
        }
        native.set_border_color(conversions::border_color(desc.border_color));
        native.set_lod_min_clamp(desc.mip_min);
        native.set_lod_max_clamp(desc.mip_max);
        if let Some(name) = &desc.debug_name {
            native.set_label(name);
        }

        let sampler = device.raw().new_sampler(&native);
        Ok(Arc::new(Self {
            base: SamplerBase::new(desc),
            device: device.clone(),
            sampler,
        }))
    }
}

impl fmt::Debug for MetalSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetalSampler")
            .field("desc", self.base.desc())
            .field("device", &self.device)
            .finish()
    }
}

impl Resource for MetalSampler {
    fn native_handle(&self, handle_type: NativeHandleType) -> NativeHandle {
        match handle_type {
            NativeHandleType::MtlSamplerState => {
                NativeHandle::new(handle_type, self.sampler.as_ptr() as u64)
            }
            _ => NativeHandle::invalid(),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Sampler for MetalSampler {
    fn desc(&self) -> &SamplerDescriptor {
        self.base.desc()
    }
}
