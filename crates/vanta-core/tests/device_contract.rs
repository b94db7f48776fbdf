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

//! Device contract tests against an in-process mock backend, including
//! validation-layer transparency.

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::any::Any;
use std::ptr::NonNull;
use std::sync::Arc;

use vanta_core::rhi::api::{
    AdapterInfo, BufferDescriptor, BufferRange, DeviceDescriptor, DeviceFeatures, DeviceInfo,
    DeviceLimits, Format, GraphicsApi, HeapDescriptor, MemoryType, NativeHandle, NativeHandleType,
    SamplerDescriptor, SizeAndAlign, TextureDescriptor, TextureDimension,
};
use vanta_core::rhi::base::{BufferBase, DeviceBase, HeapBase, SamplerBase, TextureBase};
use vanta_core::rhi::traits::{
    Buffer, GraphicsAdapter, GraphicsDevice, Heap, Resource, Sampler, Texture,
};
use vanta_core::rhi::{DeviceValidator, RhiError};

/// Host allocation shared by mock buffers and heaps.
#[derive(Debug)]
struct HostBlock {
    ptr: NonNull<u8>,
    layout: Layout,
}

unsafe impl Send for HostBlock {}
unsafe impl Sync for HostBlock {}

impl HostBlock {
    fn new(size: u64) -> Self {
        let layout = Layout::from_size_align(size as usize, 16).unwrap();
        let raw = unsafe { alloc_zeroed(layout) };
        Self {
            ptr: NonNull::new(raw).unwrap(),
            layout,
        }
    }

    fn at(&self, offset: u64) -> NonNull<u8> {
        unsafe { NonNull::new_unchecked(self.ptr.as_ptr().add(offset as usize)) }
    }
}

impl Drop for HostBlock {
    fn drop(&mut self) {
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

#[derive(Debug)]
struct MockHeap {
    base: HeapBase,
    block: Option<HostBlock>,
}

impl Resource for MockHeap {
    fn native_handle(&self, _handle_type: NativeHandleType) -> NativeHandle {
        NativeHandle::invalid()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Heap for MockHeap {
    fn desc(&self) -> &HeapDescriptor {
        self.base.desc()
    }
}

#[derive(Debug)]
struct MockBuffer {
    base: BufferBase,
    // Own allocation, or a placement into a heap's block.
    block: Option<HostBlock>,
    heap: Option<Arc<dyn Heap>>,
    heap_offset: u64,
}

impl MockBuffer {
    fn host_ptr(&self, offset: u64) -> Option<NonNull<u8>> {
        if self.base.desc().memory_type == MemoryType::DeviceLocal {
            return None;
        }
        if let Some(block) = &self.block {
            return Some(block.at(offset));
        }
        let heap = self.heap.as_ref()?;
        let mock = heap.as_any().downcast_ref::<MockHeap>()?;
        mock.block
            .as_ref()
            .map(|block| block.at(self.heap_offset + offset))
    }
}

impl Resource for MockBuffer {
    fn native_handle(&self, handle_type: NativeHandleType) -> NativeHandle {
        match handle_type {
            NativeHandleType::CuHostPtr => match self.host_ptr(0) {
                Some(ptr) => NativeHandle::new(handle_type, ptr.as_ptr() as u64),
                None => NativeHandle::invalid(),
            },
            _ => NativeHandle::invalid(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Buffer for MockBuffer {
    fn desc(&self) -> &BufferDescriptor {
        self.base.desc()
    }

    fn device_address(&self) -> Result<u64, RhiError> {
        match self.host_ptr(0) {
            Some(ptr) => Ok(ptr.as_ptr() as u64),
            None => Err(RhiError::Unsupported(
                "mock device has no device-local addresses".to_string(),
            )),
        }
    }
}

#[derive(Debug)]
struct MockTexture {
    base: TextureBase,
}

impl Resource for MockTexture {
    fn native_handle(&self, _handle_type: NativeHandleType) -> NativeHandle {
        NativeHandle::invalid()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Texture for MockTexture {
    fn desc(&self) -> &TextureDescriptor {
        self.base.desc()
    }

    fn device_address(&self) -> Result<u64, RhiError> {
        Err(RhiError::Unimplemented("texture device address"))
    }
}

#[derive(Debug)]
struct MockSampler {
    base: SamplerBase,
}

impl Resource for MockSampler {
    fn native_handle(&self, _handle_type: NativeHandleType) -> NativeHandle {
        NativeHandle::invalid()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Sampler for MockSampler {
    fn desc(&self) -> &SamplerDescriptor {
        self.base.desc()
    }
}

#[derive(Debug)]
struct MockDevice {
    base: DeviceBase,
}

impl MockDevice {
    fn new(desc: &DeviceDescriptor) -> Self {
        let info = DeviceInfo {
            api: GraphicsApi::Vulkan,
            limits: DeviceLimits {
                max_texture_dimension_2d: 16384,
                ..DeviceLimits::default()
            },
            features: DeviceFeatures::NONE,
            extended_features: Vec::new(),
            adapter_name: "Mock Adapter".to_string(),
            timestamp_frequency: 1_000_000_000,
        };
        Self {
            base: DeviceBase::new(desc, info),
        }
    }

    fn texture_byte_size(desc: &TextureDescriptor) -> u64 {
        let info = desc.format.info();
        let pixels = desc.width as u64 * desc.height as u64 * desc.depth as u64;
        pixels * info.bytes_per_block as u64 * desc.array_size as u64
    }
}

impl GraphicsDevice for MockDevice {
    fn desc(&self) -> &DeviceDescriptor {
        self.base.desc()
    }

    fn info(&self) -> &DeviceInfo {
        self.base.info()
    }

    fn create_heap(&self, desc: &HeapDescriptor) -> Result<Arc<dyn Heap>, RhiError> {
        if desc.size == 0 {
            return Err(RhiError::InvalidDescriptor(
                "heap size must be non-zero".to_string(),
            ));
        }
        let block = (desc.memory_type != MemoryType::DeviceLocal).then(|| HostBlock::new(desc.size));
        Ok(Arc::new(MockHeap {
            base: HeapBase::new(desc),
            block,
        }))
    }

    fn create_buffer(&self, desc: &BufferDescriptor) -> Result<Arc<dyn Buffer>, RhiError> {
        if desc.size == 0 {
            return Err(RhiError::InvalidDescriptor(
                "buffer size must be non-zero".to_string(),
            ));
        }
        let block =
            (desc.memory_type != MemoryType::DeviceLocal).then(|| HostBlock::new(desc.size));
        Ok(Arc::new(MockBuffer {
            base: BufferBase::new(desc),
            block,
            heap: None,
            heap_offset: 0,
        }))
    }

    fn create_buffer_on_heap(
        &self,
        desc: &BufferDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Buffer>, RhiError> {
        if desc.size == 0 {
            return Err(RhiError::InvalidDescriptor(
                "buffer size must be non-zero".to_string(),
            ));
        }
        if offset + desc.size > heap.desc().size {
            return Err(RhiError::InvalidDescriptor(
                "placement exceeds heap size".to_string(),
            ));
        }
        Ok(Arc::new(MockBuffer {
            base: BufferBase::new(desc),
            block: None,
            heap: Some(Arc::clone(heap)),
            heap_offset: offset,
        }))
    }

    fn buffer_size_and_align(&self, desc: &BufferDescriptor) -> SizeAndAlign {
        SizeAndAlign {
            size: desc.size,
            align: 16,
        }
    }

    fn map_buffer(
        &self,
        buffer: &dyn Buffer,
        range: BufferRange,
    ) -> Result<Option<NonNull<u8>>, RhiError> {
        let mock = buffer
            .as_any()
            .downcast_ref::<MockBuffer>()
            .ok_or_else(|| RhiError::InvalidResource("buffer is not a mock buffer".to_string()))?;
        let range = range.resolve(mock.desc().size);
        Ok(mock.host_ptr(range.offset))
    }

    fn unmap_buffer(&self, buffer: &dyn Buffer) -> Result<(), RhiError> {
        buffer
            .as_any()
            .downcast_ref::<MockBuffer>()
            .ok_or_else(|| RhiError::InvalidResource("buffer is not a mock buffer".to_string()))?;
        Ok(())
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> Result<Arc<dyn Texture>, RhiError> {
        if desc.width == 0 || desc.height == 0 || desc.format == Format::Unknown {
            return Err(RhiError::InvalidDescriptor(
                "texture descriptor is incomplete".to_string(),
            ));
        }
        Ok(Arc::new(MockTexture {
            base: TextureBase::new(desc),
        }))
    }

    fn create_texture_on_heap(
        &self,
        desc: &TextureDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Texture>, RhiError> {
        let size = Self::texture_byte_size(desc);
        if offset + size > heap.desc().size {
            return Err(RhiError::InvalidDescriptor(
                "placement exceeds heap size".to_string(),
            ));
        }
        self.create_texture(desc)
    }

    fn texture_size_and_align(&self, desc: &TextureDescriptor) -> SizeAndAlign {
        SizeAndAlign {
            size: Self::texture_byte_size(desc),
            align: 256,
        }
    }

    fn create_sampler(&self, desc: &SamplerDescriptor) -> Result<Arc<dyn Sampler>, RhiError> {
        Ok(Arc::new(MockSampler {
            base: SamplerBase::new(desc),
        }))
    }
}

#[derive(Debug)]
struct MockAdapter {
    info: AdapterInfo,
}

impl GraphicsAdapter for MockAdapter {
    fn info(&self) -> &AdapterInfo {
        &self.info
    }

    fn create_device(
        &self,
        desc: &DeviceDescriptor,
    ) -> Result<Arc<dyn GraphicsDevice>, RhiError> {
        let device: Arc<dyn GraphicsDevice> = Arc::new(MockDevice::new(desc));
        if desc.enable_validation {
            Ok(DeviceValidator::wrap(device))
        } else {
            Ok(device)
        }
    }
}

fn mock_adapter() -> MockAdapter {
    MockAdapter {
        info: AdapterInfo {
            name: "Mock Adapter".to_string(),
            api: GraphicsApi::Vulkan,
            vendor_id: 0x1234,
            device_id: 0x5678,
            luid: [7; 16],
        },
    }
}

fn bare_device() -> Arc<dyn GraphicsDevice> {
    Arc::new(MockDevice::new(&DeviceDescriptor {
        enable_validation: false,
        ..DeviceDescriptor::default()
    }))
}

fn validated_device() -> Arc<dyn GraphicsDevice> {
    DeviceValidator::wrap(bare_device())
}

#[test]
fn buffer_reports_its_descriptor() {
    for device in [bare_device(), validated_device()] {
        let desc = BufferDescriptor {
            size: 1024,
            memory_type: MemoryType::Upload,
            debug_name: Some("staging".to_string()),
            ..BufferDescriptor::default()
        };
        let buffer = device.create_buffer(&desc).unwrap();
        assert_eq!(buffer.desc(), &desc);
        assert_eq!(buffer.desc().size, 1024);
    }
}

#[test]
fn zero_size_buffer_is_an_error_on_both_paths() {
    let desc = BufferDescriptor::default();
    assert_eq!(desc.size, 0);

    let err = bare_device().create_buffer(&desc).unwrap_err();
    assert!(matches!(err, RhiError::InvalidDescriptor(_)));

    let err = validated_device().create_buffer(&desc).unwrap_err();
    assert!(matches!(err, RhiError::Validation(_)));
}

#[test]
fn upload_buffer_map_round_trip() {
    let device = validated_device();
    let buffer = device
        .create_buffer(&BufferDescriptor {
            size: 256,
            memory_type: MemoryType::Upload,
            ..BufferDescriptor::default()
        })
        .unwrap();

    let ptr = device
        .map_buffer(buffer.as_ref(), BufferRange::ENTIRE)
        .unwrap()
        .expect("upload buffers are host-visible");
    unsafe {
        for i in 0..256u64 {
            *ptr.as_ptr().add(i as usize) = (i % 251) as u8;
        }
    }
    device.unmap_buffer(buffer.as_ref()).unwrap();

    let ptr = device
        .map_buffer(buffer.as_ref(), BufferRange { offset: 16, size: 16 })
        .unwrap()
        .unwrap();
    unsafe {
        assert_eq!(*ptr.as_ptr(), 16);
        assert_eq!(*ptr.as_ptr().add(15), 31);
    }
    device.unmap_buffer(buffer.as_ref()).unwrap();
}

#[test]
fn device_local_buffer_maps_to_none() {
    let device = validated_device();
    let buffer = device
        .create_buffer(&BufferDescriptor {
            size: 128,
            memory_type: MemoryType::DeviceLocal,
            ..BufferDescriptor::default()
        })
        .unwrap();
    let mapped = device.map_buffer(buffer.as_ref(), BufferRange::ENTIRE).unwrap();
    assert!(mapped.is_none());
}

#[test]
fn map_range_out_of_bounds_is_rejected() {
    let device = validated_device();
    let buffer = device
        .create_buffer(&BufferDescriptor {
            size: 64,
            memory_type: MemoryType::ReadBack,
            ..BufferDescriptor::default()
        })
        .unwrap();
    let err = device
        .map_buffer(buffer.as_ref(), BufferRange { offset: 60, size: 8 })
        .unwrap_err();
    assert!(matches!(err, RhiError::Validation(_)));
}

#[test]
fn heap_placement_binds_into_heap_memory() {
    let device = validated_device();
    let heap = device
        .create_heap(&HeapDescriptor {
            size: 4096,
            memory_type: MemoryType::Upload,
            debug_name: None,
        })
        .unwrap();

    let desc = BufferDescriptor {
        size: 512,
        memory_type: MemoryType::Upload,
        ..BufferDescriptor::default()
    };
    let buffer = device.create_buffer_on_heap(&desc, &heap, 1024).unwrap();
    assert_eq!(buffer.desc(), &desc);

    // Writing through the buffer's mapping must land inside the heap block.
    let ptr = device
        .map_buffer(buffer.as_ref(), BufferRange::ENTIRE)
        .unwrap()
        .unwrap();
    unsafe { *ptr.as_ptr() = 0xab };
    device.unmap_buffer(buffer.as_ref()).unwrap();

    let heap_base = heap
        .as_any()
        .downcast_ref::<MockHeap>()
        .unwrap()
        .block
        .as_ref()
        .unwrap()
        .at(1024);
    unsafe { assert_eq!(*heap_base.as_ptr(), 0xab) };
}

#[test]
fn placed_buffers_on_one_heap_map_independently() {
    let device = validated_device();
    let heap = device
        .create_heap(&HeapDescriptor {
            size: 4096,
            memory_type: MemoryType::Upload,
            debug_name: None,
        })
        .unwrap();
    let desc = BufferDescriptor {
        size: 256,
        memory_type: MemoryType::Upload,
        ..BufferDescriptor::default()
    };
    let first = device.create_buffer_on_heap(&desc, &heap, 0).unwrap();
    let second = device.create_buffer_on_heap(&desc, &heap, 1024).unwrap();

    let first_ptr = device
        .map_buffer(first.as_ref(), BufferRange::ENTIRE)
        .unwrap()
        .unwrap();
    let second_ptr = device
        .map_buffer(second.as_ref(), BufferRange::ENTIRE)
        .unwrap()
        .unwrap();
    unsafe {
        *first_ptr.as_ptr() = 0x11;
        *second_ptr.as_ptr() = 0x22;
    }

    // Unmapping one placed buffer must leave the other mapping intact.
    device.unmap_buffer(first.as_ref()).unwrap();
    unsafe {
        assert_eq!(*second_ptr.as_ptr(), 0x22);
        *second_ptr.as_ptr().add(1) = 0x33;
    }
    device.unmap_buffer(second.as_ref()).unwrap();

    let block = heap
        .as_any()
        .downcast_ref::<MockHeap>()
        .unwrap()
        .block
        .as_ref()
        .unwrap();
    unsafe {
        assert_eq!(*block.at(0).as_ptr(), 0x11);
        assert_eq!(*block.at(1024).as_ptr(), 0x22);
        assert_eq!(*block.at(1025).as_ptr(), 0x33);
    }
}

#[test]
fn heap_placement_out_of_bounds_is_rejected() {
    let device = validated_device();
    let heap = device
        .create_heap(&HeapDescriptor {
            size: 1024,
            memory_type: MemoryType::Upload,
            debug_name: None,
        })
        .unwrap();
    let desc = BufferDescriptor {
        size: 512,
        memory_type: MemoryType::Upload,
        ..BufferDescriptor::default()
    };
    let err = device.create_buffer_on_heap(&desc, &heap, 768).unwrap_err();
    assert!(matches!(err, RhiError::Validation(_)));
}

#[test]
fn heap_memory_type_mismatch_is_rejected() {
    let device = validated_device();
    let heap = device
        .create_heap(&HeapDescriptor {
            size: 1024,
            memory_type: MemoryType::DeviceLocal,
            debug_name: None,
        })
        .unwrap();
    let desc = BufferDescriptor {
        size: 256,
        memory_type: MemoryType::Upload,
        ..BufferDescriptor::default()
    };
    let err = device.create_buffer_on_heap(&desc, &heap, 0).unwrap_err();
    assert!(matches!(err, RhiError::Validation(_)));
}

#[test]
fn invalid_texture_descriptors_are_rejected() {
    let device = validated_device();

    let err = device
        .create_texture(&TextureDescriptor {
            width: 0,
            format: Format::Rgba8Unorm,
            ..TextureDescriptor::default()
        })
        .unwrap_err();
    assert!(matches!(err, RhiError::Validation(_)));

    let err = device
        .create_texture(&TextureDescriptor::default())
        .unwrap_err();
    assert!(matches!(err, RhiError::Validation(_)));

    let err = device
        .create_texture(&TextureDescriptor {
            format: Format::Rgba8Unorm,
            dimension: TextureDimension::Texture2D,
            sample_count: 4,
            ..TextureDescriptor::default()
        })
        .unwrap_err();
    assert!(matches!(err, RhiError::Validation(_)));
}

#[test]
fn invalid_sampler_descriptors_are_rejected() {
    let device = validated_device();

    let err = device
        .create_sampler(&SamplerDescriptor {
            max_anisotropy: 0,
            ..SamplerDescriptor::default()
        })
        .unwrap_err();
    assert!(matches!(err, RhiError::Validation(_)));

    let err = device
        .create_sampler(&SamplerDescriptor {
            mip_min: 4.0,
            mip_max: 2.0,
            ..SamplerDescriptor::default()
        })
        .unwrap_err();
    assert!(matches!(err, RhiError::Validation(_)));
}

#[test]
fn validator_is_transparent_for_valid_calls() {
    let bare = bare_device();
    let wrapped = DeviceValidator::wrap(Arc::clone(&bare));

    assert_eq!(wrapped.desc(), bare.desc());
    assert_eq!(wrapped.info(), bare.info());

    let buffer_desc = BufferDescriptor {
        size: 2048,
        memory_type: MemoryType::ReadBack,
        ..BufferDescriptor::default()
    };
    assert_eq!(
        wrapped.buffer_size_and_align(&buffer_desc),
        bare.buffer_size_and_align(&buffer_desc)
    );

    let texture_desc = TextureDescriptor {
        format: Format::Rgba8Unorm,
        width: 64,
        height: 64,
        ..TextureDescriptor::default()
    };
    assert_eq!(
        wrapped.texture_size_and_align(&texture_desc),
        bare.texture_size_and_align(&texture_desc)
    );

    let from_bare = bare.create_texture(&texture_desc).unwrap();
    let from_wrapped = wrapped.create_texture(&texture_desc).unwrap();
    assert_eq!(from_bare.desc(), from_wrapped.desc());

    let sampler_desc = SamplerDescriptor::default();
    let from_bare = bare.create_sampler(&sampler_desc).unwrap();
    let from_wrapped = wrapped.create_sampler(&sampler_desc).unwrap();
    assert_eq!(from_bare.desc(), from_wrapped.desc());
}

#[test]
fn adapter_wraps_device_in_validation_by_default() {
    let adapter = mock_adapter();
    assert_eq!(adapter.info().vendor_id, 0x1234);

    let device = adapter.create_device(&DeviceDescriptor::default()).unwrap();
    // The default descriptor enables validation, so a zero-size buffer is
    // caught by the layer.
    let err = device.create_buffer(&BufferDescriptor::default()).unwrap_err();
    assert!(matches!(err, RhiError::Validation(_)));
}

#[test]
fn native_handle_of_missing_type_is_invalid() {
    let device = bare_device();
    let buffer = device
        .create_buffer(&BufferDescriptor {
            size: 64,
            memory_type: MemoryType::Upload,
            ..BufferDescriptor::default()
        })
        .unwrap();
    assert!(!buffer.native_handle(NativeHandleType::VkBuffer).is_valid());
    assert!(buffer.native_handle(NativeHandleType::CuHostPtr).is_valid());

    let addr = buffer.device_address().unwrap();
    assert_ne!(addr, 0);
}

#[test]
fn texture_device_address_fails_loudly() {
    let device = bare_device();
    let texture = device
        .create_texture(&TextureDescriptor {
            format: Format::Rgba8Unorm,
            width: 4,
            height: 4,
            ..TextureDescriptor::default()
        })
        .unwrap();
    assert!(matches!(
        texture.device_address(),
        Err(RhiError::Unimplemented(_))
    ));
}
