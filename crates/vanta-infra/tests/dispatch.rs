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

//! Adapter enumeration and device creation through the dispatch layer.
//!
//! These tests run on machines with or without GPU drivers: enumeration of
//! an absent backend must succeed with an empty list, and the tests that
//! need a real device only run when one enumerates.

use std::sync::Arc;

use vanta_core::rhi::api::{
    BufferDescriptor, BufferRange, DeviceDescriptor, DeviceFeatures, GraphicsApi, HeapDescriptor,
    MemoryType,
};
use vanta_infra::{create_device, default_adapter, enum_adapters, resolve_api};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn automatic_never_resolves_to_itself_or_cuda() {
    let resolved = resolve_api(GraphicsApi::Automatic);
    assert_ne!(resolved, GraphicsApi::Automatic);
    assert_ne!(resolved, GraphicsApi::Cuda);
}

#[test]
fn d3d12_enumerates_no_adapters() {
    init_logger();
    let adapters = enum_adapters(GraphicsApi::D3d12).unwrap();
    assert!(adapters.is_empty());
}

#[test]
fn default_adapter_is_none_exactly_when_enumeration_is_empty() {
    init_logger();
    for api in [GraphicsApi::Vulkan, GraphicsApi::Cuda, GraphicsApi::Metal] {
        let adapters = enum_adapters(api).unwrap();
        let default = default_adapter(api).unwrap();
        assert_eq!(default.is_none(), adapters.is_empty(), "api {api}");
        if let (Some(default), Some(first)) = (default, adapters.first()) {
            assert_eq!(default.info().luid, first.info().luid);
            assert_eq!(default.info().name, first.info().name);
        }
    }
}

#[test]
fn create_device_without_adapters_is_none_not_an_error() {
    init_logger();
    let device = create_device(GraphicsApi::D3d12, &DeviceDescriptor::default(), None).unwrap();
    assert!(device.is_none());
}

#[test]
fn adapter_identities_are_consistent() {
    init_logger();
    for api in [GraphicsApi::Vulkan, GraphicsApi::Cuda] {
        for adapter in enum_adapters(api).unwrap() {
            let info = adapter.info();
            assert_eq!(info.api, api);
            assert!(!info.name.is_empty());
        }
    }
}

// Exercised only when a Vulkan driver is installed.
#[test]
fn vulkan_device_round_trip_when_driver_present() {
    init_logger();
    let desc = DeviceDescriptor::default();
    let device = match create_device(GraphicsApi::Vulkan, &desc, None).unwrap() {
        Some(device) => device,
        None => return,
    };
    let info = device.info();
    assert_eq!(info.api, GraphicsApi::Vulkan);
    assert!(info.limits.max_texture_dimension_2d >= 4096);

    let buffer_desc = BufferDescriptor {
        size: 1024,
        memory_type: MemoryType::Upload,
        debug_name: Some("dispatch-test".to_string()),
        ..Default::default()
    };
    let buffer = device.create_buffer(&buffer_desc).unwrap();
    assert_eq!(buffer.desc().size, 1024);

    let mapped = device.map_buffer(buffer.as_ref(), BufferRange::ENTIRE).unwrap();
    let ptr = mapped.expect("upload buffers are host-visible");
    unsafe {
        std::ptr::write_bytes(ptr.as_ptr(), 0xa5, 1024);
    }
    device.unmap_buffer(buffer.as_ref()).unwrap();

    // Zero-size buffers fail on the validated path.
    let invalid = BufferDescriptor {
        size: 0,
        ..Default::default()
    };
    assert!(device.create_buffer(&invalid).is_err());
}

// Exercised only when a Vulkan driver is installed.
#[test]
fn vulkan_placed_buffers_share_heap_memory_safely() {
    init_logger();
    let device = match create_device(GraphicsApi::Vulkan, &DeviceDescriptor::default(), None)
        .unwrap()
    {
        Some(device) => device,
        None => return,
    };

    let buffer_desc = BufferDescriptor {
        size: 256,
        memory_type: MemoryType::Upload,
        ..Default::default()
    };
    let required = device.buffer_size_and_align(&buffer_desc);
    let stride = required.size.max(required.align).next_power_of_two();
    let heap = device
        .create_heap(&HeapDescriptor {
            size: stride * 4,
            memory_type: MemoryType::Upload,
            debug_name: None,
        })
        .unwrap();
    let first = device.create_buffer_on_heap(&buffer_desc, &heap, 0).unwrap();
    let second = device
        .create_buffer_on_heap(&buffer_desc, &heap, stride)
        .unwrap();

    // Both buffers share the heap's memory object; mapping them at the
    // same time and unmapping one must leave the other pointer valid.
    let first_ptr = device
        .map_buffer(first.as_ref(), BufferRange::ENTIRE)
        .unwrap()
        .unwrap();
    let second_ptr = device
        .map_buffer(second.as_ref(), BufferRange::ENTIRE)
        .unwrap()
        .unwrap();
    unsafe {
        std::ptr::write_bytes(first_ptr.as_ptr(), 0x11, 256);
        std::ptr::write_bytes(second_ptr.as_ptr(), 0x22, 256);
    }
    device.unmap_buffer(first.as_ref()).unwrap();
    unsafe {
        assert_eq!(*second_ptr.as_ptr(), 0x22);
        *second_ptr.as_ptr() = 0x33;
    }
    device.unmap_buffer(second.as_ref()).unwrap();

    // Placed buffers report device addresses whenever the device does.
    if device
        .info()
        .features
        .contains(DeviceFeatures::BUFFER_DEVICE_ADDRESS)
    {
        assert_ne!(first.device_address().unwrap(), 0);
        assert_ne!(second.device_address().unwrap(), 0);
    }
}

// Exercised only when an NVIDIA driver is installed.
#[test]
fn cuda_device_round_trip_when_driver_present() {
    init_logger();
    let desc = DeviceDescriptor::default();
    let device = match create_device(GraphicsApi::Cuda, &desc, None).unwrap() {
        Some(device) => device,
        None => return,
    };
    assert_eq!(device.info().api, GraphicsApi::Cuda);

    let buffer_desc = BufferDescriptor {
        size: 256,
        memory_type: MemoryType::Upload,
        ..Default::default()
    };
    let buffer = device.create_buffer(&buffer_desc).unwrap();
    let mapped = device.map_buffer(buffer.as_ref(), BufferRange::ENTIRE).unwrap();
    assert!(mapped.is_some());
    device.unmap_buffer(buffer.as_ref()).unwrap();
    assert!(buffer.device_address().unwrap() != 0);
}

#[test]
fn explicit_adapter_is_honored() {
    init_logger();
    let adapters = enum_adapters(GraphicsApi::Vulkan).unwrap();
    let adapter: Arc<_> = match adapters.into_iter().next() {
        Some(adapter) => adapter,
        None => return,
    };
    let device = create_device(
        GraphicsApi::Vulkan,
        &DeviceDescriptor::default(),
        Some(&adapter),
    )
    .unwrap()
    .expect("an explicit adapter always yields a device");
    assert_eq!(device.info().adapter_name, adapter.info().name);
}
