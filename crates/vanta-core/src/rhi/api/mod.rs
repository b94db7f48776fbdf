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

//! Plain-data API surface: enums, flags, descriptors, formats and handles.

pub mod adapter;
pub mod buffer;
pub mod device;
pub mod enums;
pub mod flags;
pub mod format;
pub mod handle;
pub mod heap;
pub mod sampler;
pub mod texture;

pub use adapter::{AdapterInfo, AdapterLuid};
pub use buffer::{BufferDescriptor, BufferRange, SizeAndAlign};
pub use device::{DeviceDescriptor, DeviceInfo, DeviceLimits};
pub use enums::{
    ComparisonFunc, GraphicsApi, MemoryType, TextureAddressingMode, TextureDimension,
    TextureFilteringMode, TextureReductionOp,
};
pub use flags::{DeviceFeatures, ResourceStates};
pub use format::{Format, FormatInfo, FormatKind};
pub use handle::{NativeHandle, NativeHandleType};
pub use heap::HeapDescriptor;
pub use sampler::SamplerDescriptor;
pub use texture::TextureDescriptor;

/// An address in GPU memory, as exposed by backends that support querying
/// resource addresses (Vulkan buffer device addresses, CUDA device pointers,
/// Metal GPU addresses).
pub type DeviceAddress = u64;
