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

//! Type-tagged escape hatch to native API objects.

/// Identifies which native object a [`NativeHandle`] carries.
///
/// Values are grouped by API: `0x1xx` D3D12, `0x2xx` Vulkan, `0x3xx` Metal,
/// `0x4xx` CUDA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
#[repr(u32)]
pub enum NativeHandleType {
    #[default]
    Unknown = 0x000,

    D3d12Device = 0x100,
    D3d12Resource = 0x101,

    VkInstance = 0x200,
    VkPhysicalDevice = 0x201,
    VkDevice = 0x202,
    VkBuffer = 0x203,
    VkImage = 0x204,
    VkSampler = 0x205,
    VkDeviceMemory = 0x206,

    MtlDevice = 0x300,
    MtlBuffer = 0x301,
    MtlTexture = 0x302,
    MtlSamplerState = 0x303,
    MtlHeap = 0x304,

    CuDevice = 0x400,
    CuContext = 0x401,
    CuDevicePtr = 0x402,
    CuHostPtr = 0x403,
}

/// A native API object, erased to 64 bits and tagged with its type.
///
/// Asking a resource for a handle type it does not have yields an *invalid*
/// handle, not an error; callers check [`NativeHandle::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle {
    handle_type: NativeHandleType,
    value: u64,
}

impl NativeHandle {
    /// The value carried by invalid handles.
    pub const INVALID_VALUE: u64 = u64::MAX;

    /// Creates a handle wrapping a native object.
    pub const fn new(handle_type: NativeHandleType, value: u64) -> Self {
        Self { handle_type, value }
    }

    /// Creates the invalid handle.
    pub const fn invalid() -> Self {
        Self {
            handle_type: NativeHandleType::Unknown,
            value: Self::INVALID_VALUE,
        }
    }

    /// The tag describing what `value` is.
    pub const fn handle_type(&self) -> NativeHandleType {
        self.handle_type
    }

    /// The raw native object, as 64 bits.
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Whether this handle refers to a real native object.
    pub const fn is_valid(&self) -> bool {
        self.value != Self::INVALID_VALUE
    }
}

impl Default for NativeHandle {
    fn default() -> Self {
        Self::invalid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_by_default() {
        let handle = NativeHandle::default();
        assert!(!handle.is_valid());
        assert_eq!(handle.handle_type(), NativeHandleType::Unknown);
        assert_eq!(handle.value(), NativeHandle::INVALID_VALUE);
    }

    #[test]
    fn valid_handle_round_trip() {
        let handle = NativeHandle::new(NativeHandleType::VkBuffer, 0xdead_beef);
        assert!(handle.is_valid());
        assert_eq!(handle.handle_type(), NativeHandleType::VkBuffer);
        assert_eq!(handle.value(), 0xdead_beef);
    }
}
