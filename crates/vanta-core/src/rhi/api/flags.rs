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

//! Bit-flag types for resource states and device features.

/// States a resource can be in or transition through.
///
/// Descriptors use these to declare the initial (`default_state`) and the
/// full set of allowed (`allowed_states`) states for a resource. Multiple
/// states combine with bitwise operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResourceStates {
    bits: u32,
}

impl ResourceStates {
    /// No declared state.
    pub const UNDEFINED: Self = Self { bits: 0 };
    /// Generic read/write access.
    pub const GENERAL: Self = Self { bits: 1 << 0 };
    /// Bound as a vertex buffer.
    pub const VERTEX_BUFFER: Self = Self { bits: 1 << 1 };
    /// Bound as an index buffer.
    pub const INDEX_BUFFER: Self = Self { bits: 1 << 2 };
    /// Bound as a constant buffer.
    pub const CONSTANT_BUFFER: Self = Self { bits: 1 << 3 };
    /// Read through a shader resource view.
    pub const SHADER_RESOURCE: Self = Self { bits: 1 << 4 };
    /// Read/write through an unordered access view.
    pub const UNORDERED_ACCESS: Self = Self { bits: 1 << 5 };
    /// Bound as a render target.
    pub const RENDER_TARGET: Self = Self { bits: 1 << 6 };
    /// Depth buffer, read-only.
    pub const DEPTH_READ: Self = Self { bits: 1 << 7 };
    /// Depth buffer, writable.
    pub const DEPTH_WRITE: Self = Self { bits: 1 << 8 };
    /// Presented to a swap chain.
    pub const PRESENT: Self = Self { bits: 1 << 9 };
    /// Source of an indirect draw/dispatch argument.
    pub const INDIRECT_ARGUMENT: Self = Self { bits: 1 << 10 };
    /// Source of a copy.
    pub const COPY_SOURCE: Self = Self { bits: 1 << 11 };
    /// Destination of a copy.
    pub const COPY_DESTINATION: Self = Self { bits: 1 << 12 };
    /// Source of a multisample resolve.
    pub const RESOLVE_SOURCE: Self = Self { bits: 1 << 13 };
    /// Destination of a multisample resolve.
    pub const RESOLVE_DESTINATION: Self = Self { bits: 1 << 14 };

    /// Creates a state set from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Combines two state sets.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks whether every state in `other` is present in `self`.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks whether any state in `other` is present in `self`.
    pub const fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != 0
    }

    /// Checks whether no state is set.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl std::ops::BitOr for ResourceStates {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for ResourceStates {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl std::ops::BitAnd for ResourceStates {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits & rhs.bits,
        }
    }
}

/// Optional capabilities a device reports after creation.
///
/// Callers can test these before relying on features that not every backend
/// or adapter provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeviceFeatures {
    bits: u32,
}

impl DeviceFeatures {
    /// No optional features.
    pub const NONE: Self = Self { bits: 0 };
    /// `Buffer::device_address` returns a usable GPU address.
    pub const BUFFER_DEVICE_ADDRESS: Self = Self { bits: 1 << 0 };
    /// Anisotropic filtering is honored by samplers.
    pub const SAMPLER_ANISOTROPY: Self = Self { bits: 1 << 1 };
    /// Timestamp queries are available and `timestamp_frequency` is valid.
    pub const TIMESTAMP_QUERY: Self = Self { bits: 1 << 2 };
    /// Resources can be created for cross-API sharing.
    pub const SHARED_RESOURCES: Self = Self { bits: 1 << 3 };

    /// Creates a feature set from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Combines two feature sets.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks whether every feature in `other` is present in `self`.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks whether no feature is set.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl std::ops::BitOr for DeviceFeatures {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for DeviceFeatures {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_states_combine() {
        let states = ResourceStates::COPY_SOURCE | ResourceStates::COPY_DESTINATION;
        assert!(states.contains(ResourceStates::COPY_SOURCE));
        assert!(states.contains(ResourceStates::COPY_DESTINATION));
        assert!(!states.contains(ResourceStates::RENDER_TARGET));
        assert!(states.intersects(ResourceStates::COPY_SOURCE));
        assert!(!states.intersects(ResourceStates::PRESENT));
    }

    #[test]
    fn resource_states_empty() {
        assert!(ResourceStates::UNDEFINED.is_empty());
        assert!(ResourceStates::default().is_empty());
        assert!(!ResourceStates::GENERAL.is_empty());
    }

    #[test]
    fn device_features_contains() {
        let mut features = DeviceFeatures::NONE;
        assert!(!features.contains(DeviceFeatures::BUFFER_DEVICE_ADDRESS));
        features |= DeviceFeatures::BUFFER_DEVICE_ADDRESS;
        assert!(features.contains(DeviceFeatures::BUFFER_DEVICE_ADDRESS));
        assert!(!features.contains(DeviceFeatures::TIMESTAMP_QUERY));
    }
}
