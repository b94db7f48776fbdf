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

//! Buffer descriptor and related value types.

use super::enums::MemoryType;
use super::flags::ResourceStates;
use super::format::Format;

/// A byte range within a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferRange {
    /// Length of the range in bytes. [`BufferRange::ENTIRE`] uses `u64::MAX`
    /// to mean "to the end of the buffer".
    pub size: u64,
    /// Start of the range in bytes from the beginning of the buffer.
    pub offset: u64,
}

impl BufferRange {
    /// The whole buffer, from offset zero.
    pub const ENTIRE: Self = Self {
        size: u64::MAX,
        offset: 0,
    };

    /// Resolves this range against a buffer of `buffer_size` bytes,
    /// clamping an `ENTIRE`-style size to the end of the buffer.
    pub fn resolve(&self, buffer_size: u64) -> BufferRange {
        let offset = self.offset.min(buffer_size);
        BufferRange {
            offset,
            size: self.size.min(buffer_size - offset),
        }
    }
}

impl Default for BufferRange {
    fn default() -> Self {
        Self::ENTIRE
    }
}

/// Size and alignment requirements reported by a device for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeAndAlign {
    /// Required allocation size in bytes.
    pub size: u64,
    /// Required allocation alignment in bytes.
    pub align: u64,
}

/// Describes a buffer resource.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferDescriptor {
    /// Size of the buffer in bytes. Must be non-zero.
    pub size: u64,
    /// Element stride for structured buffers; zero for unstructured ones.
    pub struct_stride: u32,
    /// View format for typed buffers; [`Format::Unknown`] for raw buffers.
    pub format: Format,
    /// The memory class the buffer lives in.
    pub memory_type: MemoryType,
    /// State the buffer starts in.
    pub default_state: ResourceStates,
    /// Every state the buffer may transition through.
    pub allowed_states: ResourceStates,
    /// Buffer may be bound as a vertex buffer.
    pub is_vertex_buffer: bool,
    /// Buffer may be bound as an index buffer.
    pub is_index_buffer: bool,
    /// Buffer is created for cross-API sharing.
    pub is_shared: bool,
    /// Optional name surfaced to native debugging tools and logs.
    pub debug_name: Option<String>,
}

impl Default for BufferDescriptor {
    fn default() -> Self {
        Self {
            size: 0,
            struct_stride: 0,
            format: Format::Unknown,
            memory_type: MemoryType::DeviceLocal,
            default_state: ResourceStates::UNDEFINED,
            allowed_states: ResourceStates::UNDEFINED,
            is_vertex_buffer: false,
            is_index_buffer: false,
            is_shared: false,
            debug_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entire_range_resolves_to_buffer_bounds() {
        let range = BufferRange::ENTIRE.resolve(256);
        assert_eq!(range.offset, 0);
        assert_eq!(range.size, 256);
    }

    #[test]
    fn partial_range_clamps_to_end() {
        let range = BufferRange {
            offset: 192,
            size: u64::MAX,
        }
        .resolve(256);
        assert_eq!(range.offset, 192);
        assert_eq!(range.size, 64);
    }
}
