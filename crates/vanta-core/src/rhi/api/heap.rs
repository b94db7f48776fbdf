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

//! Memory heap descriptor.

use super::enums::MemoryType;

/// Describes a block of memory that resources can be placed into.
///
/// Resources created "on" a heap sub-range its memory at a caller-chosen
/// offset and keep the heap alive for their whole lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct HeapDescriptor {
    /// Size of the heap in bytes. Must be non-zero.
    pub size: u64,
    /// The memory class the heap allocates from. Resources placed on the
    /// heap must request the same memory type.
    pub memory_type: MemoryType,
    /// Optional name surfaced to native debugging tools and logs.
    pub debug_name: Option<String>,
}

impl Default for HeapDescriptor {
    fn default() -> Self {
        Self {
            size: 0,
            memory_type: MemoryType::DeviceLocal,
            debug_name: None,
        }
    }
}
