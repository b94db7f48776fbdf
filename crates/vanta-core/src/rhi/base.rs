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

//! Descriptor storage shared by backend resource types.
//!
//! Every backend resource embeds one of these so the "store a copy of the
//! descriptor, hand it back by reference" contract is written once.

use crate::rhi::api::{
    BufferDescriptor, DeviceDescriptor, DeviceInfo, HeapDescriptor, SamplerDescriptor,
    TextureDescriptor,
};

/// Descriptor storage for heap implementations.
#[derive(Debug)]
pub struct HeapBase {
    desc: HeapDescriptor,
}

impl HeapBase {
    /// Stores a copy of `desc`.
    pub fn new(desc: &HeapDescriptor) -> Self {
        Self { desc: desc.clone() }
    }

    /// The stored descriptor.
    pub fn desc(&self) -> &HeapDescriptor {
        &self.desc
    }
}

/// Descriptor storage for buffer implementations.
#[derive(Debug)]
pub struct BufferBase {
    desc: BufferDescriptor,
}

impl BufferBase {
    /// Stores a copy of `desc`.
    pub fn new(desc: &BufferDescriptor) -> Self {
        Self { desc: desc.clone() }
    }

    /// The stored descriptor.
    pub fn desc(&self) -> &BufferDescriptor {
        &self.desc
    }
}

/// Descriptor storage for texture implementations.
#[derive(Debug)]
pub struct TextureBase {
    desc: TextureDescriptor,
}

impl TextureBase {
    /// Stores a copy of `desc`.
    pub fn new(desc: &TextureDescriptor) -> Self {
        Self { desc: desc.clone() }
    }

    /// The stored descriptor.
    pub fn desc(&self) -> &TextureDescriptor {
        &self.desc
    }
}

/// Descriptor storage for sampler implementations.
#[derive(Debug)]
pub struct SamplerBase {
    desc: SamplerDescriptor,
}

impl SamplerBase {
    /// Stores a copy of `desc`.
    pub fn new(desc: &SamplerDescriptor) -> Self {
        Self { desc: desc.clone() }
    }

    /// The stored descriptor.
    pub fn desc(&self) -> &SamplerDescriptor {
        &self.desc
    }
}

/// Descriptor and info storage for device implementations.
#[derive(Debug)]
pub struct DeviceBase {
    desc: DeviceDescriptor,
    info: DeviceInfo,
}

impl DeviceBase {
    /// Stores a copy of `desc` together with the freshly built `info`.
    pub fn new(desc: &DeviceDescriptor, info: DeviceInfo) -> Self {
        Self {
            desc: desc.clone(),
            info,
        }
    }

    /// The stored descriptor.
    pub fn desc(&self) -> &DeviceDescriptor {
        &self.desc
    }

    /// The stored device info.
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }
}
