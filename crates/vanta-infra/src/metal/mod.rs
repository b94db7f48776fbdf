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

//! Metal backend, built on the `metal` crate (macOS only).
//!
//! Heaps are Metal placement heaps so resources bind at explicit offsets,
//! matching the other backends. Metal object creation reports failure by
//! returning nil rather than an error code, so backend failures here carry
//! the constructor name and a zero code.

mod adapter;
mod conversions;
mod device;
mod resources;

pub use adapter::{enum_adapters, MetalAdapter};
pub use device::MetalDevice;
pub use resources::{MetalBuffer, MetalHeap, MetalSampler, MetalTexture};

use vanta_core::RhiError;

pub(crate) fn nil_error(call: &'static str) -> RhiError {
    RhiError::Backend { call, code: 0 }
}
