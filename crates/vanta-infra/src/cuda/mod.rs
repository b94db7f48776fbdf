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

//! CUDA backend, built directly on the driver API.
//!
//! `libcuda` is loaded at runtime; a machine without an NVIDIA driver
//! enumerates no adapters. The backend exposes linear memory only: buffers
//! and heaps work, textures and samplers report `Unsupported`.

mod adapter;
mod api;
mod device;
mod resources;

pub use adapter::{enum_adapters, CudaAdapter};
pub use device::CudaDevice;
pub use resources::{CudaBuffer, CudaHeap};

use vanta_core::RhiError;

pub(crate) fn check(call: &'static str, code: api::CuResult) -> Result<(), RhiError> {
    if code == api::CUDA_SUCCESS {
        Ok(())
    } else {
        Err(RhiError::Backend {
            call,
            code: code as i64,
        })
    }
}
