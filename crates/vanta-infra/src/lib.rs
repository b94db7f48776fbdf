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

//! # Vanta Infra
//!
//! Concrete backend implementations of the `vanta-core` contracts: Vulkan
//! (through `ash`, loaded at runtime), CUDA (driver API through
//! `libloading`), Metal (macOS only) and a D3D12 stub, plus the global
//! adapter/device dispatch entry points.

pub mod cuda;
pub mod d3d12;
pub mod dispatch;
#[cfg(target_os = "macos")]
pub mod metal;
pub mod vulkan;

pub use dispatch::{create_device, default_adapter, enum_adapters, resolve_api};
