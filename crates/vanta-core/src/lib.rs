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

//! # Vanta Core
//!
//! Foundational crate containing the backend-agnostic GPU contracts: resource
//! descriptors, the format table, the `GraphicsDevice` / `GraphicsAdapter`
//! traits, and the validation layer that wraps any device implementation.
//!
//! Backend crates implement these traits against native APIs; application
//! code only ever sees the trait objects defined here.

#![warn(missing_docs)]

pub mod rhi;

pub use rhi::error::RhiError;
