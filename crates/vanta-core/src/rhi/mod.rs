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

//! Render hardware interface: descriptors, formats, device and resource
//! traits, and the validation decorator.

pub mod api;
pub mod base;
pub mod error;
pub mod traits;
pub mod validation;

pub use api::*;
pub use error::RhiError;
pub use traits::{Buffer, GraphicsAdapter, GraphicsDevice, Heap, Resource, Sampler, Texture};
pub use validation::DeviceValidator;
