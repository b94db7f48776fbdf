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

//! The physical adapter contract.

use std::fmt::Debug;
use std::sync::Arc;

use crate::rhi::api::{AdapterInfo, DeviceDescriptor};
use crate::rhi::error::RhiError;
use crate::rhi::traits::device::GraphicsDevice;

/// A physical adapter discovered during enumeration.
///
/// Adapters are plain identity snapshots; all native enumeration state is
/// released before they are returned, so they stay valid indefinitely.
pub trait GraphicsAdapter: Debug + Send + Sync + 'static {
    /// The identity copied out during enumeration.
    fn info(&self) -> &AdapterInfo;

    /// Creates a logical device on this adapter.
    ///
    /// When `desc.enable_validation` is set, the returned device is already
    /// wrapped in the validation layer.
    fn create_device(&self, desc: &DeviceDescriptor)
        -> Result<Arc<dyn GraphicsDevice>, RhiError>;
}
