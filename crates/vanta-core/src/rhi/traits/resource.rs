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

//! Resource trait hierarchy: heaps, buffers, textures, samplers.

use std::any::Any;
use std::fmt::Debug;

use crate::rhi::api::{
    BufferDescriptor, DeviceAddress, HeapDescriptor, NativeHandle, NativeHandleType,
    SamplerDescriptor, TextureDescriptor,
};
use crate::rhi::error::RhiError;

/// Common behavior of every device-created object.
///
/// Resources are shared as `Arc<dyn …>`; a resource keeps its owning device
/// (and, for placed resources, its heap) alive through strong references,
/// so dropping the last `Arc` releases native objects in a safe order.
pub trait Resource: Debug + Send + Sync + 'static {
    /// Returns the underlying native object of the requested type.
    ///
    /// Returns an invalid handle (not an error) when the resource has no
    /// native object of that type.
    fn native_handle(&self, handle_type: NativeHandleType) -> NativeHandle;

    /// Checked-downcast seam; backends use this to recover their concrete
    /// resource types from `dyn` references.
    fn as_any(&self) -> &dyn Any;
}

/// A block of memory that resources can be placed into.
pub trait Heap: Resource {
    /// The descriptor the heap was created with.
    fn desc(&self) -> &HeapDescriptor;
}

/// A linear memory resource.
pub trait Buffer: Resource {
    /// The descriptor the buffer was created with.
    fn desc(&self) -> &BufferDescriptor;

    /// The buffer's GPU address.
    ///
    /// ## Returns
    ///
    /// The address, or an error when the backend or adapter cannot provide
    /// one. Never silently returns a placeholder address.
    fn device_address(&self) -> Result<DeviceAddress, RhiError>;
}

/// An image resource.
pub trait Texture: Resource {
    /// The descriptor the texture was created with.
    fn desc(&self) -> &TextureDescriptor;

    /// The texture's GPU address.
    ///
    /// No current backend defines one; this reports
    /// [`RhiError::Unimplemented`] rather than inventing a value.
    fn device_address(&self) -> Result<DeviceAddress, RhiError>;
}

/// A texture sampling state object.
pub trait Sampler: Resource {
    /// The descriptor the sampler was created with.
    fn desc(&self) -> &SamplerDescriptor;
}
