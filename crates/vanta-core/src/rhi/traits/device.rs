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

//! The logical device contract.

use std::fmt::Debug;
use std::ptr::NonNull;
use std::sync::Arc;

use crate::rhi::api::{
    BufferDescriptor, BufferRange, DeviceDescriptor, DeviceInfo, HeapDescriptor,
    SamplerDescriptor, SizeAndAlign, TextureDescriptor,
};
use crate::rhi::error::RhiError;
use crate::rhi::traits::resource::{Buffer, Heap, Sampler, Texture};

/// A logical GPU device: the factory for heaps, buffers, textures and
/// samplers.
///
/// Implementations are shared as `Arc<dyn GraphicsDevice>` and must be safe
/// to call from multiple threads. The validation layer wraps any
/// implementation of this trait without changing observable behavior of
/// valid calls.
pub trait GraphicsDevice: Debug + Send + Sync + 'static {
    /// The descriptor the device was created with.
    fn desc(&self) -> &DeviceDescriptor;

    /// Limits, features and adapter identity of this device.
    fn info(&self) -> &DeviceInfo;

    /// Creates a memory heap for placed resources.
    fn create_heap(&self, desc: &HeapDescriptor) -> Result<Arc<dyn Heap>, RhiError>;

    /// Creates a buffer with its own memory allocation.
    ///
    /// ## Arguments
    ///
    /// * `desc` - Describes size, memory class and allowed usage. The size
    ///   must be non-zero.
    ///
    /// ## Returns
    ///
    /// The buffer, which reports a copy of `desc` from
    /// [`Buffer::desc`](crate::rhi::traits::Buffer::desc).
    fn create_buffer(&self, desc: &BufferDescriptor) -> Result<Arc<dyn Buffer>, RhiError>;

    /// Creates a buffer placed into `heap` at `offset` bytes.
    ///
    /// The range `[offset, offset + size)` must lie inside the heap and the
    /// heap's memory type must match the descriptor's. The buffer holds a
    /// strong reference to the heap and never frees heap memory itself.
    fn create_buffer_on_heap(
        &self,
        desc: &BufferDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Buffer>, RhiError>;

    /// Reports the allocation size and alignment `desc` would require.
    fn buffer_size_and_align(&self, desc: &BufferDescriptor) -> SizeAndAlign;

    /// Maps a range of a buffer into host address space.
    ///
    /// ## Returns
    ///
    /// * `Ok(Some(ptr))` - Host pointer to the start of the range, for
    ///   `Upload` and `ReadBack` buffers.
    /// * `Ok(None)` - The buffer is `DeviceLocal` and has no host mapping.
    /// * `Err(_)` - The buffer belongs to another device or the range is
    ///   out of bounds.
    fn map_buffer(
        &self,
        buffer: &dyn Buffer,
        range: BufferRange,
    ) -> Result<Option<NonNull<u8>>, RhiError>;

    /// Releases a mapping obtained from
    /// [`map_buffer`](GraphicsDevice::map_buffer). A no-op for buffers that
    /// were never mapped.
    fn unmap_buffer(&self, buffer: &dyn Buffer) -> Result<(), RhiError>;

    /// Creates a texture with its own memory allocation.
    fn create_texture(&self, desc: &TextureDescriptor) -> Result<Arc<dyn Texture>, RhiError>;

    /// Creates a texture placed into `heap` at `offset` bytes; same
    /// placement rules as
    /// [`create_buffer_on_heap`](GraphicsDevice::create_buffer_on_heap).
    fn create_texture_on_heap(
        &self,
        desc: &TextureDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Texture>, RhiError>;

    /// Reports the allocation size and alignment `desc` would require.
    fn texture_size_and_align(&self, desc: &TextureDescriptor) -> SizeAndAlign;

    /// Creates a sampler state object.
    fn create_sampler(&self, desc: &SamplerDescriptor) -> Result<Arc<dyn Sampler>, RhiError>;
}
