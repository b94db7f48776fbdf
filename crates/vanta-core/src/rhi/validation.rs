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

//! Validation layer: a transparent decorator over any [`GraphicsDevice`].
//!
//! Hard failures are reported as [`RhiError::Validation`] before the call
//! reaches the backend; advisory findings go to `log::warn!`. Valid calls
//! forward untouched, so a wrapped device is observably identical to the
//! bare one.

use std::fmt;
use std::ptr::NonNull;
use std::sync::Arc;

use crate::rhi::api::{
    BufferDescriptor, BufferRange, DeviceDescriptor, DeviceInfo, Format, HeapDescriptor,
    SamplerDescriptor, SizeAndAlign, TextureDescriptor, TextureDimension,
};
use crate::rhi::error::RhiError;
use crate::rhi::traits::{Buffer, GraphicsDevice, Heap, Sampler, Texture};

/// Wraps a device and validates descriptors and arguments before
/// forwarding.
pub struct DeviceValidator {
    inner: Arc<dyn GraphicsDevice>,
}

impl DeviceValidator {
    /// Wraps `inner` in a validator and erases it back to the trait.
    ///
    /// Adapters call this when `DeviceDescriptor::enable_validation` is
    /// set.
    pub fn wrap(inner: Arc<dyn GraphicsDevice>) -> Arc<dyn GraphicsDevice> {
        Arc::new(Self { inner })
    }

    fn error<T>(message: String) -> Result<T, RhiError> {
        Err(RhiError::Validation(message))
    }

    fn validate_heap(desc: &HeapDescriptor) -> Result<(), RhiError> {
        if desc.size == 0 {
            return Self::error("heap size must be non-zero".to_string());
        }
        Ok(())
    }

    fn validate_buffer(desc: &BufferDescriptor) -> Result<(), RhiError> {
        if desc.size == 0 {
            return Self::error("buffer size must be non-zero".to_string());
        }
        if desc.struct_stride != 0 && desc.format != Format::Unknown {
            return Self::error(
                "buffer cannot be both structured (struct_stride) and typed (format)".to_string(),
            );
        }
        if desc.struct_stride != 0 && desc.size % desc.struct_stride as u64 != 0 {
            log::warn!(
                "buffer size {} is not a multiple of struct_stride {}",
                desc.size,
                desc.struct_stride
            );
        }
        Ok(())
    }

    fn validate_placement(heap: &Arc<dyn Heap>, offset: u64, size: u64) -> Result<(), RhiError> {
        let heap_size = heap.desc().size;
        match offset.checked_add(size) {
            Some(end) if end <= heap_size => Ok(()),
            _ => Self::error(format!(
                "placement [{offset}, {offset} + {size}) exceeds heap size {heap_size}"
            )),
        }
    }

    fn validate_texture(desc: &TextureDescriptor) -> Result<(), RhiError> {
        if desc.dimension == TextureDimension::Unknown {
            return Self::error("texture dimension must be known".to_string());
        }
        if desc.format == Format::Unknown {
            return Self::error("texture format must be known".to_string());
        }
        if desc.width == 0 || desc.height == 0 || desc.depth == 0 {
            return Self::error(format!(
                "texture extents must be non-zero (got {}x{}x{})",
                desc.width, desc.height, desc.depth
            ));
        }
        if desc.array_size == 0 {
            return Self::error("texture array_size must be at least 1".to_string());
        }
        if desc.mip_levels == 0 {
            return Self::error("texture mip_levels must be at least 1".to_string());
        }
        if desc.sample_count == 0 {
            return Self::error("texture sample_count must be at least 1".to_string());
        }
        let multisampled = matches!(
            desc.dimension,
            TextureDimension::Texture2DMs | TextureDimension::Texture2DMsArray
        );
        if !multisampled && desc.sample_count > 1 {
            return Self::error(
                "sample_count > 1 requires a multisampled texture dimension".to_string(),
            );
        }
        if matches!(
            desc.dimension,
            TextureDimension::TextureCube | TextureDimension::TextureCubeArray
        ) && desc.array_size % 6 != 0
        {
            log::warn!(
                "cube texture array_size {} is not a multiple of 6",
                desc.array_size
            );
        }
        Ok(())
    }

    fn validate_sampler(desc: &SamplerDescriptor) -> Result<(), RhiError> {
        if desc.max_anisotropy == 0 {
            return Self::error("sampler max_anisotropy must be at least 1".to_string());
        }
        if desc.mip_min > desc.mip_max {
            return Self::error(format!(
                "sampler mip_min {} exceeds mip_max {}",
                desc.mip_min, desc.mip_max
            ));
        }
        if desc.max_anisotropy > 16 {
            log::warn!(
                "sampler max_anisotropy {} exceeds the common hardware limit of 16",
                desc.max_anisotropy
            );
        }
        Ok(())
    }

    fn validate_map_range(buffer: &dyn Buffer, range: BufferRange) -> Result<(), RhiError> {
        let size = buffer.desc().size;
        if range.offset > size {
            return Self::error(format!(
                "map offset {} exceeds buffer size {size}",
                range.offset
            ));
        }
        if range.size != u64::MAX {
            match range.offset.checked_add(range.size) {
                Some(end) if end <= size => {}
                _ => {
                    return Self::error(format!(
                        "map range [{}, {} + {}) exceeds buffer size {size}",
                        range.offset, range.offset, range.size
                    ));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for DeviceValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceValidator")
            .field("inner", &self.inner)
            .finish()
    }
}

impl GraphicsDevice for DeviceValidator {
    fn desc(&self) -> &DeviceDescriptor {
        self.inner.desc()
    }

    fn info(&self) -> &DeviceInfo {
        self.inner.info()
    }

    fn create_heap(&self, desc: &HeapDescriptor) -> Result<Arc<dyn Heap>, RhiError> {
        Self::validate_heap(desc)?;
        self.inner.create_heap(desc)
    }

    fn create_buffer(&self, desc: &BufferDescriptor) -> Result<Arc<dyn Buffer>, RhiError> {
        Self::validate_buffer(desc)?;
        self.inner.create_buffer(desc)
    }

    fn create_buffer_on_heap(
        &self,
        desc: &BufferDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Buffer>, RhiError> {
        Self::validate_buffer(desc)?;
        let heap_memory = heap.desc().memory_type;
        if heap_memory != desc.memory_type {
            return Self::error(format!(
                "buffer memory type {:?} does not match heap memory type {heap_memory:?}",
                desc.memory_type
            ));
        }
        Self::validate_placement(heap, offset, desc.size)?;
        self.inner.create_buffer_on_heap(desc, heap, offset)
    }

    fn buffer_size_and_align(&self, desc: &BufferDescriptor) -> SizeAndAlign {
        self.inner.buffer_size_and_align(desc)
    }

    fn map_buffer(
        &self,
        buffer: &dyn Buffer,
        range: BufferRange,
    ) -> Result<Option<NonNull<u8>>, RhiError> {
        Self::validate_map_range(buffer, range)?;
        self.inner.map_buffer(buffer, range)
    }

    fn unmap_buffer(&self, buffer: &dyn Buffer) -> Result<(), RhiError> {
        self.inner.unmap_buffer(buffer)
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> Result<Arc<dyn Texture>, RhiError> {
        Self::validate_texture(desc)?;
        self.inner.create_texture(desc)
    }

    fn create_texture_on_heap(
        &self,
        desc: &TextureDescriptor,
        heap: &Arc<dyn Heap>,
        offset: u64,
    ) -> Result<Arc<dyn Texture>, RhiError> {
        Self::validate_texture(desc)?;
        let size = self.inner.texture_size_and_align(desc).size;
        Self::validate_placement(heap, offset, size)?;
        self.inner.create_texture_on_heap(desc, heap, offset)
    }

    fn texture_size_and_align(&self, desc: &TextureDescriptor) -> SizeAndAlign {
        self.inner.texture_size_and_align(desc)
    }

    fn create_sampler(&self, desc: &SamplerDescriptor) -> Result<Arc<dyn Sampler>, RhiError> {
        Self::validate_sampler(desc)?;
        self.inner.create_sampler(desc)
    }
}
