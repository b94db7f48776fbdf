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

//! Backend-independent adapter enumeration and device creation.

use std::sync::Arc;

use vanta_core::rhi::api::{DeviceDescriptor, GraphicsApi};
use vanta_core::rhi::traits::{GraphicsAdapter, GraphicsDevice};
use vanta_core::RhiError;

/// Resolves [`GraphicsApi::Automatic`] to the platform's preferred API.
///
/// D3D12 on Windows, Metal on macOS, Vulkan everywhere else. CUDA is only
/// ever used when requested explicitly.
pub fn resolve_api(api: GraphicsApi) -> GraphicsApi {
    if api != GraphicsApi::Automatic {
        return api;
    }
    #[cfg(target_os = "windows")]
    {
        GraphicsApi::D3d12
    }
    #[cfg(target_os = "macos")]
    {
        GraphicsApi::Metal
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        GraphicsApi::Vulkan
    }
}

/// Lists the physical adapters available through `api`.
///
/// A missing driver or native library is not an error; it yields an empty
/// list. Adapters are identity snapshots and keep no native enumeration
/// state alive.
pub fn enum_adapters(api: GraphicsApi) -> Result<Vec<Arc<dyn GraphicsAdapter>>, RhiError> {
    match resolve_api(api) {
        // resolve_api never returns Automatic.
        GraphicsApi::Automatic => Ok(Vec::new()),
        GraphicsApi::D3d12 => crate::d3d12::enum_adapters(),
        GraphicsApi::Vulkan => crate::vulkan::enum_adapters(),
        GraphicsApi::Cuda => crate::cuda::enum_adapters(),
        #[cfg(target_os = "macos")]
        GraphicsApi::Metal => crate::metal::enum_adapters(),
        #[cfg(not(target_os = "macos"))]
        GraphicsApi::Metal => {
            log::debug!("metal backend is unavailable on this platform");
            Ok(Vec::new())
        }
    }
}

/// Returns the first adapter for `api`, or `None` when there are none.
pub fn default_adapter(api: GraphicsApi) -> Result<Option<Arc<dyn GraphicsAdapter>>, RhiError> {
    let mut adapters = enum_adapters(api)?;
    if adapters.is_empty() {
        return Ok(None);
    }
    Ok(Some(adapters.remove(0)))
}

/// Creates a device on `adapter`, or on the default adapter for `api` when
/// no adapter is given.
///
/// Returns `Ok(None)` when no adapter is available at all; descriptor and
/// backend failures are reported as errors.
pub fn create_device(
    api: GraphicsApi,
    desc: &DeviceDescriptor,
    adapter: Option<&Arc<dyn GraphicsAdapter>>,
) -> Result<Option<Arc<dyn GraphicsDevice>>, RhiError> {
    let adapter = match adapter {
        Some(adapter) => Arc::clone(adapter),
        None => match default_adapter(api)? {
            Some(adapter) => adapter,
            None => {
                log::info!("no {} adapter available", resolve_api(api));
                return Ok(None);
            }
        },
    };
    log::info!(
        "creating {} device on \"{}\"",
        adapter.info().api,
        adapter.info().name
    );
    adapter.create_device(desc).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_apis_resolve_to_themselves() {
        assert_eq!(resolve_api(GraphicsApi::Vulkan), GraphicsApi::Vulkan);
        assert_eq!(resolve_api(GraphicsApi::Cuda), GraphicsApi::Cuda);
        assert_eq!(resolve_api(GraphicsApi::D3d12), GraphicsApi::D3d12);
    }

    #[test]
    fn automatic_resolves_per_platform() {
        let resolved = resolve_api(GraphicsApi::Automatic);
        assert_ne!(resolved, GraphicsApi::Automatic);
        assert_ne!(resolved, GraphicsApi::Cuda);
        #[cfg(target_os = "windows")]
        assert_eq!(resolved, GraphicsApi::D3d12);
        #[cfg(target_os = "macos")]
        assert_eq!(resolved, GraphicsApi::Metal);
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        assert_eq!(resolved, GraphicsApi::Vulkan);
    }
}
