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

//! D3D12 backend stub.
//!
//! Enumerates no adapters so D3D12 dispatch stays total while the backend
//! is unimplemented.

use std::sync::Arc;

use vanta_core::rhi::traits::GraphicsAdapter;
use vanta_core::RhiError;

/// Always returns an empty adapter list.
pub fn enum_adapters() -> Result<Vec<Arc<dyn GraphicsAdapter>>, RhiError> {
    log::debug!("d3d12 backend is not implemented; enumerating no adapters");
    Ok(Vec::new())
}
