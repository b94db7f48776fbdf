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

//! Physical adapter identity.

use std::fmt;

use super::enums::GraphicsApi;

/// Locally-unique identifier of a physical adapter.
///
/// Backends that only have 8 identity bytes (Metal's registry ID) fill the
/// first half and zero the rest.
pub type AdapterLuid = [u8; 16];

/// Identity of a physical adapter, copied out of the native API during
/// enumeration.
///
/// This is plain data: holding an `AdapterInfo` (or an adapter built from
/// one) keeps no native enumeration state alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterInfo {
    /// Human-readable adapter name.
    pub name: String,
    /// The API this adapter was enumerated through.
    pub api: GraphicsApi,
    /// PCI vendor id, zero when the API does not expose one.
    pub vendor_id: u32,
    /// PCI device id, zero when the API does not expose one.
    pub device_id: u32,
    /// Locally-unique identifier, used to re-find the same physical device
    /// at device-creation time.
    pub luid: AdapterLuid,
}

impl fmt::Display for AdapterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AdapterInfo {{")?;
        writeln!(f, "  name: \"{}\"", self.name)?;
        writeln!(f, "  api: {}", self.api)?;
        writeln!(f, "  vendor_id: {:#06x}", self.vendor_id)?;
        writeln!(f, "  device_id: {:#06x}", self.device_id)?;
        write!(f, "  luid: [")?;
        for (i, byte) in self.luid.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        writeln!(f, "]")?;
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_contains_identity() {
        let info = AdapterInfo {
            name: "Test GPU".to_string(),
            api: GraphicsApi::Vulkan,
            vendor_id: 0x10de,
            device_id: 0x2684,
            luid: [0; 16],
        };
        let text = info.to_string();
        assert!(text.contains("Test GPU"));
        assert!(text.contains("vulkan"));
        assert!(text.contains("0x10de"));
    }
}
