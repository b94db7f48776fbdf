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

//! Error type shared by every device, adapter and resource operation.

use std::error::Error;
use std::fmt;

/// Errors produced by adapters, devices and resources.
///
/// Invalid input is always reported through this type; `Option`/empty
/// returns are reserved for genuinely absent things (no adapters on the
/// system, mapping a non-host-visible buffer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RhiError {
    /// A descriptor is internally inconsistent or out of range.
    InvalidDescriptor(String),
    /// A resource argument does not belong to this device or is of the
    /// wrong concrete type.
    InvalidResource(String),
    /// The validation layer rejected an operation.
    Validation(String),
    /// The backend or adapter cannot do this at all.
    Unsupported(String),
    /// The operation has no implementation on this backend.
    Unimplemented(&'static str),
    /// No physical device matches the requested adapter identity.
    AdapterNotFound,
    /// A native API call failed.
    Backend {
        /// The native call that failed.
        call: &'static str,
        /// The native error code.
        code: i64,
    },
}

impl fmt::Display for RhiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RhiError::InvalidDescriptor(msg) => write!(f, "Invalid descriptor: {msg}"),
            RhiError::InvalidResource(msg) => write!(f, "Invalid resource: {msg}"),
            RhiError::Validation(msg) => write!(f, "Validation error: {msg}"),
            RhiError::Unsupported(msg) => write!(f, "Unsupported: {msg}"),
            RhiError::Unimplemented(what) => write!(f, "Not implemented: {what}"),
            RhiError::AdapterNotFound => {
                write!(f, "No physical device matches the requested adapter")
            }
            RhiError::Backend { call, code } => {
                write!(f, "`{call}` failed with error {code}")
            }
        }
    }
}

impl Error for RhiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = RhiError::InvalidDescriptor("buffer size must be non-zero".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid descriptor: buffer size must be non-zero"
        );

        let err = RhiError::Backend {
            call: "vkCreateBuffer",
            code: -2,
        };
        assert_eq!(err.to_string(), "`vkCreateBuffer` failed with error -2");

        let err = RhiError::Unimplemented("texture device address");
        assert_eq!(err.to_string(), "Not implemented: texture device address");
    }

    #[test]
    fn implements_error_trait() {
        fn assert_error<E: Error>(_: &E) {}
        assert_error(&RhiError::AdapterNotFound);
    }
}
