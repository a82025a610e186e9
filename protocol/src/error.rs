//! Registered error codes.
//!
//! Errors that leave a module are reported to other processes as a
//! `(codespace, code)` pair plus a human-readable log. Codes are small,
//! stable integers scoped to their codespace: once a code ships it is never
//! renumbered or reused for a different failure.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Codespace for host-level failures that do not belong to any module.
pub const ROOT_CODESPACE: &str = "sdk";

/// Root code for an unexpected internal failure (store I/O, corrupt data).
pub const CODE_INTERNAL: u32 = 1;

/// An error that carries a registered `(codespace, code)` identifier.
pub trait RegisteredError: std::error::Error {
    /// The codespace the code is registered under (usually the module name).
    fn codespace(&self) -> &'static str;

    /// The registered code. Zero is reserved for success and never returned.
    fn code(&self) -> u32;

    /// Flattens the error into its wire representation.
    fn to_info(&self) -> ErrorInfo {
        ErrorInfo {
            codespace: self.codespace().to_string(),
            code: self.code(),
            log: self.to_string(),
        }
    }
}

/// Wire representation of a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub codespace: String,
    pub code: u32,
    pub log: String,
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "codespace={} code={}: {}", self.codespace, self.code, self.log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    impl RegisteredError for Boom {
        fn codespace(&self) -> &'static str {
            "test"
        }

        fn code(&self) -> u32 {
            42
        }
    }

    #[test]
    fn to_info_carries_code_and_log() {
        let info = Boom.to_info();
        assert_eq!(info.codespace, "test");
        assert_eq!(info.code, 42);
        assert_eq!(info.log, "boom");
        assert_eq!(info.to_string(), "codespace=test code=42: boom");
    }

    #[test]
    fn error_info_json_shape() {
        let json = serde_json::to_value(Boom.to_info()).unwrap();
        assert_eq!(json["codespace"], "test");
        assert_eq!(json["code"], 42);
    }
}
