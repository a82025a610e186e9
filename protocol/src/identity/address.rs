//! # Account Addresses
//!
//! An account address is a short byte string rendered as Bech32 with the
//! chain's account prefix:
//!
//! ```text
//! payload (20 or 32 bytes)
//!     -> Bech32("cosmos", payload) -> cosmos1<data><checksum>
//! ```
//!
//! Signature checks happen before a message ever reaches a module, so this
//! type only answers one question: is the string a well-formed address for
//! this chain? Checksum, prefix and payload length are all enforced.
//!
//! Module accounts have no key pair. Their address is derived from the
//! module name as `SHA-256(name)[..20]`, which is stable across replicas and
//! cannot collide with a key-derived address in practice.

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{ACCOUNT_HRP, ADDRESS_LENGTH, LONG_ADDRESS_LENGTH};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while parsing an account address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The input was empty or whitespace only.
    #[error("empty address string is not allowed")]
    Empty,

    /// The Bech32 string could not be decoded (bad checksum, mixed case, ...).
    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    /// The address decoded fine but carries another chain's prefix.
    #[error("invalid Bech32 prefix: expected '{expected}', got '{got}'")]
    InvalidHrp {
        /// The prefix this chain uses.
        expected: String,
        /// The prefix that was found.
        got: String,
    },

    /// The payload is neither a short nor a long address.
    #[error("invalid address length: expected 20 or 32 bytes, got {0}")]
    InvalidLength(usize),
}

// ---------------------------------------------------------------------------
// AccAddress
// ---------------------------------------------------------------------------

/// A validated account address.
///
/// Ordering and equality are defined over the raw payload bytes, so an
/// `AccAddress` can be used as a deterministic map key.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccAddress(Vec<u8>);

impl AccAddress {
    /// Wraps a raw payload, checking its length.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, AddressError> {
        let bytes = bytes.into();
        match bytes.len() {
            ADDRESS_LENGTH | LONG_ADDRESS_LENGTH => Ok(Self(bytes)),
            other => Err(AddressError::InvalidLength(other)),
        }
    }

    /// Derives the address of a module-owned account from the module name.
    pub fn for_module(name: &str) -> Self {
        let digest = Sha256::digest(name.as_bytes());
        Self(digest[..ADDRESS_LENGTH].to_vec())
    }

    /// Parses a Bech32 address, validating checksum, prefix and length.
    pub fn from_bech32(addr: &str) -> Result<Self, AddressError> {
        if addr.trim().is_empty() {
            return Err(AddressError::Empty);
        }

        let (hrp, data) =
            bech32::decode(addr).map_err(|e| AddressError::Bech32Decode(e.to_string()))?;

        if hrp != account_hrp() {
            return Err(AddressError::InvalidHrp {
                expected: ACCOUNT_HRP.to_string(),
                got: hrp.to_string(),
            });
        }

        Self::from_bytes(data)
    }

    /// Renders the address as a Bech32 string with the account prefix.
    pub fn to_bech32(&self) -> String {
        bech32::encode::<Bech32>(account_hrp(), &self.0)
            .expect("payloads of at most 32 bytes always fit a Bech32 string")
    }

    /// The raw payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

fn account_hrp() -> Hrp {
    Hrp::parse(ACCOUNT_HRP).expect("static HRP is valid")
}

impl FromStr for AccAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bech32())
    }
}

impl fmt::Debug for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccAddress({})", self.to_bech32())
    }
}

impl Serialize for AccAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_bech32())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for AccAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            AccAddress::from_bech32(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            AccAddress::from_bytes(bytes).map_err(serde::de::Error::custom)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
