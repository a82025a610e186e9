//! # Identity Module
//!
//! Account identities as seen by state-machine modules. Signatures are
//! verified upstream; by the time a message reaches a module its signer is
//! already authenticated, and all a module needs is a well-formed,
//! comparable address.

pub mod address;

pub use address::{AccAddress, AddressError};
