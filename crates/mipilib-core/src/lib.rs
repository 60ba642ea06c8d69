//! mipilib-core: Core traits, types, and error definitions for mipilib.
//!
//! This crate defines the protocol-agnostic abstractions that all mipilib
//! protocol engines build on. Test equipment glue and applications depend on
//! these types without pulling in any specific bus protocol.
//!
//! # Key items
//!
//! - [`Transport`] -- the injected hardware boundary (burst + capture)
//! - [`BusNumber`] -- shared-bus / per-site bus selector
//! - [`Error`] / [`Result`] -- error handling
//! - [`bits`] / [`parity`] -- bit-field and odd-parity primitives

pub mod bits;
pub mod error;
pub mod parity;
pub mod transport;
pub mod types;

// Re-export key types at crate root for ergonomic `use mipilib_core::*`.
pub use bits::{sum_bits, to_bits};
pub use error::{Error, Result};
pub use parity::{odd_parity_bit, odd_parity_byte, odd_parity_of_bytes};
pub use transport::Transport;
pub use types::BusNumber;
