//! # mipilib -- MIPI serial control bus protocols for test systems
//!
//! `mipilib` is a Rust library for framing commands on MIPI-defined serial
//! control buses, built for semiconductor test programs that drive RF
//! front-end devices through a digital pattern instrument. The library owns
//! everything that must be bit-exact -- field widths, parity bits, byte-count
//! encoding -- and delegates everything electrical to an injected
//! [`Transport`].
//!
//! ## Quick Start
//!
//! Add `mipilib` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! mipilib = { version = "0.1", features = ["rffe"] }
//! ```
//!
//! Write and read back a device register (shown here against the mock
//! transport from `mipilib-test-harness`; production code passes the
//! instrument-backed transport instead):
//!
//! ```
//! use mipilib::rffe::RffeBus;
//! use mipilib_test_harness::MockTransport;
//!
//! fn main() -> mipilib::Result<()> {
//!     let mut bus = RffeBus::new(MockTransport::new().with_echo());
//!     bus.enable_vio()?;
//!
//!     bus.extended_register_write(0x5, 0xAB, &[0x12])?;
//!     let data = bus.extended_register_read(0x5, 0xAB, 1)?;
//!     assert_eq!(data, vec![0x12]);
//!
//!     bus.disable_vio()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate                  | Purpose                                          |
//! |------------------------|--------------------------------------------------|
//! | `mipilib-core`         | [`Transport`] trait, [`BusNumber`], errors, bit/parity primitives |
//! | `mipilib-rffe`         | RFFE extended register command codec + bus facade |
//! | `mipilib-test-harness` | `MockTransport` for deterministic testing         |
//! | **`mipilib`**          | This facade crate -- re-exports everything        |
//!
//! Protocol engines operate on the [`Transport`] trait rather than on an
//! instrument session, so the same command codec runs against real hardware
//! and against the mock in unit tests.
//!
//! ## Feature Flags
//!
//! Each bus protocol is gated behind a feature flag:
//!
//! | Feature | Enables                            | Default |
//! |---------|------------------------------------|---------|
//! | `rffe`  | [`rffe`] module (RFFE commands)    | yes     |
//!
//! ## Scope
//!
//! `mipilib` frames commands; it does not model the electrical layer, bus
//! arbitration, or instrument session management. Pattern files, pin maps,
//! timing sets, and voltage levels belong to the [`Transport`] implementor.

pub use mipilib_core::*;

/// MIPI RFFE (RF Front-End) protocol backend.
///
/// Provides [`RffeCommand`](rffe::RffeCommand) for bit-exact command
/// framing and [`RffeBus`](rffe::RffeBus) for executing commands over a
/// [`Transport`].
#[cfg(feature = "rffe")]
pub mod rffe {
    pub use mipilib_rffe::*;
}
