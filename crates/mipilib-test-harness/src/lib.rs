//! mipilib-test-harness: Test utilities and mock transports for mipilib.
//!
//! This crate provides [`MockTransport`] for deterministic unit testing of
//! protocol engines without a digital pattern instrument: it records every
//! bursted frame, replays canned capture responses, and can emulate a slave
//! device's register memory for write/read round-trip tests.

pub mod mock_transport;

pub use mock_transport::{Burst, MockTransport};
