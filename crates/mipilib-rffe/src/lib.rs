//! MIPI RFFE protocol backend for mipilib.
//!
//! This crate implements the command-framing layer of the MIPI RFFE
//! (RF Front-End) serial control bus: it translates a logical register
//! access -- read or write, addressed by slave address and register
//! address -- into the exact bit sequence that must be placed on the wire,
//! and stores captured response bytes back onto read commands. It provides:
//!
//! - **Command model** ([`commands`]) -- the extended register command
//!   family with per-variant field widths, construction-time validation,
//!   and bit-exact frame assembly (command, address, and data sub-frames,
//!   each protected by an odd-parity bit).
//! - **RffeBus** ([`bus`]) -- the facade that binds a
//!   [`Transport`](mipilib_core::Transport) to a bus/site selector and
//!   exposes single-command and batched execution plus VIO supply control.
//!
//! # Example
//!
//! ```
//! use mipilib_rffe::commands::RffeCommand;
//!
//! // One-byte extended register write: 27 bits on the wire.
//! let cmd = RffeCommand::extended_register_write(0x5, 0xAB, &[0x12]).unwrap();
//! assert_eq!(cmd.build_frame().len(), 27);
//!
//! // Out-of-range fields are rejected before any bits are emitted.
//! assert!(RffeCommand::extended_register_write(0x10, 0x00, &[0x01]).is_err());
//! ```

pub mod bus;
pub mod commands;

pub use bus::RffeBus;
pub use commands::{CommandKind, RffeCommand};
