//! RFFE command model and frame assembly.
//!
//! An RFFE transaction is one fully assembled bit frame bursted on the
//! single-master serial bus. Frames are assembled from three sub-frames in
//! fixed wire order, each 8-bit unit followed by one odd-parity bit:
//!
//! ```text
//! command sub-frame        address sub-frame       data sub-frame (write only)
//! <sa3..sa0><bc3..bc0><P>  <a7..a0><P> [per byte]  <d7..d0><P> [per byte]
//! ```
//!
//! - `sa`: 4-bit slave address
//! - `bc`: byte-count field, stored as `byte_count - 1`
//! - `a`: register address byte(s), most significant byte first
//! - `d`: payload byte(s) in write order
//! - `P`: odd-parity bit over the preceding unit
//!
//! The command sub-frame is the one asymmetry: its parity bit covers the
//! concatenation of slave-address bits, command-code bits, and byte-count
//! bits, not a single 8-bit unit. The command nibble itself is driven by
//! the pre-registered pattern on the instrument side, so it never appears
//! in the sourced waveform -- only its parity contribution does.
//!
//! Frames are handed to a [`Transport`] as one bit per byte, the source
//! waveform format of serial digital-pattern engines. For read commands
//! nothing is transmitted after the address sub-frame; the data bytes are
//! captured off the bus and stored back onto the command.

use std::time::Duration;

use bytes::{BufMut, BytesMut};
use tracing::debug;

use mipilib_core::bits::to_bits;
use mipilib_core::error::{Error, Result};
use mipilib_core::parity::odd_parity_bit;
use mipilib_core::transport::Transport;
use mipilib_core::types::BusNumber;

/// Slave address field width in bits, common to every RFFE command type.
pub const SLAVE_ADDRESS_FIELD_WIDTH: usize = 4;

/// Highest valid slave address on an RFFE bus.
pub const SLAVE_ADDRESS_LIMIT: u8 = 0xF;

/// The closed set of supported RFFE command types.
///
/// Per-variant wire constants (symbolic name, command code, field widths)
/// live here as data, so adding a command type means adding a variant and
/// letting the compiler point at every `match` that needs a new arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Extended register write: 1-16 payload bytes to an 8-bit register
    /// address space.
    ExtendedRegisterWrite,
    /// Extended register read: capture 1-16 bytes from an 8-bit register
    /// address space.
    ExtendedRegisterRead,
}

impl CommandKind {
    /// Symbolic operation name, used by the transport to correlate a
    /// pre-registered waveform/pattern.
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::ExtendedRegisterWrite => "RegWriteExt",
            CommandKind::ExtendedRegisterRead => "RegReadExt",
        }
    }

    /// Numeric command code transmitted in the command field.
    pub fn command_code(&self) -> u8 {
        match self {
            CommandKind::ExtendedRegisterWrite => 0b0000,
            CommandKind::ExtendedRegisterRead => 0b0010,
        }
    }

    /// Width of the command field in bits.
    pub fn command_field_width(&self) -> usize {
        match self {
            CommandKind::ExtendedRegisterWrite | CommandKind::ExtendedRegisterRead => 4,
        }
    }

    /// Width of the register address field in bits.
    pub fn register_address_field_width(&self) -> usize {
        match self {
            CommandKind::ExtendedRegisterWrite | CommandKind::ExtendedRegisterRead => 8,
        }
    }

    /// Highest register address encodable in the address field.
    pub fn register_address_limit(&self) -> u16 {
        (1 << self.register_address_field_width()) - 1
    }

    /// Width of the byte-count field in bits.
    pub fn byte_count_field_width(&self) -> usize {
        8 - self.command_field_width()
    }

    /// Highest logical byte count encodable in the byte-count field.
    ///
    /// The field stores `byte_count - 1`, so a `w`-bit field encodes
    /// `[1, 2^w]`, not `[0, 2^w - 1]`.
    pub fn byte_count_limit(&self) -> usize {
        1 << self.byte_count_field_width()
    }

    /// The command code expanded to its field width, MSB first.
    pub fn command_bits(&self) -> Vec<u8> {
        to_bits(u16::from(self.command_code()), self.command_field_width())
    }

    /// Returns `true` if this command captures data off the bus.
    pub fn is_read(&self) -> bool {
        matches!(self, CommandKind::ExtendedRegisterRead)
    }
}

/// One RFFE register-access transaction.
///
/// A command is constructed once, validated synchronously at construction
/// (no bits are ever emitted for an out-of-range field), executed at most
/// once, and discarded after its result is read. The payload is an owned
/// copy of the caller's data; mutating the caller's buffer after
/// construction cannot corrupt an in-flight command.
#[derive(Debug, Clone)]
pub struct RffeCommand {
    kind: CommandKind,
    slave_address: u8,
    register_address: u16,
    /// Logical byte count: payload length for writes, requested capture
    /// length for reads.
    byte_count: usize,
    /// Write payload, or captured read data after execution.
    register_data: Vec<u8>,
    alias: Option<String>,
}

impl RffeCommand {
    /// Create an extended register write of `data` to `register_address`.
    ///
    /// Fails with [`Error::OutOfRange`] if the slave address exceeds 4
    /// bits, the register address exceeds 8 bits, or `data` is empty or
    /// longer than 16 bytes.
    pub fn extended_register_write(
        slave_address: u8,
        register_address: u16,
        data: &[u8],
    ) -> Result<Self> {
        let command = RffeCommand {
            kind: CommandKind::ExtendedRegisterWrite,
            slave_address,
            register_address,
            byte_count: data.len(),
            register_data: data.to_vec(),
            alias: None,
        };
        command.validate()?;
        Ok(command)
    }

    /// Create an extended register read of `byte_count` bytes from
    /// `register_address`.
    ///
    /// The payload starts empty (nothing is transmitted in the data
    /// sub-frame) and is replaced wholesale with captured bytes after a
    /// successful [`execute`](RffeCommand::execute). Fails with
    /// [`Error::OutOfRange`] under the same field bounds as a write.
    pub fn extended_register_read(
        slave_address: u8,
        register_address: u16,
        byte_count: usize,
    ) -> Result<Self> {
        let command = RffeCommand {
            kind: CommandKind::ExtendedRegisterRead,
            slave_address,
            register_address,
            byte_count,
            register_data: Vec::new(),
            alias: None,
        };
        command.validate()?;
        Ok(command)
    }

    /// Attach a human-readable alias for logs and result tables.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The command type.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// The 4-bit slave address this command targets.
    pub fn slave_address(&self) -> u8 {
        self.slave_address
    }

    /// The register address this command targets.
    pub fn register_address(&self) -> u16 {
        self.register_address
    }

    /// Logical byte count of the transaction.
    pub fn byte_count(&self) -> usize {
        self.byte_count
    }

    /// Register data: the write payload, or the captured bytes of an
    /// executed read (empty before execution).
    pub fn register_data(&self) -> &[u8] {
        &self.register_data
    }

    /// Consume the command, returning its register data.
    pub fn into_register_data(self) -> Vec<u8> {
        self.register_data
    }

    /// The alias, if one was attached.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    fn validate(&self) -> Result<()> {
        if self.slave_address > SLAVE_ADDRESS_LIMIT {
            return Err(Error::OutOfRange {
                field: "Slave address",
                lower: "0x0".into(),
                upper: format!("0x{:X}", SLAVE_ADDRESS_LIMIT),
                found: format!("0x{:02X}", self.slave_address),
            });
        }
        let address_limit = self.kind.register_address_limit();
        if self.register_address > address_limit {
            return Err(Error::OutOfRange {
                field: "Register address",
                lower: "0x00".into(),
                upper: format!("0x{:02X}", address_limit),
                found: format!("0x{:02X}", self.register_address),
            });
        }
        let count_limit = self.kind.byte_count_limit();
        if self.byte_count < 1 || self.byte_count > count_limit {
            return Err(Error::OutOfRange {
                field: "Byte count",
                lower: "1".into(),
                upper: count_limit.to_string(),
                found: self.byte_count.to_string(),
            });
        }
        Ok(())
    }

    /// Assemble the command sub-frame: slave address, byte-count field,
    /// and one parity bit.
    ///
    /// The parity bit covers slave-address, command-code, and byte-count
    /// bits as one concatenation; the command nibble itself is not part of
    /// the sourced waveform (it is driven by the pre-registered pattern).
    pub fn build_command_frame(&self) -> Vec<u8> {
        let slave_bits = to_bits(u16::from(self.slave_address), SLAVE_ADDRESS_FIELD_WIDTH);
        let count_bits = to_bits(
            (self.byte_count - 1) as u16,
            self.kind.byte_count_field_width(),
        );

        let mut parity_input = slave_bits.clone();
        parity_input.extend_from_slice(&self.kind.command_bits());
        parity_input.extend_from_slice(&count_bits);

        let mut frame = BytesMut::with_capacity(slave_bits.len() + count_bits.len() + 1);
        frame.put_slice(&slave_bits);
        frame.put_slice(&count_bits);
        frame.put_u8(odd_parity_bit(&parity_input));
        frame.to_vec()
    }

    /// Assemble the address sub-frame: each register address byte, most
    /// significant byte first, followed by its parity bit.
    pub fn build_address_frame(&self) -> Vec<u8> {
        let num_bytes = self.kind.register_address_field_width() / 8;
        let mut frame = BytesMut::with_capacity(num_bytes * 9);
        for i in 0..num_bytes {
            let shift = (num_bytes - 1 - i) * 8;
            let byte = (self.register_address >> shift) as u8;
            let bits = to_bits(u16::from(byte), 8);
            frame.put_slice(&bits);
            frame.put_u8(odd_parity_bit(&bits));
        }
        frame.to_vec()
    }

    /// Assemble the data sub-frame: each payload byte in write order,
    /// followed by its parity bit. Empty for read commands, whose data is
    /// captured rather than transmitted.
    pub fn build_data_frame(&self) -> Vec<u8> {
        match self.kind {
            CommandKind::ExtendedRegisterWrite => {
                let mut frame = BytesMut::with_capacity(self.register_data.len() * 9);
                for &byte in &self.register_data {
                    let bits = to_bits(u16::from(byte), 8);
                    frame.put_slice(&bits);
                    frame.put_u8(odd_parity_bit(&bits));
                }
                frame.to_vec()
            }
            CommandKind::ExtendedRegisterRead => Vec::new(),
        }
    }

    /// Assemble the full on-wire bit frame.
    ///
    /// Wire order is command sub-frame, then address sub-frame, then data
    /// sub-frame, and must not be altered.
    pub fn build_frame(&self) -> Vec<u8> {
        let command = self.build_command_frame();
        let address = self.build_address_frame();
        let data = self.build_data_frame();

        let mut frame = BytesMut::with_capacity(command.len() + address.len() + data.len());
        frame.put_slice(&command);
        frame.put_slice(&address);
        frame.put_slice(&data);
        frame.to_vec()
    }

    /// Execute this command on `transport` over the selected bus.
    ///
    /// Bursts the assembled frame as one atomic transmission; for read
    /// commands, then fetches the captured bytes and stores them as the
    /// command's register data, replacing any prior value. Parity bits of
    /// captured data are stripped by the capture engine and are not
    /// re-validated here.
    pub fn execute<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        bus: BusNumber,
        timeout: Duration,
    ) -> Result<()> {
        let frame = self.build_frame();
        debug!(
            operation = self.kind.name(),
            bus = %bus,
            bits = frame.len(),
            alias = self.alias.as_deref().unwrap_or(""),
            "bursting command frame"
        );
        transport.burst(bus, self.kind.name(), &frame, timeout)?;

        if self.kind.is_read() {
            let captured =
                transport.capture_bytes(bus, self.kind.name(), self.byte_count, timeout)?;
            if captured.len() != self.byte_count {
                return Err(Error::Transport(format!(
                    "capture returned {} bytes, expected {}",
                    captured.len(),
                    self.byte_count
                )));
            }
            self.register_data = captured;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---------------------------------------------------------------
    // Construction-time validation
    // ---------------------------------------------------------------

    #[test]
    fn write_rejects_slave_address_above_four_bits() {
        let err = RffeCommand::extended_register_write(0x10, 0x00, &[0x01]).unwrap_err();
        match err {
            Error::OutOfRange { field, found, .. } => {
                assert_eq!(field, "Slave address");
                assert_eq!(found, "0x10");
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn write_rejects_register_address_above_eight_bits() {
        let err = RffeCommand::extended_register_write(0x5, 0x100, &[0x01]).unwrap_err();
        match err {
            Error::OutOfRange { field, upper, .. } => {
                assert_eq!(field, "Register address");
                assert_eq!(upper, "0xFF");
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn write_rejects_empty_payload() {
        let err = RffeCommand::extended_register_write(0x5, 0x00, &[]).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { field: "Byte count", .. }));
    }

    #[test]
    fn write_rejects_oversized_payload() {
        let err = RffeCommand::extended_register_write(0x5, 0x00, &[0u8; 17]).unwrap_err();
        match err {
            Error::OutOfRange {
                field,
                lower,
                upper,
                found,
            } => {
                assert_eq!(field, "Byte count");
                assert_eq!(lower, "1");
                assert_eq!(upper, "16");
                assert_eq!(found, "17");
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn read_rejects_byte_count_above_limit() {
        let err = RffeCommand::extended_register_read(0x3, 0x20, 17).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { field: "Byte count", .. }));
    }

    #[test]
    fn read_rejects_zero_byte_count() {
        let err = RffeCommand::extended_register_read(0x3, 0x20, 0).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { field: "Byte count", .. }));
    }

    #[test]
    fn boundary_values_accepted() {
        // Every bound at its extreme: slave 0xF, register 0xFF, 16 bytes.
        assert!(RffeCommand::extended_register_write(0xF, 0xFF, &[0u8; 16]).is_ok());
        assert!(RffeCommand::extended_register_read(0xF, 0xFF, 16).is_ok());
        assert!(RffeCommand::extended_register_write(0x0, 0x00, &[0x00]).is_ok());
    }

    #[test]
    fn out_of_range_message_is_operator_readable() {
        let err = RffeCommand::extended_register_write(0x10, 0x00, &[0x01]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Slave address out of range. Expected [0x0, 0xF] but found 0x10."
        );
    }

    // ---------------------------------------------------------------
    // Payload ownership
    // ---------------------------------------------------------------

    #[test]
    fn write_payload_is_an_owned_copy() {
        let mut data = vec![0x12, 0x34];
        let command = RffeCommand::extended_register_write(0x5, 0xAB, &data).unwrap();
        data[0] = 0xFF;
        assert_eq!(command.register_data(), &[0x12, 0x34]);
    }

    #[test]
    fn read_payload_starts_empty() {
        let command = RffeCommand::extended_register_read(0x5, 0xAB, 4).unwrap();
        assert!(command.register_data().is_empty());
        assert_eq!(command.byte_count(), 4);
    }

    // ---------------------------------------------------------------
    // Variant constants
    // ---------------------------------------------------------------

    #[test]
    fn variant_wire_constants() {
        let write = CommandKind::ExtendedRegisterWrite;
        let read = CommandKind::ExtendedRegisterRead;
        assert_eq!(write.name(), "RegWriteExt");
        assert_eq!(read.name(), "RegReadExt");
        assert_eq!(write.command_code(), 0b0000);
        assert_eq!(read.command_code(), 0b0010);
        for kind in [write, read] {
            assert_eq!(kind.command_field_width(), 4);
            assert_eq!(kind.register_address_field_width(), 8);
            assert_eq!(kind.register_address_limit(), 0xFF);
            assert_eq!(kind.byte_count_field_width(), 4);
            assert_eq!(kind.byte_count_limit(), 16);
        }
        assert_eq!(read.command_bits(), vec![0, 0, 1, 0]);
    }

    // ---------------------------------------------------------------
    // Frame assembly
    // ---------------------------------------------------------------

    #[test]
    fn write_sub_frame_widths() {
        let command = RffeCommand::extended_register_write(0x5, 0xAB, &[0x12]).unwrap();
        assert_eq!(command.build_command_frame().len(), 9);
        assert_eq!(command.build_address_frame().len(), 9);
        assert_eq!(command.build_data_frame().len(), 9);
        assert_eq!(command.build_frame().len(), 27);
    }

    #[test]
    fn write_golden_frame() {
        let command = RffeCommand::extended_register_write(0x5, 0xAB, &[0x12]).unwrap();
        let frame = command.build_frame();
        assert_eq!(
            frame,
            vec![
                // Command: slave 0101, count field 0000, parity over
                // 0101 0000 0000 (two set bits, even) = 1.
                0, 1, 0, 1, 0, 0, 0, 0, 1,
                // Address: 0xAB = 10101011, five set bits, parity 0.
                1, 0, 1, 0, 1, 0, 1, 1, 0,
                // Data: 0x12 = 00010010, two set bits, parity 1.
                0, 0, 0, 1, 0, 0, 1, 0, 1,
            ]
        );
    }

    #[test]
    fn read_frame_has_no_data_sub_frame() {
        let command = RffeCommand::extended_register_read(0x5, 0xAB, 4).unwrap();
        assert!(command.build_data_frame().is_empty());
        assert_eq!(command.build_frame().len(), 18);
    }

    #[test]
    fn command_frame_parity_covers_command_code() {
        // Same slave and byte count; the command nibble (0b0000 vs 0b0010)
        // only reaches the wire through the parity bit.
        let write = RffeCommand::extended_register_write(0x0, 0x00, &[0x00]).unwrap();
        let read = RffeCommand::extended_register_read(0x0, 0x00, 1).unwrap();
        let write_frame = write.build_command_frame();
        let read_frame = read.build_command_frame();
        assert_eq!(write_frame[..8], read_frame[..8]);
        assert_eq!(write_frame[8], 1); // zero set bits, even
        assert_eq!(read_frame[8], 0); // one set bit, odd
    }

    #[test]
    fn byte_count_field_stores_count_minus_one() {
        let command = RffeCommand::extended_register_write(0x0, 0x00, &[0u8; 16]).unwrap();
        // 16 bytes encode as 0b1111 in the 4-bit count field.
        assert_eq!(command.build_command_frame()[4..8], [1, 1, 1, 1]);

        let one = RffeCommand::extended_register_write(0x0, 0x00, &[0x00]).unwrap();
        assert_eq!(one.build_command_frame()[4..8], [0, 0, 0, 0]);
    }

    #[test]
    fn multi_byte_write_data_frame_order() {
        let command =
            RffeCommand::extended_register_write(0x5, 0x00, &[0xFF, 0x00]).unwrap();
        let data = command.build_data_frame();
        assert_eq!(data.len(), 18);
        // 0xFF first (eight set bits, parity 1), then 0x00 (parity 1).
        assert_eq!(&data[..9], &[1, 1, 1, 1, 1, 1, 1, 1, 1]);
        assert_eq!(&data[9..], &[0, 0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn every_frame_bit_is_zero_or_one() {
        let command =
            RffeCommand::extended_register_write(0xA, 0x5C, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        assert!(command.build_frame().iter().all(|&b| b <= 1));
    }

    // ---------------------------------------------------------------
    // Alias
    // ---------------------------------------------------------------

    #[test]
    fn alias_is_attached() {
        let command = RffeCommand::extended_register_write(0x5, 0xAB, &[0x12])
            .unwrap()
            .with_alias("PA bias");
        assert_eq!(command.alias(), Some("PA bias"));
    }
}
