//! RffeBus -- the bus facade tying the command codec to a [`Transport`].
//!
//! An `RffeBus` binds a transport to one bus/site selector and exposes the
//! operations a test program needs: VIO supply control, single-command and
//! batched execution, and register read/write convenience wrappers.
//!
//! The bus performs no internal locking. The physical bus is single-master
//! and carries one command at a time, so callers that share a bus across
//! threads must serialize access themselves.

use std::time::Duration;

use tracing::debug;

use mipilib_core::error::{Error, Result};
use mipilib_core::transport::Transport;
use mipilib_core::types::BusNumber;

use crate::commands::RffeCommand;

/// Default per-transaction transport timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// An RFFE bus bound to a transport and a bus/site selector.
///
/// # Example
///
/// ```
/// use mipilib_rffe::RffeBus;
/// use mipilib_test_harness::MockTransport;
///
/// let mut bus = RffeBus::new(MockTransport::new().with_echo());
/// bus.enable_vio().unwrap();
/// bus.extended_register_write(0x5, 0xAB, &[0x12]).unwrap();
/// assert_eq!(bus.extended_register_read(0x5, 0xAB, 1).unwrap(), vec![0x12]);
/// ```
#[derive(Debug)]
pub struct RffeBus<T: Transport> {
    transport: T,
    bus: BusNumber,
    timeout: Duration,
}

impl<T: Transport> RffeBus<T> {
    /// Create a facade for the single shared bus.
    pub fn new(transport: T) -> Self {
        RffeBus {
            transport,
            bus: BusNumber::SHARED,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a facade for a specific bus/site.
    ///
    /// Fails with [`Error::OutOfRange`] if `bus` names a site beyond the
    /// transport's [`site_count`](Transport::site_count).
    pub fn with_bus(transport: T, bus: BusNumber) -> Result<Self> {
        let site_count = transport.site_count();
        if !bus.is_shared() && bus.raw() as usize >= site_count {
            return Err(Error::OutOfRange {
                field: "Bus number",
                lower: "0".into(),
                upper: site_count.saturating_sub(1).to_string(),
                found: bus.raw().to_string(),
            });
        }
        Ok(RffeBus {
            transport,
            bus,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the per-transaction transport timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The bus selector this facade is bound to.
    pub fn bus(&self) -> BusNumber {
        self.bus
    }

    /// Drive the bus supply pin (VIO) to its operating voltage.
    pub fn enable_vio(&mut self) -> Result<()> {
        debug!(bus = %self.bus, "enabling VIO supply");
        self.transport.enable_supply(self.bus)
    }

    /// Release the bus supply pin (VIO).
    pub fn disable_vio(&mut self) -> Result<()> {
        debug!(bus = %self.bus, "disabling VIO supply");
        self.transport.disable_supply(self.bus)
    }

    /// Execute one command on this bus.
    pub fn execute(&mut self, command: &mut RffeCommand) -> Result<()> {
        command.execute(&mut self.transport, self.bus, self.timeout)
    }

    /// Execute a sequence of commands strictly in order.
    ///
    /// Stops at the first failure; commands already executed are not
    /// rolled back (writes already bursted remain applied), and the
    /// transport is never invoked for the remaining commands.
    pub fn execute_all(&mut self, commands: &mut [RffeCommand]) -> Result<()> {
        for command in commands {
            self.execute(command)?;
        }
        Ok(())
    }

    /// Write `data` to an extended register.
    pub fn extended_register_write(
        &mut self,
        slave_address: u8,
        register_address: u16,
        data: &[u8],
    ) -> Result<()> {
        let mut command =
            RffeCommand::extended_register_write(slave_address, register_address, data)?;
        self.execute(&mut command)
    }

    /// Read `byte_count` bytes from an extended register.
    pub fn extended_register_read(
        &mut self,
        slave_address: u8,
        register_address: u16,
        byte_count: usize,
    ) -> Result<Vec<u8>> {
        let mut command =
            RffeCommand::extended_register_read(slave_address, register_address, byte_count)?;
        self.execute(&mut command)?;
        Ok(command.into_register_data())
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Consume the facade, returning the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}
