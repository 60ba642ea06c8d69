//! Transport trait for bus communication.
//!
//! The [`Transport`] trait abstracts over the physical link to the bus: a
//! digital pattern instrument on real hardware, or a mock transport for
//! testing. Protocol engines (e.g. the RFFE codec in `mipilib-rffe`)
//! operate on a `Transport` rather than directly on an instrument session,
//! enabling both real hardware control and deterministic unit testing with
//! `MockTransport` from the `mipilib-test-harness` crate.
//!
//! The codec hands a fully assembled bit frame to [`burst`](Transport::burst)
//! as one atomic transmission; there is no mid-frame cancellation. For read
//! commands it then fetches the captured register bytes with
//! [`capture_bytes`](Transport::capture_bytes). Pattern files, pin maps,
//! timing sets, and voltage levels are entirely the implementor's concern.

use std::time::Duration;

use crate::error::Result;
use crate::types::BusNumber;

/// Synchronous bit-level transport to a serial control bus.
///
/// All methods block the calling thread; `burst` and `capture_bytes` block
/// up to `timeout` and return [`Error::Timeout`](crate::error::Error::Timeout)
/// if the hardware does not complete in time, or
/// [`Error::Transport`](crate::error::Error::Transport) on a hardware fault.
/// The codec never interprets *why* a call failed; it only propagates.
///
/// One bus instance carries at most one command at a time. Callers that
/// interleave commands from multiple threads onto the same bus must
/// serialize access externally; implementations are not required to lock.
pub trait Transport: Send {
    /// Transmit one assembled bit frame on the bus.
    ///
    /// `operation` is the symbolic command name (e.g. `"RegWriteExt"`),
    /// used to correlate a pre-registered waveform or pattern on the
    /// instrument side. `frame` holds one bit per byte, each `0` or `1`,
    /// in wire order.
    fn burst(
        &mut self,
        bus: BusNumber,
        operation: &str,
        frame: &[u8],
        timeout: Duration,
    ) -> Result<()>;

    /// Fetch `byte_count` captured register bytes for a read operation.
    ///
    /// Each returned byte is the data portion of one captured 9-bit unit
    /// (8 data bits plus a parity bit) on the wire. Implementations must
    /// return exactly `byte_count` bytes on success.
    fn capture_bytes(
        &mut self,
        bus: BusNumber,
        operation: &str,
        byte_count: usize,
        timeout: Duration,
    ) -> Result<Vec<u8>>;

    /// Drive the bus supply pin (VIO) to its operating voltage.
    fn enable_supply(&mut self, bus: BusNumber) -> Result<()>;

    /// Release the bus supply pin (VIO).
    fn disable_supply(&mut self, bus: BusNumber) -> Result<()>;

    /// How many sites/bus instances exist on this transport.
    ///
    /// Per-site bus selectors are validated against this count.
    fn site_count(&self) -> usize;
}
