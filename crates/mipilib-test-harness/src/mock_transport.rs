//! Mock transport for deterministic testing of protocol engines.
//!
//! [`MockTransport`] implements the [`Transport`] trait entirely in memory.
//! Every burst is recorded for later inspection; capture responses come
//! from a queue of canned byte vectors, or -- in echo mode -- from an
//! emulated slave register memory that is populated by decoding bursted
//! write frames and read back by subsequent read commands.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use mipilib_core::{BusNumber, Transport};
//! use mipilib_test_harness::MockTransport;
//!
//! let mut mock = MockTransport::new();
//! mock.push_capture(vec![0x42]);
//! let data = mock
//!     .capture_bytes(BusNumber::SHARED, "RegReadExt", 1, Duration::from_secs(1))
//!     .unwrap();
//! assert_eq!(data, vec![0x42]);
//! ```

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use mipilib_core::error::{Error, Result};
use mipilib_core::transport::Transport;
use mipilib_core::types::BusNumber;

/// One recorded burst: the arguments of a successful `burst()` call.
#[derive(Debug, Clone)]
pub struct Burst {
    /// The bus selector the frame was bursted on.
    pub bus: BusNumber,
    /// The symbolic operation name (e.g. `"RegWriteExt"`).
    pub operation: String,
    /// The bit frame, one bit per byte, in wire order.
    pub frame: Vec<u8>,
}

/// A mock [`Transport`] for testing protocol engines without hardware.
///
/// By default every burst succeeds and is recorded, and `capture_bytes`
/// drains the canned-response queue loaded with
/// [`push_capture`](MockTransport::push_capture). With
/// [`with_echo`](MockTransport::with_echo) the mock instead behaves like a
/// well-behaved slave device: bursted write frames populate a register
/// memory keyed by (slave address, register address), and read commands
/// return what was last written there.
#[derive(Debug, Default)]
pub struct MockTransport {
    bursts: Vec<Burst>,
    burst_attempts: usize,
    fail_burst_at: Option<usize>,
    captures: VecDeque<Vec<u8>>,
    echo: bool,
    memory: HashMap<(u8, u16), Vec<u8>>,
    pending_read: Option<(u8, u16)>,
    supply: HashMap<i32, bool>,
    site_count: usize,
}

impl MockTransport {
    /// Create a mock transport with a single site and no canned captures.
    pub fn new() -> Self {
        MockTransport {
            site_count: 1,
            ..MockTransport::default()
        }
    }

    /// Enable echo mode: writes populate an emulated register memory and
    /// reads return the bytes last written to the same (slave, register).
    pub fn with_echo(mut self) -> Self {
        self.echo = true;
        self
    }

    /// Set the number of sites this transport reports.
    pub fn with_site_count(mut self, site_count: usize) -> Self {
        self.site_count = site_count;
        self
    }

    /// Queue a canned capture response, consumed in FIFO order.
    ///
    /// Canned responses take precedence over echo mode, and are returned
    /// as-is -- queue a deliberately short vector to exercise a protocol
    /// engine's byte-count verification.
    pub fn push_capture(&mut self, bytes: Vec<u8>) {
        self.captures.push_back(bytes);
    }

    /// Make the `index`-th burst attempt (zero-based) fail with
    /// [`Error::Timeout`].
    pub fn fail_burst_at(&mut self, index: usize) {
        self.fail_burst_at = Some(index);
    }

    /// All successfully bursted frames, in order.
    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    /// Total number of burst attempts, including failed ones.
    pub fn attempted_bursts(&self) -> usize {
        self.burst_attempts
    }

    /// Whether the supply pin is currently enabled on `bus`.
    pub fn supply_enabled(&self, bus: BusNumber) -> bool {
        self.supply.get(&bus.raw()).copied().unwrap_or(false)
    }

    /// The emulated register memory at (slave, register), if written.
    pub fn register_memory(&self, slave_address: u8, register_address: u16) -> Option<&[u8]> {
        self.memory
            .get(&(slave_address, register_address))
            .map(Vec::as_slice)
    }

    fn decode_frame_target(frame: &[u8]) -> (u8, u16, usize) {
        // Command sub-frame: slave(4) ++ byte_count-1(4) ++ parity, then
        // the address byte and its parity. Parity bits are skipped, as a
        // capture engine would.
        let slave = bits_to_value(&frame[0..4]) as u8;
        let byte_count = bits_to_value(&frame[4..8]) as usize + 1;
        let register = bits_to_value(&frame[9..17]);
        (slave, register, byte_count)
    }
}

fn bits_to_value(bits: &[u8]) -> u16 {
    bits.iter().fold(0u16, |acc, &b| (acc << 1) | u16::from(b))
}

impl Transport for MockTransport {
    fn burst(
        &mut self,
        bus: BusNumber,
        operation: &str,
        frame: &[u8],
        _timeout: Duration,
    ) -> Result<()> {
        let attempt = self.burst_attempts;
        self.burst_attempts += 1;
        if self.fail_burst_at == Some(attempt) {
            return Err(Error::Timeout);
        }

        if self.echo {
            match operation {
                "RegWriteExt" => {
                    let (slave, register, byte_count) = Self::decode_frame_target(frame);
                    let data: Vec<u8> = (0..byte_count)
                        .map(|i| {
                            let start = 18 + i * 9;
                            bits_to_value(&frame[start..start + 8]) as u8
                        })
                        .collect();
                    self.memory.insert((slave, register), data);
                }
                "RegReadExt" => {
                    let (slave, register, _) = Self::decode_frame_target(frame);
                    self.pending_read = Some((slave, register));
                }
                _ => {}
            }
        }

        self.bursts.push(Burst {
            bus,
            operation: operation.to_string(),
            frame: frame.to_vec(),
        });
        Ok(())
    }

    fn capture_bytes(
        &mut self,
        _bus: BusNumber,
        _operation: &str,
        byte_count: usize,
        _timeout: Duration,
    ) -> Result<Vec<u8>> {
        if let Some(canned) = self.captures.pop_front() {
            return Ok(canned);
        }
        if self.echo {
            let (slave, register) = self.pending_read.take().ok_or_else(|| {
                Error::Transport("capture requested without a preceding read burst".into())
            })?;
            let mut data = self
                .memory
                .get(&(slave, register))
                .cloned()
                .unwrap_or_default();
            data.resize(byte_count, 0);
            return Ok(data);
        }
        Err(Error::Transport("no capture data queued".into()))
    }

    fn enable_supply(&mut self, bus: BusNumber) -> Result<()> {
        self.supply.insert(bus.raw(), true);
        Ok(())
    }

    fn disable_supply(&mut self, bus: BusNumber) -> Result<()> {
        self.supply.insert(bus.raw(), false);
        Ok(())
    }

    fn site_count(&self) -> usize {
        self.site_count
    }
}
