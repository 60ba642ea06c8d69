//! RF front-end band programming example.
//!
//! Demonstrates the typical RFFE bring-up sequence for a front-end module:
//! enable the VIO supply, burst a batch of extended register writes that
//! program one band's amplifier settings, then read every register back and
//! print a write/read comparison table.
//!
//! The example runs against the echoing mock transport so it works without
//! hardware; a production test program constructs the bus with its
//! instrument-backed `Transport` instead.
//!
//! # Usage
//!
//! ```sh
//! cargo run -p mipilib --example band_programming
//! ```

use mipilib::rffe::{RffeBus, RffeCommand};
use mipilib_test_harness::MockTransport;

/// Band 1 APT register programming: (slave address, register address, data).
const BAND1_APT: &[(u8, u16, &[u8])] = &[
    (0x7, 0x00, &[0x38]),
    (0x7, 0x01, &[0x07]),
    (0x7, 0x02, &[0xF2]),
    (0x7, 0x03, &[0x01]),
];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut bus = RffeBus::new(MockTransport::new().with_echo());
    bus.enable_vio()?;

    // Program the whole band as one ordered batch.
    let mut writes = BAND1_APT
        .iter()
        .map(|&(slave, register, data)| {
            RffeCommand::extended_register_write(slave, register, data)
        })
        .collect::<mipilib::Result<Vec<_>>>()?;
    bus.execute_all(&mut writes)?;

    // Read every register back and compare.
    println!("Slave | Register | Write | Read");
    for &(slave, register, data) in BAND1_APT {
        let read = bus.extended_register_read(slave, register, data.len())?;
        println!(
            "0x{:02X}  | 0x{:02X}     | {} | {}",
            slave,
            register,
            format_bytes(data),
            format_bytes(&read)
        );
    }

    bus.disable_vio()?;
    Ok(())
}

fn format_bytes(bytes: &[u8]) -> String {
    let formatted: Vec<String> = bytes.iter().map(|b| format!("0x{b:02X}")).collect();
    format!("[{}]", formatted.join(","))
}
