//! Error types for mipilib.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Construction-time range violations and
//! transport-layer failures are both captured here.

/// The error type for all mipilib operations.
///
/// Variants cover the two failure classes of a command-framing codec:
/// a caller handed a field value that does not fit its wire-format bit
/// width, or the injected transport failed while bursting or capturing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A command field violated its field-width bound.
    ///
    /// Raised synchronously at command construction, before any bits are
    /// emitted. This indicates a caller programming error and is never
    /// retryable. Bound values are pre-formatted (hex for addresses,
    /// decimal for counts) so the message reads the way an operator would
    /// write the value.
    #[error("{field} out of range. Expected [{lower}, {upper}] but found {found}.")]
    OutOfRange {
        /// Which field violated its bound ("Slave address", "Register
        /// address", "Byte count", "Bus number").
        field: &'static str,
        /// Inclusive lower bound.
        lower: String,
        /// Inclusive upper bound.
        upper: String,
        /// The offending value as supplied.
        found: String,
    },

    /// A transport-level fault during burst or capture.
    ///
    /// Propagated unchanged from the transport implementation; this layer
    /// never interprets why the call failed. Recoverable only by the
    /// caller retrying the whole transaction.
    #[error("transport error: {0}")]
    Transport(String),

    /// The transport deadline expired during burst or capture.
    #[error("timeout waiting for response")]
    Timeout,
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_out_of_range() {
        let e = Error::OutOfRange {
            field: "Slave address",
            lower: "0x0".into(),
            upper: "0xF".into(),
            found: "0x10".into(),
        };
        assert_eq!(
            e.to_string(),
            "Slave address out of range. Expected [0x0, 0xF] but found 0x10."
        );
    }

    #[test]
    fn error_display_transport() {
        let e = Error::Transport("pattern engine fault".into());
        assert_eq!(e.to_string(), "transport error: pattern engine fault");
    }

    #[test]
    fn error_display_timeout() {
        let e = Error::Timeout;
        assert_eq!(e.to_string(), "timeout waiting for response");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<Error>();
    }
}
