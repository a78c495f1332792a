use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No usable Bluetooth adapter. Fatal at startup.
    AdapterUnavailable(String),
    /// The light (or its write characteristic) could not be found. Fatal at startup.
    DeviceNotFound(String),
    /// The link to the light went away. Ends the delivery loop.
    ConnectionLost(String),
    /// A screen capture failed. The current cycle is skipped.
    CaptureFailure(String),
    /// A single write failed or timed out.
    SendFailure(String),
    /// Input the pipeline cannot work with, e.g. an empty frame.
    InvalidInput(String),
    /// A byte sequence is not a valid light command.
    Encoding(String),
}

impl Error {
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::AdapterUnavailable(_) | Error::DeviceNotFound(_) | Error::ConnectionLost(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AdapterUnavailable(msg) => write!(f, "Bluetooth adapter unavailable: {msg}"),
            Error::DeviceNotFound(msg) => write!(f, "Device not found: {msg}"),
            Error::ConnectionLost(msg) => write!(f, "Connection lost: {msg}"),
            Error::CaptureFailure(msg) => write!(f, "Screen capture failed: {msg}"),
            Error::SendFailure(msg) => write!(f, "Failed to write to characteristic: {msg}"),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::Encoding(msg) => write!(f, "Malformed light command: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
