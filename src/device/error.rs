//! Error types shared by notification device implementations.

use thiserror::Error;

/// Convenient result alias returning [`DeviceError`] failures.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Failures that can occur while talking to the notification device.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The configured address could not be resolved.
    #[error("failed to resolve device address `{address}`")]
    Resolve {
        address: String,
        #[source]
        source: std::io::Error,
    },
    /// Resolution succeeded but yielded nothing to connect to.
    #[error("device address `{address}` resolved to no socket address")]
    NoAddress { address: String },
    /// Opening, writing or reading the device socket failed.
    #[error("device I/O with `{address}` failed")]
    Io {
        address: String,
        #[source]
        source: std::io::Error,
    },
    /// The device did not answer within the command timeout.
    #[error("device `{address}` did not respond in time")]
    Timeout { address: String },
    /// A request could not be serialized.
    #[error("failed to encode device request")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
    /// A response could not be parsed into the expected shape.
    #[error("failed to decode response from `{address}`")]
    Decode {
        address: String,
        #[source]
        source: serde_json::Error,
    },
    /// The device answered with a non-zero error code.
    #[error("device rejected command with code {code}: {message}")]
    Rejected { code: i64, message: String },
}
