//! Error taxonomy the store surfaces to callers.

use crate::address::ParseError as AddressParseError;

/// Errors the store can return.
///
/// `AlreadyExists` is deliberately absent here: the writer branches on it
/// internally but never lets it escape as a public variant. Readers never
/// error on "not found" — they return `Option`.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A caller-supplied argument was malformed (empty hash text, wrong
    /// length bytes, invalid encoding name, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An address failed to parse.
    #[error(transparent)]
    Address(#[from] AddressParseError),

    /// Underlying filesystem or stream I/O failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// A write was aborted via its cancellation token.
    #[error("write cancelled")]
    Cancelled,
}
