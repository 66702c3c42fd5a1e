//! Error types for bundle indexing and entry reads.

use thiserror::Error;

/// Errors that can occur while indexing or reading a bundle.
#[derive(Debug, Error)]
pub enum Error {
    /// The archive trailer or central directory is not recognised.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// An entry could not be decoded as UTF-8 JSON.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// I/O error from a local source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport error from an HTTP source.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote server answered, but not in a way a range source can use.
    #[error("remote error: {0}")]
    Remote(String),

    /// A read extends past the end of the source.
    #[error("read of {length} bytes at offset {offset} is out of range (size {size})")]
    OutOfRange { offset: u64, length: u64, size: u64 },

    /// A length recorded in the archive does not fit in memory on this platform.
    #[error("length {0} does not fit in memory")]
    TooLarge(u64),
}

/// Signature checks that can fail while locating the central directory.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Neither a ZIP64 end of central directory record nor a standard one was found.
    #[error("bad EOCD signature")]
    BadEocdSignature,

    /// The central directory does not start with a file header.
    #[error("bad central directory signature")]
    BadCentralDirectorySignature,
}

/// Failures turning entry bytes into a JSON value.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("entry is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("entry is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for bundle operations.
pub type Result<T> = std::result::Result<T, Error>;
