mod http;
mod local;
mod memory;

pub use http::{HttpOptions, HttpSource};
pub use local::FileSource;
pub use memory::MemorySource;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Random access to the bytes of a bundle.
#[async_trait]
pub trait Source: Send + Sync {
    /// Stable identity of the backing data (path, URL, or caller-chosen name).
    fn key(&self) -> &str;

    /// Total size of the data source in bytes.
    async fn size(&self) -> Result<u64>;

    /// Read exactly `length` bytes starting at `offset`.
    ///
    /// Fails with [`Error::OutOfRange`] if the range extends past the end of the source.
    async fn get_bytes(&self, offset: u64, length: usize) -> Result<Vec<u8>>;
}

#[async_trait]
impl<S: Source + ?Sized> Source for Arc<S> {
    fn key(&self) -> &str {
        (**self).key()
    }

    async fn size(&self) -> Result<u64> {
        (**self).size().await
    }

    async fn get_bytes(&self, offset: u64, length: usize) -> Result<Vec<u8>> {
        (**self).get_bytes(offset, length).await
    }
}

/// Reject a read of `length` bytes at `offset` that does not fit in `size`.
pub(crate) fn check_range(offset: u64, length: usize, size: u64) -> Result<()> {
    let length = length as u64;
    match offset.checked_add(length) {
        Some(end) if end <= size => Ok(()),
        _ => Err(Error::OutOfRange {
            offset,
            length,
            size,
        }),
    }
}
