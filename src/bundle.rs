use serde_json::Value;
use tokio::sync::OnceCell;

use crate::error::Result;
use crate::io::Source;
use crate::zip::{self, Index};

/// A bundle opened over a [`Source`], indexed on first use.
pub struct Bundle<S: Source> {
    source: S,
    index: OnceCell<Index>,
}

impl<S: Source> Bundle<S> {
    /// Wrap `source`; nothing is read until the first query.
    pub fn new(source: S) -> Self {
        Self {
            source,
            index: OnceCell::new(),
        }
    }

    pub fn key(&self) -> &str {
        self.source.key()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The bundle's index, built from the central directory on the first call.
    ///
    /// A failed build is not cached; the next call tries again.
    pub async fn index(&self) -> Result<&Index> {
        self.index
            .get_or_try_init(|| zip::build_index(&self.source))
            .await
    }

    /// Sorted member paths.
    pub async fn file_list(&self) -> Result<Vec<String>> {
        let index = self.index().await?;
        Ok(index.paths().into_iter().map(str::to_owned).collect())
    }

    /// Raw stored bytes of `path`, or `None` if the bundle has no such member.
    ///
    /// Tile adapters and style lookups read members through this.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be built or the source read fails.
    pub async fn read_bytes(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let index = self.index().await?;
        zip::read_bytes(index, path, &self.source).await
    }

    /// `path` parsed as JSON, or an empty object if the bundle has no such member.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`](crate::Error::Decode) if the member is not
    /// UTF-8 JSON, otherwise the errors of [`Bundle::read_bytes`].
    pub async fn read_json(&self, path: &str) -> Result<Value> {
        let index = self.index().await?;
        zip::read_json(index, path, &self.source).await
    }
}
