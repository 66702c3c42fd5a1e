use async_trait::async_trait;

use super::{Source, check_range};
use crate::error::Result;

/// A bundle held entirely in memory.
pub struct MemorySource {
    key: String,
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(key: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            data,
        }
    }
}

#[async_trait]
impl Source for MemorySource {
    fn key(&self) -> &str {
        &self.key
    }

    async fn size(&self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }

    async fn get_bytes(&self, offset: u64, length: usize) -> Result<Vec<u8>> {
        check_range(offset, length, self.data.len() as u64)?;
        let start = offset as usize;
        Ok(self.data[start..start + length].to_vec())
    }
}
