use super::{Source, check_range};
use crate::error::Result;
use async_trait::async_trait;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Local file source with positional reads
///
/// Reads run on tokio's blocking pool, so concurrent entry reads do not stall
/// the async workers.
pub struct FileSource {
    file: Arc<File>,
    key: String,
    size: u64,
}

impl FileSource {
    /// Open a bundle on the local filesystem.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the bundle; its lossy string form becomes the key
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the file cannot be opened or
    /// its metadata cannot be read.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            file: Arc::new(file),
            key: path.to_string_lossy().into_owned(),
            size,
        })
    }
}

#[cfg(unix)]
fn read_exact_at(file: &File, buf: &mut [u8], offset: u64) -> std::io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.read_exact_at(buf, offset)
}

#[cfg(windows)]
fn read_exact_at(file: &File, mut buf: &mut [u8], mut offset: u64) -> std::io::Result<()> {
    use std::os::windows::fs::FileExt;
    // seek_read may return short reads, loop until the buffer is filled
    while !buf.is_empty() {
        match file.seek_read(buf, offset)? {
            0 => return Err(std::io::ErrorKind::UnexpectedEof.into()),
            n => {
                buf = &mut buf[n..];
                offset += n as u64;
            }
        }
    }
    Ok(())
}

#[cfg(not(any(unix, windows)))]
fn read_exact_at(mut file: &File, buf: &mut [u8], offset: u64) -> std::io::Result<()> {
    use std::io::{Read, Seek, SeekFrom};
    file.seek(SeekFrom::Start(offset))?;
    file.read_exact(buf)
}

#[async_trait]
impl Source for FileSource {
    fn key(&self) -> &str {
        &self.key
    }

    async fn size(&self) -> Result<u64> {
        Ok(self.size)
    }

    async fn get_bytes(&self, offset: u64, length: usize) -> Result<Vec<u8>> {
        check_range(offset, length, self.size)?;
        let file = Arc::clone(&self.file);
        let buf = tokio::task::spawn_blocking(move || {
            let mut buf = vec![0u8; length];
            read_exact_at(&file, &mut buf, offset).map(|()| buf)
        })
        .await
        .map_err(std::io::Error::from)??;
        Ok(buf)
    }
}
