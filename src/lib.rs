//! # mapbundle
//!
//! Indexer and entry reader for map bundles: ZIP archives whose members are
//! stored uncompressed, read through a random-access [`Source`].
//!
//! Opening a bundle costs two reads, the archive tail and its central
//! directory, after which any member can be fetched with a single range read.
//! This makes remote bundles served over HTTP Range requests as cheap to use
//! as local files.
//!
//! ## Features
//!
//! - Local file, in-memory and HTTP Range sources
//! - ZIP64 trailers and ZIP64 extended information extra fields
//! - Flat path to entry index, tolerant of truncated central directories
//! - JSON decoding of metadata members, with missing members read as `{}`
//!
//! ## Example
//!
//! ```no_run
//! use mapbundle::{Bundle, HttpSource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let source = HttpSource::new("https://example.com/oslo.mapbundle".to_string()).await?;
//!     let bundle = Bundle::new(source);
//!
//!     for path in bundle.file_list().await? {
//!         println!("{}", path);
//!     }
//!
//!     let metadata = bundle.read_json("metadata.json").await?;
//!     println!("{}", metadata);
//!
//!     Ok(())
//! }
//! ```

pub mod bundle;
pub mod cli;
pub mod error;
pub mod io;
pub mod zip;

pub use bundle::Bundle;
pub use cli::Cli;
pub use error::{DecodeError, Error, FormatError, Result};
pub use io::{FileSource, HttpOptions, HttpSource, MemorySource, Source};
pub use crate::zip::{Entry, Index, build_index, read_bytes, read_json};
