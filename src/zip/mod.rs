//! Stored ZIP bundle indexing and entry reads.
//!
//! ## Architecture
//!
//! - [`structures`]: trailer and record layouts, and the normalized [`Entry`]
//! - [`parser`]: builds an [`Index`] from the central directory
//! - [`index`]: the immutable path to [`Entry`] table
//! - [`reader`]: fetches one entry's bytes and parses them as JSON
//!
//! ## Bundle layout
//!
//! A bundle is a ZIP archive whose members are stored without compression:
//! 1. Local file headers, each followed by the member's raw bytes
//! 2. Central Directory with metadata for all members
//! 3. ZIP64 End of Central Directory record and locator, when present
//! 4. End of Central Directory (EOCD) record at the end
//!
//! ## Limitations
//!
//! - No decompression; member bytes are returned as stored
//! - No multi-disk archives
//! - Data offsets assume local headers carry no extra field

pub mod index;
pub mod parser;
pub mod reader;
pub mod structures;

pub use index::Index;
pub use parser::{build_index, parse_central_directory};
pub use reader::{decode_json, read_bytes, read_json};
pub use structures::{CentralDirectoryLocation, Entry};
