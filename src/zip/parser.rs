//! Central directory indexing.
//!
//! Bundles are read from the end:
//! 1. Fetch the trailing [`TRAILER_WINDOW`] bytes and decide between the ZIP64
//!    record and the standard End of Central Directory record
//! 2. Fetch the whole Central Directory in one read
//! 3. Walk its file headers into an [`Index`]
//!
//! Only two reads hit the source, which keeps remote bundles cheap to open
//! over HTTP Range requests.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;
use tracing::{debug, trace, warn};

use crate::error::{Error, FormatError, Result};
use crate::io::Source;

use super::index::Index;
use super::structures::*;

/// Build the path index of the bundle behind `source`.
///
/// # Arguments
///
/// * `source` - Random-access bytes of the whole bundle
///
/// # Returns
///
/// An [`Index`] of every member found in the central directory.
///
/// # Errors
///
/// Returns [`FormatError`] when the trailer or the central directory has an
/// unexpected signature. Source errors are returned as they are.
///
/// A central directory that ends early is not an error: the index then holds
/// every entry that could be parsed.
pub async fn build_index<S: Source + ?Sized>(source: &S) -> Result<Index> {
    let size = source.size().await?;

    let window_len = size.min(TRAILER_WINDOW as u64);
    let window = source
        .get_bytes(size - window_len, window_len as usize)
        .await?;
    let location = CentralDirectoryLocation::from_trailer(&window)?;

    debug!(
        key = source.key(),
        zip64 = location.zip64,
        entries = location.entries,
        cd_size = location.size,
        cd_offset = location.offset,
        "located central directory"
    );

    let cd_len = usize::try_from(location.size).map_err(|_| Error::TooLarge(location.size))?;
    let central_directory = source.get_bytes(location.offset, cd_len).await?;

    if central_directory.len() < 4 || read_u32_at(&central_directory, 0) != CDFH_SIGNATURE {
        return Err(FormatError::BadCentralDirectorySignature.into());
    }

    let index = parse_central_directory(&central_directory, location.entries);
    debug!(key = source.key(), entries = index.len(), "built index");

    Ok(index)
}

/// Walk up to `count` file headers from the start of `buf`.
///
/// Stops at the end of the buffer or at the first header that does not fit in
/// the remaining bytes.
///
/// # Arguments
///
/// * `buf` - The central directory bytes
/// * `count` - Entry count recorded in the trailer
///
/// # Returns
///
/// An [`Index`] of the records parsed before the walk stopped.
pub fn parse_central_directory(buf: &[u8], count: u64) -> Index {
    let mut entries = Vec::new();
    let mut position = 0usize;
    let mut parsed = 0u64;

    while parsed < count && position < buf.len() {
        match parse_cdfh(&buf[position..]) {
            Some((entry, record_len)) => {
                trace!(
                    path = %entry.path,
                    stored_size = entry.stored_size,
                    data_offset = entry.data_offset,
                    "parsed central directory record"
                );
                entries.push(entry);
                position += record_len;
                parsed += 1;
            }
            None => break,
        }
    }

    if parsed < count {
        warn!(
            "central directory ended after {} of {} records at byte {}",
            parsed, count, position
        );
    }

    entries.into_iter().collect()
}

/// Parse one Central Directory File Header.
///
/// Returns the entry and the full record length, or `None` if the record is
/// truncated.
fn parse_cdfh(record: &[u8]) -> Option<(Entry, usize)> {
    if record.len() < CDFH_MIN_SIZE {
        return None;
    }

    // Fixed fields, read from their offsets in the header
    let mut cursor = Cursor::new(record);
    cursor.set_position(20);
    let compressed_size = cursor.read_u32::<LittleEndian>().ok()?;
    let uncompressed_size = cursor.read_u32::<LittleEndian>().ok()?;
    let file_name_length = cursor.read_u16::<LittleEndian>().ok()? as usize;
    let extra_field_length = cursor.read_u16::<LittleEndian>().ok()? as usize;
    let file_comment_length = cursor.read_u16::<LittleEndian>().ok()? as usize;
    cursor.set_position(42);
    let lfh_offset = cursor.read_u32::<LittleEndian>().ok()?;

    let record_len = CDFH_MIN_SIZE + file_name_length + extra_field_length + file_comment_length;
    if record.len() < record_len {
        return None;
    }

    let name_end = CDFH_MIN_SIZE + file_name_length;
    let path = String::from_utf8_lossy(&record[CDFH_MIN_SIZE..name_end]).into_owned();

    let mut stored_size = compressed_size as u64;
    let mut local_header_offset = lfh_offset as u64;

    if compressed_size == ZIP64_SENTINEL || lfh_offset == ZIP64_SENTINEL {
        let extra = &record[name_end..name_end + extra_field_length];
        let zip64 = read_zip64_extra(extra, uncompressed_size, compressed_size, lfh_offset);
        stored_size = zip64.compressed_size.unwrap_or(stored_size);
        local_header_offset = zip64.lfh_offset.unwrap_or(local_header_offset);
    }

    // Assumes the local header carries no extra field of its own
    let data_offset = local_header_offset.saturating_add(LFH_SIZE + file_name_length as u64);

    Some((
        Entry {
            path,
            stored_size,
            local_header_offset,
            data_offset,
        },
        record_len,
    ))
}

/// Values recovered from a ZIP64 extended information extra field.
#[derive(Debug, Default, PartialEq, Eq)]
struct Zip64Values {
    compressed_size: Option<u64>,
    lfh_offset: Option<u64>,
}

/// Find the ZIP64 block in an extra field region and read the 64-bit values.
///
/// The block holds, in order, the uncompressed size, compressed size and local
/// header offset, but only for the fields whose 32-bit value is the sentinel.
fn read_zip64_extra(
    extra: &[u8],
    uncompressed_size: u32,
    compressed_size: u32,
    lfh_offset: u32,
) -> Zip64Values {
    let mut values = Zip64Values::default();
    let mut cursor = Cursor::new(extra);
    let extra_end = extra.len() as u64;

    while cursor.position() + 4 <= extra_end {
        let (Ok(header_id), Ok(field_size)) = (
            cursor.read_u16::<LittleEndian>(),
            cursor.read_u16::<LittleEndian>(),
        ) else {
            break;
        };
        let block_start = cursor.position() as usize;
        let block_end = (block_start + field_size as usize).min(extra.len());

        if header_id != ZIP64_EXTRA_ID {
            cursor.set_position(block_end as u64);
            continue;
        }

        let mut block = Cursor::new(&extra[block_start..block_end]);
        if uncompressed_size == ZIP64_SENTINEL {
            // Not needed for stored entries, but it shifts the fields after it
            if block.read_u64::<LittleEndian>().is_err() {
                return values;
            }
        }
        if compressed_size == ZIP64_SENTINEL {
            values.compressed_size = block.read_u64::<LittleEndian>().ok();
        }
        if lfh_offset == ZIP64_SENTINEL {
            values.lfh_offset = block.read_u64::<LittleEndian>().ok();
        }
        break;
    }

    values
}
