use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;
use std::ops::Range;

use crate::error::{FormatError, Result};

/// Bytes fetched from the end of the bundle to find the central directory.
///
/// Large enough for a ZIP64 End of Central Directory record (56 bytes), its
/// locator (20 bytes) and the standard End of Central Directory record (22 bytes).
pub const TRAILER_WINDOW: usize = 98;

/// Placeholder stored in 32-bit fields whose value lives in the ZIP64 extra field.
pub const ZIP64_SENTINEL: u32 = 0xFFFF_FFFF;

/// ZIP64 extended information extra field tag.
pub const ZIP64_EXTRA_ID: u16 = 0x0001;

/// End of Central Directory (EOCD) - 22 bytes without comment
pub const EOCD_SIGNATURE: u32 = 0x0605_4b50;
pub const EOCD_SIZE: usize = 22;

/// ZIP64 End of Central Directory - 56 bytes minimum
pub const ZIP64_EOCD_SIGNATURE: u32 = 0x0606_4b50;
pub const ZIP64_EOCD_MIN_SIZE: usize = 56;

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: u32 = 0x0201_4b50;
pub const CDFH_MIN_SIZE: usize = 46;

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIZE: u64 = 30;

/// Where the central directory lives, whichever trailer described it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentralDirectoryLocation {
    pub entries: u64,
    pub size: u64,
    pub offset: u64,
    pub zip64: bool,
}

impl CentralDirectoryLocation {
    /// Read the location from the tail of a bundle.
    ///
    /// A window starting with the ZIP64 EOCD signature is read as a ZIP64
    /// record; otherwise its last 22 bytes must hold a standard EOCD.
    pub fn from_trailer(window: &[u8]) -> Result<Self> {
        if window.len() >= ZIP64_EOCD_MIN_SIZE && read_u32_at(window, 0) == ZIP64_EOCD_SIGNATURE {
            let mut cursor = Cursor::new(window);
            cursor.set_position(32);
            return Ok(Self {
                entries: cursor.read_u64::<LittleEndian>()?,
                size: cursor.read_u64::<LittleEndian>()?,
                offset: cursor.read_u64::<LittleEndian>()?,
                zip64: true,
            });
        }

        if window.len() < EOCD_SIZE {
            return Err(FormatError::BadEocdSignature.into());
        }
        let eocd = &window[window.len() - EOCD_SIZE..];
        if read_u32_at(eocd, 0) != EOCD_SIGNATURE {
            return Err(FormatError::BadEocdSignature.into());
        }

        let mut cursor = Cursor::new(eocd);
        cursor.set_position(10);
        Ok(Self {
            entries: cursor.read_u16::<LittleEndian>()? as u64,
            size: cursor.read_u32::<LittleEndian>()? as u64,
            offset: cursor.read_u32::<LittleEndian>()? as u64,
            zip64: false,
        })
    }
}

/// One bundle member, normalized from either the 32-bit or the ZIP64 layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: String,
    /// Bytes stored in the bundle; members are stored uncompressed.
    pub stored_size: u64,
    pub local_header_offset: u64,
    pub data_offset: u64,
}

impl Entry {
    /// Byte range of the member's data inside the bundle.
    pub fn data_range(&self) -> Range<u64> {
        self.data_offset..self.data_offset.saturating_add(self.stored_size)
    }
}

/// Little-endian u32 at `offset`; callers guarantee the bytes are there.
pub(crate) fn read_u32_at(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}
