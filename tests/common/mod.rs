//! Byte-level builder for stored ZIP bundles used across the integration tests.

#![allow(dead_code)]

const LFH_SIGNATURE: u32 = 0x0403_4b50;
const CDFH_SIGNATURE: u32 = 0x0201_4b50;
const EOCD_SIGNATURE: u32 = 0x0605_4b50;
const ZIP64_EOCD_SIGNATURE: u32 = 0x0606_4b50;
const ZIP64_LOCATOR_SIGNATURE: u32 = 0x0706_4b50;
const SENTINEL: u32 = 0xFFFF_FFFF;

struct Member {
    name: String,
    data: Vec<u8>,
    comment: Vec<u8>,
}

/// A built bundle plus where its central directory landed.
pub struct Built {
    pub bytes: Vec<u8>,
    pub cd_offset: usize,
    pub cd_size: usize,
    /// Offset of each member's local header, in insertion order.
    pub local_header_offsets: Vec<u64>,
}

impl Built {
    /// Overwrite the size recorded in the standard EOCD record.
    pub fn set_eocd_cd_size(&mut self, size: u32) {
        let at = self.bytes.len() - 22 + 12;
        self.bytes[at..at + 4].copy_from_slice(&size.to_le_bytes());
    }

    /// Overwrite the entry count recorded in the standard EOCD record.
    pub fn set_eocd_entries(&mut self, entries: u16) {
        let at = self.bytes.len() - 22 + 10;
        self.bytes[at..at + 2].copy_from_slice(&entries.to_le_bytes());
    }
}

#[derive(Default)]
pub struct BundleBuilder {
    members: Vec<Member>,
    zip64: bool,
    prefix: usize,
}

impl BundleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(self, name: &str, data: &[u8]) -> Self {
        self.member_with_comment(name, data, b"")
    }

    pub fn member_with_comment(mut self, name: &str, data: &[u8], comment: &[u8]) -> Self {
        self.members.push(Member {
            name: name.to_string(),
            data: data.to_vec(),
            comment: comment.to_vec(),
        });
        self
    }

    /// Write ZIP64 trailers and put every size and offset in ZIP64 extra fields.
    pub fn zip64(mut self) -> Self {
        self.zip64 = true;
        self
    }

    /// Pad the start of the bundle, like a self-extracting stub would.
    pub fn prefix(mut self, len: usize) -> Self {
        self.prefix = len;
        self
    }

    pub fn build(&self) -> Built {
        let mut out = vec![0u8; self.prefix];
        let mut offsets = Vec::new();

        for member in &self.members {
            offsets.push(out.len() as u64);
            put_u32(&mut out, LFH_SIGNATURE);
            put_u16(&mut out, 20); // version needed
            put_u16(&mut out, 0); // flags
            put_u16(&mut out, 0); // stored
            put_u16(&mut out, 0); // time
            put_u16(&mut out, 0); // date
            put_u32(&mut out, 0); // crc
            put_u32(&mut out, member.data.len() as u32);
            put_u32(&mut out, member.data.len() as u32);
            put_u16(&mut out, member.name.len() as u16);
            put_u16(&mut out, 0); // no local extra field
            out.extend_from_slice(member.name.as_bytes());
            out.extend_from_slice(&member.data);
        }

        let cd_offset = out.len();
        for (member, &offset) in self.members.iter().zip(&offsets) {
            let size = member.data.len() as u64;
            let extra = if self.zip64 {
                let mut extra = Vec::new();
                put_u16(&mut extra, 0x0001);
                put_u16(&mut extra, 24);
                put_u64(&mut extra, size);
                put_u64(&mut extra, size);
                put_u64(&mut extra, offset);
                extra
            } else {
                Vec::new()
            };
            let (size32, offset32) = if self.zip64 {
                (SENTINEL, SENTINEL)
            } else {
                (size as u32, offset as u32)
            };

            put_u32(&mut out, CDFH_SIGNATURE);
            put_u16(&mut out, 45); // version made by
            put_u16(&mut out, 20); // version needed
            put_u16(&mut out, 0); // flags
            put_u16(&mut out, 0); // stored
            put_u16(&mut out, 0); // time
            put_u16(&mut out, 0); // date
            put_u32(&mut out, 0); // crc
            put_u32(&mut out, size32);
            put_u32(&mut out, size32);
            put_u16(&mut out, member.name.len() as u16);
            put_u16(&mut out, extra.len() as u16);
            put_u16(&mut out, member.comment.len() as u16);
            put_u16(&mut out, 0); // disk number start
            put_u16(&mut out, 0); // internal attributes
            put_u32(&mut out, 0); // external attributes
            put_u32(&mut out, offset32);
            out.extend_from_slice(member.name.as_bytes());
            out.extend_from_slice(&extra);
            out.extend_from_slice(&member.comment);
        }
        let cd_size = out.len() - cd_offset;
        let count = self.members.len() as u64;

        if self.zip64 {
            let record_offset = out.len() as u64;
            put_u32(&mut out, ZIP64_EOCD_SIGNATURE);
            put_u64(&mut out, 44); // size of remaining record
            put_u16(&mut out, 45);
            put_u16(&mut out, 45);
            put_u32(&mut out, 0); // this disk
            put_u32(&mut out, 0); // disk with central directory
            put_u64(&mut out, count);
            put_u64(&mut out, count);
            put_u64(&mut out, cd_size as u64);
            put_u64(&mut out, cd_offset as u64);

            put_u32(&mut out, ZIP64_LOCATOR_SIGNATURE);
            put_u32(&mut out, 0);
            put_u64(&mut out, record_offset);
            put_u32(&mut out, 1);

            put_u32(&mut out, EOCD_SIGNATURE);
            put_u16(&mut out, 0);
            put_u16(&mut out, 0);
            put_u16(&mut out, 0xFFFF);
            put_u16(&mut out, 0xFFFF);
            put_u32(&mut out, SENTINEL);
            put_u32(&mut out, SENTINEL);
            put_u16(&mut out, 0);
        } else {
            put_u32(&mut out, EOCD_SIGNATURE);
            put_u16(&mut out, 0);
            put_u16(&mut out, 0);
            put_u16(&mut out, count as u16);
            put_u16(&mut out, count as u16);
            put_u32(&mut out, cd_size as u32);
            put_u32(&mut out, cd_offset as u32);
            put_u16(&mut out, 0);
        }

        Built {
            bytes: out,
            cd_offset,
            cd_size,
            local_header_offsets: offsets,
        }
    }
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_u64(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}
