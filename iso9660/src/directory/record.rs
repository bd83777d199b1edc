//! Directory Record structure
//!
//! Directory records describe files and subdirectories.
//!
//! ```text
//! 0      1      2        10       18        25     26     27     28        32     33
//! | len  | ext  | extent | length | datetime| flags| unit | gap  | vol seq | idlen| id ... | pad? | system use ... |
//! ```

use crate::error::{Iso9660Error, Result};
use crate::types::FileFlags;

/// Directory Record (variable length), borrowed from a sector buffer
#[derive(Debug, Clone, Copy)]
pub struct DirectoryRecord<'a> {
    bytes: &'a [u8],

    /// Length of directory record (BP 1)
    pub length: u8,

    /// Extended attribute record length (BP 2)
    pub extended_attr_length: u8,

    /// File flags (BP 26)
    pub file_flags: u8,

    /// File unit size (interleaved files) (BP 27)
    pub file_unit_size: u8,

    /// Interleave gap size (BP 28)
    pub interleave_gap: u8,

    /// File identifier length (BP 33)
    pub file_id_len: u8,
}

impl<'a> DirectoryRecord<'a> {
    /// Fixed part preceding the file identifier
    pub const HEADER_LEN: usize = 33;

    /// Minimum record length
    pub const MIN_LENGTH: u8 = 34;

    /// Parse directory record from bytes
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < Self::MIN_LENGTH as usize {
            return Err(Iso9660Error::InvalidDirectoryRecord);
        }

        let length = data[0];
        if length < Self::MIN_LENGTH || length as usize > data.len() {
            return Err(Iso9660Error::InvalidDirectoryRecord);
        }

        let file_id_len = data[32];
        if Self::HEADER_LEN + file_id_len as usize > length as usize {
            return Err(Iso9660Error::InvalidDirectoryRecord);
        }

        Ok(Self {
            bytes: &data[..length as usize],
            length,
            extended_attr_length: data[1],
            file_flags: data[25],
            file_unit_size: data[26],
            interleave_gap: data[27],
            file_id_len,
        })
    }

    fn le_u32(&self, at: usize) -> u32 {
        let b = &self.bytes[at..at + 4];
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Get extent LBA (little-endian part of both-endian field)
    pub fn get_extent_lba(&self) -> u32 {
        self.le_u32(2)
    }

    /// Get data length (little-endian part)
    pub fn get_data_length(&self) -> u32 {
        self.le_u32(10)
    }

    /// Parse file flags
    pub fn get_flags(&self) -> FileFlags {
        FileFlags {
            hidden: self.file_flags & 0x01 != 0,
            directory: self.file_flags & 0x02 != 0,
            associated: self.file_flags & 0x04 != 0,
            extended_format: self.file_flags & 0x08 != 0,
            extended_permissions: self.file_flags & 0x10 != 0,
            not_final: self.file_flags & 0x80 != 0,
        }
    }

    /// Is this a directory?
    pub fn is_directory(&self) -> bool {
        self.file_flags & 0x02 != 0
    }

    /// Is this the `.` or `..` entry?
    pub fn is_dot_entry(&self) -> bool {
        matches!(self.file_identifier(), [0x00] | [0x01])
    }

    /// Get file identifier bytes
    pub fn file_identifier(&self) -> &'a [u8] {
        &self.bytes[Self::HEADER_LEN..Self::HEADER_LEN + self.file_id_len as usize]
    }

    /// System Use area: everything after the identifier and its padding byte
    pub fn system_use(&self) -> &'a [u8] {
        let mut start = Self::HEADER_LEN + self.file_id_len as usize;
        if self.file_id_len % 2 == 0 {
            start += 1;
        }
        self.bytes.get(start..).unwrap_or(&[])
    }
}
