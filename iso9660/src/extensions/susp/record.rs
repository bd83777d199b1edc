//! System Use record framing
//!
//! A System Use area is a run of records packed back to back with no count:
//!
//! ```text
//! +------+------+-----+---------+----------------------+
//! | sig0 | sig1 | len | version | payload (len - 4)    |
//! +------+------+-----+---------+----------------------+
//! ```
//!
//! The framer never trusts `len`: a record is only handed out once its
//! declared length has been checked against the bytes actually left.

use super::error::{Result, SuspError};
use super::signature::Signature;

/// Size of the fixed record header
pub const HEADER_LEN: usize = 4;

/// Fewer bytes than this left in a range is treated as trailing padding
const MIN_FRAMEABLE: usize = 3;

/// One framed System Use record, borrowed from its range
#[derive(Debug, Clone, Copy)]
pub struct SystemUseRecord<'a> {
    signature: Signature,
    version: u8,
    bytes: &'a [u8],
}

impl<'a> SystemUseRecord<'a> {
    /// Frame the record starting at `offset` inside `area`
    ///
    /// Returns `Ok(None)` when the range is exhausted and
    /// [`SuspError::Structural`] when the declared length is below 4 or runs
    /// past the end of `area`.
    pub fn frame(area: &'a [u8], offset: usize) -> Result<Option<Self>> {
        let rest = match area.get(offset..) {
            Some(rest) if rest.len() >= MIN_FRAMEABLE => rest,
            _ => return Ok(None),
        };

        let length = rest[2] as usize;
        if length < HEADER_LEN || length > rest.len() {
            return Err(SuspError::Structural { offset });
        }

        Ok(Some(Self {
            signature: Signature::from_bytes([rest[0], rest[1]]),
            version: rest[3],
            bytes: &rest[..length],
        }))
    }

    /// Record signature
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Declared length, header included
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Never true for a framed record; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Record version byte
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Whole record, header included
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Bytes after the 4-byte header
    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[HEADER_LEN..]
    }

    /// Byte at absolute record offset `at`
    pub fn byte(&self, at: usize) -> Option<u8> {
        self.bytes.get(at).copied()
    }

    /// Little-endian half of the both-endian 32-bit field at `at`
    ///
    /// The big-endian half is not cross-checked.
    pub fn both_endian_u32(&self, at: usize) -> Option<u32> {
        let raw = self.bytes.get(at..at + 8)?;
        Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    /// Reject unless the version byte is 1
    pub fn expect_version(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SuspError::BadVersion {
                signature: self.signature,
                version: self.version,
            });
        }
        Ok(())
    }

    /// Reject unless the declared length is exactly `length` and the version is 1
    pub fn expect_exact(&self, length: usize) -> Result<()> {
        if self.len() != length {
            return Err(self.bad_length());
        }
        self.expect_version()
    }

    /// Reject unless the declared length is at least `length` and the version is 1
    pub fn expect_at_least(&self, length: usize) -> Result<()> {
        if self.len() < length {
            return Err(self.bad_length());
        }
        self.expect_version()
    }

    /// `BadLength` error for this record
    pub fn bad_length(&self) -> SuspError {
        SuspError::BadLength {
            signature: self.signature,
            length: self.len() as u8,
        }
    }
}

/// Iterator over the records of one range
///
/// Yields `(offset, record)` pairs in buffer order. A structural error is
/// yielded once and ends the iteration.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    area: &'a [u8],
    offset: usize,
    done: bool,
}

impl<'a> Records<'a> {
    /// Walk `area` from its first byte
    pub fn new(area: &'a [u8]) -> Self {
        Self::starting_at(area, 0)
    }

    /// Walk `area` from `offset`
    pub fn starting_at(area: &'a [u8], offset: usize) -> Self {
        Self {
            area,
            offset,
            done: false,
        }
    }

    /// Offset of the next record to be framed
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<(usize, SystemUseRecord<'a>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match SystemUseRecord::frame(self.area, self.offset) {
            Ok(Some(record)) => {
                let at = self.offset;
                self.offset += record.len();
                Some(Ok((at, record)))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl core::iter::FusedIterator for Records<'_> {}
