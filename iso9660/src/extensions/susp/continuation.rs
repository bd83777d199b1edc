//! Continuation areas (CE)
//!
//! A CE record moves the rest of an entry's System Use data to another
//! sector. The pointer comes straight off the disc, so it is bounds-checked
//! against the sector before anything is read, and the dispatcher charges
//! every jump to the session's recursion budget.

use alloc::vec;
use alloc::vec::Vec;
use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;

use super::diagnostics::trace_continuation;
use super::error::{Result, SuspError};
use super::record::SystemUseRecord;
use crate::types::SECTOR_SIZE;

/// CE record length
pub const CE_LEN: usize = 28;

/// Decoded CE record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuationArea {
    /// Sector holding the continuation
    pub block: u32,
    /// Byte offset of the continuation inside that sector
    pub offset: u32,
    /// Continuation length in bytes
    pub length: u32,
}

impl ContinuationArea {
    /// Decode and validate a CE record
    ///
    /// `Ok(None)` means the record points at an empty area and should be
    /// ignored. An area that leaves its sector is rejected.
    pub fn parse(record: &SystemUseRecord<'_>) -> Result<Option<Self>> {
        record.expect_exact(CE_LEN)?;

        let (block, offset, length) = match (
            record.both_endian_u32(4),
            record.both_endian_u32(12),
            record.both_endian_u32(20),
        ) {
            (Some(block), Some(offset), Some(length)) => (block, offset, length),
            _ => return Err(record.bad_length()),
        };

        if offset as usize > SECTOR_SIZE {
            return Err(SuspError::InvalidContinuation);
        }
        if length == 0 {
            return Ok(None);
        }
        if offset as u64 + length as u64 > SECTOR_SIZE as u64 {
            return Err(SuspError::InvalidContinuation);
        }

        Ok(Some(Self {
            block,
            offset,
            length,
        }))
    }

    /// Read the continuation bytes from the disc
    ///
    /// The scratch sector is dropped before returning; only the
    /// `[offset, offset + length)` slice is kept.
    pub fn fetch<B: BlockIo>(&self, disc: &mut B) -> Result<Vec<u8>> {
        trace_continuation(self.block, self.offset, self.length);

        let mut sector = vec![0u8; SECTOR_SIZE];
        disc.read_blocks(Lba(self.block as u64), &mut sector)
            .map_err(|_| SuspError::IoError)?;

        let start = self.offset as usize;
        let end = start.saturating_add(self.length as usize);
        sector
            .get(start..end)
            .map(<[u8]>::to_vec)
            .ok_or(SuspError::InvalidContinuation)
    }
}
