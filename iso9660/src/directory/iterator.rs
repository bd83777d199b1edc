//! Directory iteration
//!
//! Iterator for reading directory entries sequentially. On volumes that
//! carry SUSP every entry's System Use area is run through the extension
//! decoder, and the Rock Ridge view (NM names, relocation) replaces the
//! plain ISO9660 one.

use crate::directory::record::DirectoryRecord;
use crate::error::{Iso9660Error, Result};
use crate::extensions::rock_ridge::RockRidgeEntry;
use crate::extensions::susp::{
    Diagnostic, DiagnosticSink, Dispatcher, RecursionBudget, SuspState,
};
use crate::types::{FileEntry, VolumeInfo, SECTOR_SIZE};
use crate::utils::string;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;

/// Directory iterator
pub struct DirectoryIterator<'a, B: BlockIo> {
    block_io: &'a mut B,
    extent_lba: u32,
    extent_len: u32,
    offset: usize,
    current_sector: Box<[u8; SECTOR_SIZE]>,
    current_sector_lba: Option<u64>,
    susp: Option<SuspState>,
}

impl<'a, B: BlockIo> DirectoryIterator<'a, B> {
    /// Create new directory iterator over the extent at `extent_lba`
    pub fn new(block_io: &'a mut B, volume: &VolumeInfo, extent_lba: u32, extent_len: u32) -> Self {
        let susp = volume
            .susp_skip
            .map(|skip| SuspState::resume(volume.xa1, skip, volume.has_rock_ridge));

        Self {
            block_io,
            extent_lba,
            extent_len,
            offset: 0,
            current_sector: Box::new([0u8; SECTOR_SIZE]),
            current_sector_lba: None,
            susp,
        }
    }

    /// Route extension diagnostics for this directory to `sink`
    ///
    /// Has no effect on volumes without SUSP.
    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.susp = self.susp.map(|state| state.with_sink(sink));
        self
    }
}

/// Run one entry's System Use area through the dispatcher
///
/// Each entry gets its own recursion budget.
fn decode_entry<B: BlockIo>(block_io: &mut B, state: &mut SuspState, system_use: &[u8]) -> RockRidgeEntry {
    let mut entry = RockRidgeEntry::new();
    let mut budget = RecursionBudget::new();

    let result = Dispatcher::new(block_io, state, &mut entry, &mut budget).run(system_use);
    if let Err(e) = result {
        state.report(Diagnostic::RecordRejected(e));
    }

    entry
}

/// Read the `.` record of a relocated directory and return its extent length
fn child_extent_len<B: BlockIo>(block_io: &mut B, lba: u32) -> Result<u32> {
    let mut sector = vec![0u8; SECTOR_SIZE];
    block_io
        .read_blocks(Lba(lba as u64), &mut sector)
        .map_err(|_| Iso9660Error::IoError)?;

    let dot = DirectoryRecord::parse(&sector)?;
    if !dot.is_dot_entry() || !dot.is_directory() {
        return Err(Iso9660Error::InvalidDirectoryRecord);
    }
    Ok(dot.get_data_length())
}

fn iso_name(file_id: &[u8]) -> String {
    match string::dchars_to_str(file_id) {
        // Strip version suffix (e.g., ";1")
        Ok(s) => String::from(string::strip_version(s)),
        Err(_) => String::from_utf8_lossy(file_id).into_owned(),
    }
}

impl<'a, B: BlockIo> Iterator for DirectoryIterator<'a, B> {
    type Item = Result<FileEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // Check if we've read all directory data
            if self.offset >= self.extent_len as usize {
                return None;
            }

            // Calculate current LBA and offset within sector
            let sector_offset = self.offset / SECTOR_SIZE;
            let lba = self.extent_lba as u64 + sector_offset as u64;
            let offset_in_sector = self.offset % SECTOR_SIZE;

            // Read sector if needed
            if self.current_sector_lba != Some(lba) {
                if self.block_io.read_blocks(Lba(lba), self.current_sector.as_mut()).is_err() {
                    return Some(Err(Iso9660Error::IoError));
                }
                self.current_sector_lba = Some(lba);
            }

            let sector_data = &self.current_sector[offset_in_sector..];

            // Zero-length record: rest of this sector is padding
            if sector_data.is_empty() || sector_data[0] == 0 {
                self.offset = (sector_offset + 1) * SECTOR_SIZE;
                continue;
            }

            let record = match DirectoryRecord::parse(sector_data) {
                Ok(r) => r,
                Err(e) => {
                    // length can't be trusted; records never span sectors
                    self.offset = (sector_offset + 1) * SECTOR_SIZE;
                    return Some(Err(e));
                }
            };

            self.offset += record.length as usize;

            if record.is_dot_entry() {
                continue;
            }

            let mut entry = FileEntry {
                name: iso_name(record.file_identifier()),
                size: record.get_data_length() as u64,
                extent_lba: record.get_extent_lba(),
                data_length: record.get_data_length(),
                flags: record.get_flags(),
                file_unit_size: record.file_unit_size,
                interleave_gap: record.interleave_gap,
                rock_ridge: None,
            };

            let Some(state) = self.susp.as_mut() else {
                return Some(Ok(entry));
            };

            let rock_ridge = decode_entry(&mut *self.block_io, state, record.system_use());

            // relocated directories are listed through their CL stub instead
            if state.uses_rock_ridge() && rock_ridge.relocated {
                continue;
            }

            if let Some(name) = rock_ridge.name_str().filter(|n| !n.is_empty()) {
                entry.name = name.into_owned();
            }

            if let Some(child) = rock_ridge.child_link {
                match child_extent_len(&mut *self.block_io, child) {
                    Ok(len) => {
                        entry.extent_lba = child;
                        entry.data_length = len;
                        entry.size = len as u64;
                        entry.flags.directory = true;
                    }
                    Err(_) => state.report(Diagnostic::ChildLinkRejected { target: child }),
                }
            }

            entry.rock_ridge = Some(rock_ridge);
            return Some(Ok(entry));
        }
    }
}
