//! Volume descriptor parsing
//!
//! ISO9660 volume descriptors start at sector 16 and describe the filesystem layout.
//! Only the Primary descriptor is interpreted; the root directory's `.` entry
//! is then decoded once to find out whether the volume speaks SUSP / Rock Ridge.

pub mod primary;

use crate::directory::record::DirectoryRecord;
use crate::error::{Iso9660Error, Result};
use crate::extensions::rock_ridge::RockRidgeEntry;
use crate::extensions::susp::dispatch::XA1_BLOCK_LEN;
use crate::extensions::susp::{Diagnostic, DiagnosticSink, Dispatcher, RecursionBudget, SuspState};
use crate::types::{VolumeDescriptorType, VolumeInfo, SECTOR_SIZE, VOLUME_DESCRIPTOR_START};
use alloc::boxed::Box;
use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;

/// Upper bound on descriptors scanned before giving up on a terminator
const MAX_DESCRIPTORS: u64 = 100;

/// Mount an ISO9660 volume from a block device
///
/// Reads volume descriptors starting at sector 16 and builds VolumeInfo.
///
/// # Arguments
/// * `block_io` - Block device containing the ISO
/// * `start_sector` - Starting sector of the ISO (0 if raw ISO)
///
/// # Returns
/// Parsed volume information, with `susp_skip` and `has_rock_ridge` filled
/// in from the root directory's System Use area
pub fn mount<B: BlockIo>(block_io: &mut B, start_sector: u64) -> Result<VolumeInfo> {
    mount_inner(block_io, start_sector, None)
}

/// Mount like [`mount`], reporting root SUSP diagnostics to `sink`
pub fn mount_with_sink<B: BlockIo>(
    block_io: &mut B,
    start_sector: u64,
    sink: Box<dyn DiagnosticSink>,
) -> Result<VolumeInfo> {
    mount_inner(block_io, start_sector, Some(sink))
}

fn mount_inner<B: BlockIo>(
    block_io: &mut B,
    start_sector: u64,
    sink: Option<Box<dyn DiagnosticSink>>,
) -> Result<VolumeInfo> {
    let mut buffer = [0u8; SECTOR_SIZE];
    let mut volume_info: Option<VolumeInfo> = None;

    for sector in VOLUME_DESCRIPTOR_START..VOLUME_DESCRIPTOR_START + MAX_DESCRIPTORS {
        block_io
            .read_blocks(Lba(start_sector + sector), &mut buffer)
            .map_err(|_| Iso9660Error::IoError)?;

        let header = VolumeDescriptorHeader::parse(&buffer)?;

        match VolumeDescriptorType::from_code(header.type_code) {
            Some(VolumeDescriptorType::Primary) if volume_info.is_none() => {
                let pvd = primary::parse(&buffer)?;
                let root_record = DirectoryRecord::parse(&pvd.root_directory_record)?;

                volume_info = Some(VolumeInfo {
                    volume_id: pvd.volume_id,
                    root_extent_lba: root_record.get_extent_lba(),
                    root_extent_len: root_record.get_data_length(),
                    logical_block_size: pvd.logical_block_size,
                    volume_space_size: pvd.volume_space_size,
                    xa1: pvd.xa,
                    susp_skip: None,
                    has_rock_ridge: false,
                });
            }
            Some(VolumeDescriptorType::Terminator) => break,
            _ => {}
        }
    }

    let mut volume = volume_info.ok_or(Iso9660Error::InvalidSignature)?;
    detect_susp(block_io, &mut volume, sink)?;
    Ok(volume)
}

/// Decode the root `.` entry and record what its SP / ER records announce
///
/// XA volumes put a 14-byte XA1 block ahead of the SUSP records, so when the
/// first pass finds no SP the root is decoded again starting past that block.
fn detect_susp<B: BlockIo>(
    block_io: &mut B,
    volume: &mut VolumeInfo,
    mut sink: Option<Box<dyn DiagnosticSink>>,
) -> Result<()> {
    let mut sector = [0u8; SECTOR_SIZE];
    block_io
        .read_blocks(Lba(volume.root_extent_lba as u64), &mut sector)
        .map_err(|_| Iso9660Error::IoError)?;

    let dot = DirectoryRecord::parse(&sector)?;
    let system_use = dot.system_use();

    let xa_offset = volume.xa1.then_some(XA1_BLOCK_LEN as u8);

    for offset in core::iter::once(0).chain(xa_offset) {
        let mut state = SuspState::new(volume.xa1).with_skip_bytes(offset);
        if let Some(sink) = sink.take() {
            state = state.with_sink(sink);
        }
        let mut entry = RockRidgeEntry::new();
        let mut budget = RecursionBudget::new();

        // a framing error past SP still leaves a usable state
        let result = Dispatcher::new(block_io, &mut state, &mut entry, &mut budget)
            .in_root(true)
            .run(system_use);
        if let Err(e) = result {
            state.report(Diagnostic::RecordRejected(e));
        }

        if state.susp_present() {
            volume.susp_skip = Some(offset.saturating_add(state.skip_bytes()));
            volume.has_rock_ridge = state.uses_rock_ridge();
            return Ok(());
        }
        sink = state.take_sink();
    }

    Ok(())
}

/// Volume Descriptor header (first 7 bytes of each descriptor)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeDescriptorHeader {
    /// Type code (0=boot, 1=primary, 2=supplementary, 255=terminator)
    pub type_code: u8,

    /// Version (always 1)
    pub version: u8,
}

impl VolumeDescriptorHeader {
    /// Read and validate the header at the start of `data`
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 7 || &data[1..6] != primary::STANDARD_ID || data[6] != 1 {
            return Err(Iso9660Error::InvalidSignature);
        }
        Ok(Self {
            type_code: data[0],
            version: data[6],
        })
    }
}
