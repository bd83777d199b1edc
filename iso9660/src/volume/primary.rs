//! Primary Volume Descriptor parsing
//!
//! The Primary Volume Descriptor (PVD) is always present and describes
//! the basic ISO9660 filesystem structure. Only the fields the reader
//! needs are lifted out; multi-byte both-endian fields are read from
//! their little-endian half.

use crate::error::{Iso9660Error, Result};
use crate::types::{VolumeDescriptorType, SECTOR_SIZE};

/// Standard identifier at bytes 1..6 of every descriptor
pub const STANDARD_ID: &[u8; 5] = b"CD001";

/// CD-ROM XA signature inside the PVD application-use area
pub const XA_SIGNATURE: &[u8; 8] = b"CD-XA001";

/// Byte offset of [`XA_SIGNATURE`] in the PVD
pub const XA_SIGNATURE_OFFSET: usize = 1024;

const VOLUME_ID: usize = 40;
const VOLUME_SPACE_SIZE: usize = 80;
const LOGICAL_BLOCK_SIZE: usize = 128;
const ROOT_RECORD: usize = 156;
const ROOT_RECORD_LEN: usize = 34;

/// Primary Volume Descriptor (sector 16, type 1)
///
/// See ECMA-119 8.4 for full specification
#[derive(Debug, Clone)]
pub struct PrimaryVolumeDescriptor {
    /// Volume identifier (32 d-characters)
    pub volume_id: [u8; 32],

    /// Volume space size in logical blocks
    pub volume_space_size: u32,

    /// Logical block size (usually 2048)
    pub logical_block_size: u16,

    /// Root directory record (34 bytes)
    pub root_directory_record: [u8; ROOT_RECORD_LEN],

    /// "CD-XA001" found at byte 1024
    pub xa: bool,
}

fn le_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn le_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

/// Parse Primary Volume Descriptor from sector data
pub fn parse(data: &[u8]) -> Result<PrimaryVolumeDescriptor> {
    if data.len() < SECTOR_SIZE {
        return Err(Iso9660Error::InvalidSignature);
    }

    if VolumeDescriptorType::from_code(data[0]) != Some(VolumeDescriptorType::Primary) {
        return Err(Iso9660Error::InvalidSignature);
    }

    if &data[1..6] != STANDARD_ID {
        return Err(Iso9660Error::InvalidSignature);
    }

    if data[6] != 1 {
        return Err(Iso9660Error::UnsupportedVersion);
    }

    let mut volume_id = [0u8; 32];
    volume_id.copy_from_slice(&data[VOLUME_ID..VOLUME_ID + 32]);

    let mut root_directory_record = [0u8; ROOT_RECORD_LEN];
    root_directory_record.copy_from_slice(&data[ROOT_RECORD..ROOT_RECORD + ROOT_RECORD_LEN]);

    let xa_end = XA_SIGNATURE_OFFSET + XA_SIGNATURE.len();

    Ok(PrimaryVolumeDescriptor {
        volume_id,
        volume_space_size: le_u32(data, VOLUME_SPACE_SIZE),
        logical_block_size: le_u16(data, LOGICAL_BLOCK_SIZE),
        root_directory_record,
        xa: &data[XA_SIGNATURE_OFFSET..xa_end] == XA_SIGNATURE,
    })
}
