//! Common types and constants for ISO9660

use alloc::string::String;

use crate::extensions::rock_ridge::{PosixAttributes, RockRidgeEntry};

/// ISO9660 sector size (always 2048 bytes)
pub const SECTOR_SIZE: usize = 2048;

/// Volume descriptor set starts at sector 16
pub const VOLUME_DESCRIPTOR_START: u64 = 16;

/// Maximum directory depth
pub const MAX_DIRECTORY_DEPTH: usize = 8;

/// Volume descriptor type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VolumeDescriptorType {
    /// Boot Record (El Torito)
    BootRecord = 0,
    /// Primary Volume Descriptor
    Primary = 1,
    /// Supplementary Volume Descriptor (Joliet)
    Supplementary = 2,
    /// Volume Partition Descriptor
    Partition = 3,
    /// Volume Descriptor Set Terminator
    Terminator = 255,
}

impl VolumeDescriptorType {
    /// Map a type code byte
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::BootRecord),
            1 => Some(Self::Primary),
            2 => Some(Self::Supplementary),
            3 => Some(Self::Partition),
            255 => Some(Self::Terminator),
            _ => None,
        }
    }
}

/// Parsed volume information
#[derive(Debug, Clone)]
pub struct VolumeInfo {
    /// Volume identifier (32 chars)
    pub volume_id: [u8; 32],

    /// Root directory extent location (LBA)
    pub root_extent_lba: u32,

    /// Root directory extent length (bytes)
    pub root_extent_len: u32,

    /// Logical block size (usually 2048)
    pub logical_block_size: u16,

    /// Volume space size (total sectors)
    pub volume_space_size: u32,

    /// CD-ROM XA volume: every System Use area starts with an XA1 block
    pub xa1: bool,

    /// SP skip-byte count, `Some` when the root entry carries SUSP
    pub susp_skip: Option<u8>,

    /// Whether Rock Ridge extensions are present
    pub has_rock_ridge: bool,
}

/// File entry metadata
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// File identifier (Rock Ridge name if present, else ISO9660 name)
    pub name: String,

    /// File size in bytes
    pub size: u64,

    /// Extent location (LBA)
    pub extent_lba: u32,

    /// Data length (bytes)
    pub data_length: u32,

    /// File flags
    pub flags: FileFlags,

    /// File unit size (interleaved files)
    pub file_unit_size: u8,

    /// Interleave gap size
    pub interleave_gap: u8,

    /// Decoded Rock Ridge attributes, if the volume uses SUSP
    pub rock_ridge: Option<RockRidgeEntry>,
}

impl FileEntry {
    /// Get file name as string
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Is this a directory?
    pub fn is_directory(&self) -> bool {
        self.flags.directory
    }

    /// POSIX attributes from PX
    pub fn posix(&self) -> Option<&PosixAttributes> {
        self.rock_ridge.as_ref()?.posix.as_ref()
    }

    /// Is this a Rock Ridge symbolic link?
    pub fn is_symlink(&self) -> bool {
        self.rock_ridge.as_ref().is_some_and(RockRidgeEntry::is_symlink)
    }

    /// Symlink target rendered from SL components
    pub fn symlink_target(&self) -> Option<String> {
        self.rock_ridge.as_ref()?.symlink_target()
    }
}

/// File flags from directory record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFlags {
    /// Hidden file
    pub hidden: bool,

    /// Directory (not a file)
    pub directory: bool,

    /// Associated file
    pub associated: bool,

    /// Extended attribute record format
    pub extended_format: bool,

    /// Owner/group permissions in extended attributes
    pub extended_permissions: bool,

    /// Not final directory record for this file
    pub not_final: bool,
}
