//! Rock Ridge extension support
//!
//! Rock Ridge adds POSIX filesystem semantics (permissions, symlinks, long names)
//! on top of SUSP. Every decoder in here folds one record into a
//! [`RockRidgeEntry`]; NM and SL fragments accumulate across records and
//! across continuation areas in encounter order.

pub mod name;
pub mod posix;
pub mod relocation;
pub mod symlink;
pub mod timestamps;

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use crate::extensions::susp::dispatch::DecodeContext;
use crate::extensions::susp::error::{Result, SuspError};
use crate::extensions::susp::record::SystemUseRecord;

pub use name::NameFlags;
pub use posix::{DeviceNumber, PosixAttributes};
pub use symlink::{ComponentFlags, SymlinkComponent, SymlinkComponents};
pub use timestamps::{Timestamp, Timestamps};

/// RR record length (RRIP 1.09)
pub const RR_LEN: usize = 5;

/// Everything Rock Ridge says about one directory entry
///
/// Starts empty and is filled in by the dispatcher. The symlink and name
/// buffers are only ever appended to, so their contents always reflect the
/// order in which records were found on disc.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RockRidgeEntry {
    /// PX attributes
    pub posix: Option<PosixAttributes>,

    /// PN device number
    pub device: Option<DeviceNumber>,

    /// TF time stamps
    pub timestamps: Timestamps,

    /// CL target: this entry is a stub for a directory relocated there
    pub child_link: Option<u32>,

    /// PL target: this directory's `..` lives there
    pub parent_link: Option<u32>,

    /// RE: this directory was moved here and should be hidden
    pub relocated: bool,

    /// Flags of the last NM record
    pub name_flags: NameFlags,

    symlink: Vec<u8>,
    name: Vec<u8>,
}

impl RockRidgeEntry {
    /// Empty entry
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any record touched this entry
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Augmented directory stub (CL seen)
    pub fn is_augmented_directory(&self) -> bool {
        self.child_link.is_some()
    }

    /// `..` redirected (PL seen)
    pub fn dotdot_redirected(&self) -> bool {
        self.parent_link.is_some()
    }

    /// Alternate name without its NUL terminator
    pub fn name(&self) -> Option<&[u8]> {
        self.name.split_last().map(|(_, name)| name)
    }

    /// Alternate name buffer including its NUL terminator
    pub fn name_buffer(&self) -> &[u8] {
        &self.name
    }

    /// Alternate name as text, invalid UTF-8 replaced
    pub fn name_str(&self) -> Option<Cow<'_, str>> {
        self.name().map(String::from_utf8_lossy)
    }

    /// Raw SL component bytes, exactly as found on disc
    pub fn symlink_bytes(&self) -> &[u8] {
        &self.symlink
    }

    /// Whether any SL component was decoded
    pub fn is_symlink(&self) -> bool {
        !self.symlink.is_empty()
    }

    /// Iterate SL components
    pub fn symlink_components(&self) -> SymlinkComponents<'_> {
        SymlinkComponents::new(&self.symlink)
    }

    /// Render the symlink target as a POSIX path
    pub fn symlink_target(&self) -> Option<String> {
        if self.symlink.is_empty() {
            return None;
        }
        Some(symlink::render_target(self.symlink_components()))
    }

    /// Creation time from TF
    pub fn created(&self) -> Option<&Timestamp> {
        self.timestamps.created.as_ref()
    }

    /// Append an NM fragment and re-terminate the name buffer
    ///
    /// The buffer is left untouched if it cannot grow.
    pub(crate) fn append_name(&mut self, fragment: &[u8]) -> Result<()> {
        let terminated = !self.name.is_empty();
        let additional = fragment.len() + usize::from(!terminated);
        self.name
            .try_reserve(additional)
            .map_err(|_| SuspError::AllocationFailure)?;

        if terminated {
            self.name.pop();
        }
        self.name.extend_from_slice(fragment);
        self.name.push(0);
        Ok(())
    }

    /// Append one validated SL component, header included
    pub(crate) fn append_symlink(&mut self, component: &[u8]) -> Result<()> {
        self.symlink
            .try_reserve(component.len())
            .map_err(|_| SuspError::AllocationFailure)?;
        self.symlink.extend_from_slice(component);
        Ok(())
    }
}

/// RR: Rock Ridge in use; flags are advisory and ignored
pub(crate) fn decode_rr(_ctx: &mut DecodeContext<'_>, record: &SystemUseRecord<'_>) -> Result<()> {
    record.expect_exact(RR_LEN)
}
