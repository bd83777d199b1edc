//! PX (POSIX attributes) and PN (device number) records

use crate::extensions::susp::dispatch::DecodeContext;
use crate::extensions::susp::error::Result;
use crate::extensions::susp::record::SystemUseRecord;

/// PX length before RRIP 1.12 (no inode)
pub const PX_LEN: usize = 36;

/// PX length with the serial number field
pub const PX_LEN_WITH_INODE: usize = 44;

/// PN record length
pub const PN_LEN: usize = 20;

/// File type mask of `st_mode`
pub const S_IFMT: u32 = 0o170000;
/// Directory
pub const S_IFDIR: u32 = 0o040000;
/// Regular file
pub const S_IFREG: u32 = 0o100000;
/// Symbolic link
pub const S_IFLNK: u32 = 0o120000;
/// Character device
pub const S_IFCHR: u32 = 0o020000;
/// Block device
pub const S_IFBLK: u32 = 0o060000;

/// POSIX file attributes (PX entry)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosixAttributes {
    /// File mode (`st_mode`)
    pub mode: u32,

    /// Number of links (`st_nlink`)
    pub links: u32,

    /// User ID
    pub uid: u32,

    /// Group ID
    pub gid: u32,

    /// File serial number, only in 44-byte records
    pub inode: Option<u32>,
}

impl PosixAttributes {
    /// Decode a PX record
    pub fn parse(record: &SystemUseRecord<'_>) -> Result<Self> {
        let inode = match record.len() {
            PX_LEN => false,
            PX_LEN_WITH_INODE => true,
            _ => return Err(record.bad_length()),
        };
        record.expect_version()?;

        let field = |at: usize| record.both_endian_u32(at).ok_or_else(|| record.bad_length());

        Ok(Self {
            mode: field(4)?,
            links: field(12)?,
            uid: field(20)?,
            gid: field(28)?,
            inode: if inode { Some(field(36)?) } else { None },
        })
    }

    /// File type bits
    pub fn file_type(&self) -> u32 {
        self.mode & S_IFMT
    }

    /// Permission bits, including setuid/setgid/sticky
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }

    /// Is this a directory?
    pub fn is_directory(&self) -> bool {
        self.file_type() == S_IFDIR
    }

    /// Is this a symbolic link?
    pub fn is_symlink(&self) -> bool {
        self.file_type() == S_IFLNK
    }

    /// Is this a block or character device?
    pub fn is_device(&self) -> bool {
        matches!(self.file_type(), S_IFCHR | S_IFBLK)
    }
}

/// POSIX device number (PN entry)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceNumber {
    /// High 32 bits (major)
    pub major: u32,

    /// Low 32 bits (minor)
    pub minor: u32,
}

impl DeviceNumber {
    /// Decode a PN record
    pub fn parse(record: &SystemUseRecord<'_>) -> Result<Self> {
        record.expect_exact(PN_LEN)?;

        let field = |at: usize| record.both_endian_u32(at).ok_or_else(|| record.bad_length());

        Ok(Self {
            major: field(4)?,
            minor: field(12)?,
        })
    }
}

pub(crate) fn decode_px(ctx: &mut DecodeContext<'_>, record: &SystemUseRecord<'_>) -> Result<()> {
    ctx.entry.posix = Some(PosixAttributes::parse(record)?);
    Ok(())
}

pub(crate) fn decode_pn(ctx: &mut DecodeContext<'_>, record: &SystemUseRecord<'_>) -> Result<()> {
    ctx.entry.device = Some(DeviceNumber::parse(record)?);
    Ok(())
}
