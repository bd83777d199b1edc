//! Error types for ISO9660 operations

use core::fmt;

use crate::extensions::susp::SuspError;

/// Result type for ISO9660 operations
pub type Result<T> = core::result::Result<T, Iso9660Error>;

/// Errors that can occur during ISO9660 operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iso9660Error {
    /// I/O error reading from block device
    IoError,

    /// Invalid volume descriptor signature
    InvalidSignature,

    /// Unsupported ISO9660 version
    UnsupportedVersion,

    /// Corrupted directory record
    InvalidDirectoryRecord,

    /// File or directory not found
    NotFound,

    /// Path is too long
    PathTooLong,

    /// Rock Ridge / SUSP decoding failed
    RockRidgeError(SuspError),
}

impl From<SuspError> for Iso9660Error {
    fn from(err: SuspError) -> Self {
        match err {
            SuspError::IoError => Self::IoError,
            other => Self::RockRidgeError(other),
        }
    }
}

impl fmt::Display for Iso9660Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError => write!(f, "I/O error reading block device"),
            Self::InvalidSignature => write!(f, "Invalid volume descriptor signature"),
            Self::UnsupportedVersion => write!(f, "Unsupported ISO9660 version"),
            Self::InvalidDirectoryRecord => write!(f, "Corrupted directory record"),
            Self::NotFound => write!(f, "File or directory not found"),
            Self::PathTooLong => write!(f, "Path exceeds maximum length"),
            Self::RockRidgeError(err) => write!(f, "Rock Ridge extension error: {}", err),
        }
    }
}
