//! Error types for System Use decoding

use core::fmt;

use super::signature::Signature;

/// Result type for SUSP / Rock Ridge decoding
pub type Result<T> = core::result::Result<T, SuspError>;

/// Errors raised while decoding a System Use area
///
/// Only [`SuspError::Structural`] and [`SuspError::RecursionLimitExceeded`]
/// can escape a top-level dispatcher call. Everything else is record-local
/// and is reported as a diagnostic while decoding carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspError {
    /// A record header declared a length below 4 or past the end of the range
    Structural {
        /// Byte offset of the offending record inside its range
        offset: usize,
    },

    /// Record length does not match what its signature requires
    BadLength {
        /// Record signature
        signature: Signature,
        /// Declared record length
        length: u8,
    },

    /// Record version is not 1
    BadVersion {
        /// Record signature
        signature: Signature,
        /// Declared record version
        version: u8,
    },

    /// Record is too short for the fields its flags announce
    Truncated {
        /// Record signature
        signature: Signature,
    },

    /// Continuation area points outside its sector
    InvalidContinuation,

    /// Reading a continuation sector failed
    IoError,

    /// Session-wide recursion budget is spent
    RecursionLimitExceeded,

    /// An accumulation buffer could not grow
    AllocationFailure,
}

impl fmt::Display for SuspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural { offset } => {
                write!(f, "Malformed system use record at offset {}", offset)
            }
            Self::BadLength { signature, length } => {
                write!(f, "{} record has invalid length {}", signature, length)
            }
            Self::BadVersion { signature, version } => {
                write!(f, "{} record has unsupported version {}", signature, version)
            }
            Self::Truncated { signature } => write!(f, "{} record is truncated", signature),
            Self::InvalidContinuation => write!(f, "Continuation area outside its sector"),
            Self::IoError => write!(f, "I/O error reading continuation area"),
            Self::RecursionLimitExceeded => write!(f, "System use recursion limit exceeded"),
            Self::AllocationFailure => write!(f, "Out of memory growing Rock Ridge buffer"),
        }
    }
}
