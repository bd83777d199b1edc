//! Two-character System Use record signatures

use core::fmt;

/// Known System Use record signatures
///
/// SUSP housekeeping records come first, then RRIP, then vendor records.
/// Anything else is kept as [`Signature::Unknown`] and skipped by the
/// dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signature {
    /// Continuation area
    Ce,
    /// Padding
    Pd,
    /// SUSP indicator
    Sp,
    /// SUSP terminator
    St,
    /// Extensions reference
    Er,
    /// Extension selector
    Es,
    /// POSIX file attributes
    Px,
    /// POSIX device number
    Pn,
    /// Symbolic link
    Sl,
    /// Alternate name
    Nm,
    /// Child link
    Cl,
    /// Parent link
    Pl,
    /// Relocated directory
    Re,
    /// Time stamps
    Tf,
    /// Rock Ridge extensions in use (RRIP 1.09)
    Rr,
    /// Amiga file attributes
    As,
    /// Unrecognised signature
    Unknown([u8; 2]),
}

impl Signature {
    /// Classify a raw two-byte signature
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        match &bytes {
            b"CE" => Self::Ce,
            b"PD" => Self::Pd,
            b"SP" => Self::Sp,
            b"ST" => Self::St,
            b"ER" => Self::Er,
            b"ES" => Self::Es,
            b"PX" => Self::Px,
            b"PN" => Self::Pn,
            b"SL" => Self::Sl,
            b"NM" => Self::Nm,
            b"CL" => Self::Cl,
            b"PL" => Self::Pl,
            b"RE" => Self::Re,
            b"TF" => Self::Tf,
            b"RR" => Self::Rr,
            b"AS" => Self::As,
            _ => Self::Unknown(bytes),
        }
    }

    /// Raw signature bytes as stored on disc
    pub const fn as_bytes(&self) -> [u8; 2] {
        match self {
            Self::Ce => *b"CE",
            Self::Pd => *b"PD",
            Self::Sp => *b"SP",
            Self::St => *b"ST",
            Self::Er => *b"ER",
            Self::Es => *b"ES",
            Self::Px => *b"PX",
            Self::Pn => *b"PN",
            Self::Sl => *b"SL",
            Self::Nm => *b"NM",
            Self::Cl => *b"CL",
            Self::Pl => *b"PL",
            Self::Re => *b"RE",
            Self::Tf => *b"TF",
            Self::Rr => *b"RR",
            Self::As => *b"AS",
            Self::Unknown(raw) => *raw,
        }
    }

    /// Whether this record belongs to the Rock Ridge set
    pub const fn is_rock_ridge(&self) -> bool {
        matches!(
            self,
            Self::Px
                | Self::Pn
                | Self::Sl
                | Self::Nm
                | Self::Cl
                | Self::Pl
                | Self::Re
                | Self::Tf
                | Self::Rr
        )
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b] = self.as_bytes();
        if a.is_ascii_graphic() && b.is_ascii_graphic() {
            write!(f, "{}{}", a as char, b as char)
        } else {
            write!(f, "{:02X}{:02X}", a, b)
        }
    }
}
