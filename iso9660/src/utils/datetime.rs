//! Date/time parsing
//!
//! ISO9660 has two datetime formats: 7-byte and 17-byte. Rock Ridge TF
//! records reuse both.

/// 7-byte directory record datetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime7 {
    /// Years since 1900
    pub year: u8,

    /// Month (1-12)
    pub month: u8,

    /// Day (1-31)
    pub day: u8,

    /// Hour (0-23)
    pub hour: u8,

    /// Minute (0-59)
    pub minute: u8,

    /// Second (0-59)
    pub second: u8,

    /// GMT offset in 15-minute intervals (-48 to +52)
    pub gmt_offset: i8,
}

impl DateTime7 {
    /// Encoded size
    pub const LEN: usize = 7;

    /// Parse from 7-byte array
    pub fn from_bytes(bytes: &[u8; 7]) -> Self {
        Self {
            year: bytes[0],
            month: bytes[1],
            day: bytes[2],
            hour: bytes[3],
            minute: bytes[4],
            second: bytes[5],
            gmt_offset: bytes[6] as i8,
        }
    }

    /// Get full year (1900 + year)
    pub fn full_year(&self) -> u16 {
        1900 + self.year as u16
    }
}

/// 17-byte ASCII datetime (volume descriptors, long-form TF)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime17 {
    /// Year (4 ASCII digits)
    pub year: u16,

    /// Month (2 ASCII digits, 1-12)
    pub month: u8,

    /// Day (2 ASCII digits, 1-31)
    pub day: u8,

    /// Hour (2 ASCII digits, 0-23)
    pub hour: u8,

    /// Minute (2 ASCII digits, 0-59)
    pub minute: u8,

    /// Second (2 ASCII digits, 0-59)
    pub second: u8,

    /// Hundredths (2 ASCII digits)
    pub hundredths: u8,

    /// GMT offset in 15-minute intervals
    pub gmt_offset: i8,
}

impl DateTime17 {
    /// Encoded size
    pub const LEN: usize = 17;

    /// Parse from 17-byte ASCII string
    ///
    /// Returns `None` if any digit position holds something other than an
    /// ASCII digit. The all-zero-digits "not specified" value parses to a
    /// year of 0; see [`DateTime17::is_unspecified`].
    pub fn from_bytes(bytes: &[u8; 17]) -> Option<Self> {
        Some(Self {
            year: ascii_number(&bytes[0..4])?,
            month: ascii_number(&bytes[4..6])? as u8,
            day: ascii_number(&bytes[6..8])? as u8,
            hour: ascii_number(&bytes[8..10])? as u8,
            minute: ascii_number(&bytes[10..12])? as u8,
            second: ascii_number(&bytes[12..14])? as u8,
            hundredths: ascii_number(&bytes[14..16])? as u8,
            gmt_offset: bytes[16] as i8,
        })
    }

    /// Whether every field is zero ("date and time not specified")
    pub fn is_unspecified(&self) -> bool {
        self.year == 0 && self.month == 0 && self.day == 0
    }
}

fn ascii_number(digits: &[u8]) -> Option<u16> {
    digits.iter().try_fold(0u16, |acc, &d| {
        if d.is_ascii_digit() {
            Some(acc * 10 + (d - b'0') as u16)
        } else {
            None
        }
    })
}
