//! TF (time stamp) records

use bitflags::bitflags;

use crate::extensions::susp::dispatch::DecodeContext;
use crate::extensions::susp::error::{Result, SuspError};
use crate::extensions::susp::record::SystemUseRecord;
use crate::utils::datetime::{DateTime17, DateTime7};

/// TF header: 4-byte record header plus the flags byte
pub const TF_HEADER_LEN: usize = 5;

bitflags! {
    /// TF flags byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TimestampFlags: u8 {
        /// Creation time present
        const CREATION = 1 << 0;
        /// Modification time present
        const MODIFY = 1 << 1;
        /// Last access time present
        const ACCESS = 1 << 2;
        /// Attribute change time present
        const ATTRIBUTES = 1 << 3;
        /// Backup time present
        const BACKUP = 1 << 4;
        /// Expiration time present
        const EXPIRATION = 1 << 5;
        /// Effective time present
        const EFFECTIVE = 1 << 6;
        /// Every field uses the 17-byte form
        const LONG_FORM = 1 << 7;
    }
}

/// Field order on disc
const FIELD_ORDER: [TimestampFlags; 7] = [
    TimestampFlags::CREATION,
    TimestampFlags::MODIFY,
    TimestampFlags::ACCESS,
    TimestampFlags::ATTRIBUTES,
    TimestampFlags::BACKUP,
    TimestampFlags::EXPIRATION,
    TimestampFlags::EFFECTIVE,
];

/// One TF field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// 7-byte binary form
    Short(DateTime7),
    /// 17-byte ASCII form
    Long(DateTime17),
}

impl Timestamp {
    fn decode(raw: &[u8]) -> Option<Self> {
        match raw.len() {
            DateTime7::LEN => {
                let bytes: &[u8; 7] = raw.try_into().ok()?;
                Some(Self::Short(DateTime7::from_bytes(bytes)))
            }
            DateTime17::LEN => {
                let bytes: &[u8; 17] = raw.try_into().ok()?;
                DateTime17::from_bytes(bytes).map(Self::Long)
            }
            _ => None,
        }
    }
}

/// Time stamps collected from TF records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timestamps {
    /// Creation
    pub created: Option<Timestamp>,
    /// Last modification
    pub modified: Option<Timestamp>,
    /// Last access
    pub accessed: Option<Timestamp>,
    /// Last attribute change
    pub attributes: Option<Timestamp>,
    /// Last backup
    pub backup: Option<Timestamp>,
    /// Expiration
    pub expiration: Option<Timestamp>,
    /// Effective
    pub effective: Option<Timestamp>,
}

impl Timestamps {
    /// Decode a TF record
    ///
    /// The record must be long enough for every field its flags announce;
    /// a short record is rejected before any field is read. A long-form field
    /// with non-digit characters is consumed but left as `None`.
    pub fn parse(record: &SystemUseRecord<'_>) -> Result<Self> {
        record.expect_at_least(TF_HEADER_LEN)?;

        let flags = TimestampFlags::from_bits_retain(record.as_bytes()[4]);
        let width = if flags.contains(TimestampFlags::LONG_FORM) {
            DateTime17::LEN
        } else {
            DateTime7::LEN
        };
        let present = FIELD_ORDER.iter().filter(|f| flags.contains(**f)).count();

        let required = TF_HEADER_LEN + present * width;
        if record.len() < required {
            return Err(SuspError::Truncated {
                signature: record.signature(),
            });
        }

        let mut raw = record.as_bytes()[TF_HEADER_LEN..required].chunks_exact(width);
        let mut fields = [None; 7];
        for (slot, flag) in fields.iter_mut().zip(FIELD_ORDER) {
            if flags.contains(flag) {
                *slot = raw.next().and_then(Timestamp::decode);
            }
        }

        let [created, modified, accessed, attributes, backup, expiration, effective] = fields;
        Ok(Self {
            created,
            modified,
            accessed,
            attributes,
            backup,
            expiration,
            effective,
        })
    }

    /// Overwrite the fields present in `other`
    pub fn merge(&mut self, other: &Self) {
        let pairs = [
            (&mut self.created, other.created),
            (&mut self.modified, other.modified),
            (&mut self.accessed, other.accessed),
            (&mut self.attributes, other.attributes),
            (&mut self.backup, other.backup),
            (&mut self.expiration, other.expiration),
            (&mut self.effective, other.effective),
        ];
        for (dst, src) in pairs {
            if src.is_some() {
                *dst = src;
            }
        }
    }
}

pub(crate) fn decode_tf(ctx: &mut DecodeContext<'_>, record: &SystemUseRecord<'_>) -> Result<()> {
    let stamps = Timestamps::parse(record)?;
    ctx.entry.timestamps.merge(&stamps);
    Ok(())
}
