//! Amiga AS records
//!
//! AS carries AmigaDOS protection bits and file comments. Nothing downstream
//! consumes them, so they are only surfaced as diagnostics.

use bitflags::bitflags;

use crate::extensions::susp::diagnostics::Diagnostic;
use crate::extensions::susp::dispatch::DecodeContext;
use crate::extensions::susp::error::{Result, SuspError};
use crate::extensions::susp::record::SystemUseRecord;

/// Minimum AS length: header plus flags byte
pub const AS_MIN_LEN: usize = 5;

/// Size of the protection field
const PROTECTION_LEN: usize = 4;

bitflags! {
    /// AS flags byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AmigaFlags: u8 {
        /// Protection field present
        const PROTECTION = 1 << 0;
        /// Comment field present
        const COMMENT = 1 << 1;
        /// Comment continues in the next AS record
        const COMMENT_CONTINUE = 1 << 2;
    }
}

pub(crate) fn decode_as(ctx: &mut DecodeContext<'_>, record: &SystemUseRecord<'_>) -> Result<()> {
    record.expect_at_least(AS_MIN_LEN)?;

    let truncated = SuspError::Truncated {
        signature: record.signature(),
    };
    let flags = AmigaFlags::from_bits_retain(record.as_bytes()[4]);
    let mut rest = &record.as_bytes()[AS_MIN_LEN..];

    if flags.contains(AmigaFlags::PROTECTION) {
        let protection = rest.get(..PROTECTION_LEN).ok_or(truncated)?;
        ctx.protocol.report(Diagnostic::AmigaProtection {
            user: protection[0],
            multi_user: protection[2],
            protection: protection[3],
        });
        rest = &rest[PROTECTION_LEN..];
    }

    if flags.contains(AmigaFlags::COMMENT) {
        // length byte counts itself
        let len = *rest.first().ok_or(truncated)? as usize;
        if len == 0 || len > rest.len() {
            return Err(truncated);
        }
        ctx.protocol.report(Diagnostic::AmigaComment { len: len - 1 });
    }

    Ok(())
}
