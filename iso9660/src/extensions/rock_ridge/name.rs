//! NM (alternate name) records
//!
//! Long names are split over as many NM records as needed, each but the last
//! flagged CONTINUE. Payloads are appended verbatim; the flags only matter to
//! callers that want to tell `.`/`..` placeholders apart.

use bitflags::bitflags;

use crate::extensions::susp::diagnostics::Diagnostic;
use crate::extensions::susp::dispatch::DecodeContext;
use crate::extensions::susp::error::{Result, SuspError};
use crate::extensions::susp::record::SystemUseRecord;

/// Minimum NM length: header plus flags byte
pub const NM_MIN_LEN: usize = 5;

bitflags! {
    /// NM flags byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NameFlags: u8 {
        /// Name continues in the next NM record
        const CONTINUE = 1 << 0;
        /// Refers to the current directory
        const CURRENT = 1 << 1;
        /// Refers to the parent directory
        const PARENT = 1 << 2;
        /// Reserved
        const RESERVED = 1 << 3;
        /// Network node name of the local host
        const HOST = 1 << 5;
    }
}

pub(crate) fn decode_nm(ctx: &mut DecodeContext<'_>, record: &SystemUseRecord<'_>) -> Result<()> {
    record.expect_at_least(NM_MIN_LEN)?;

    let flags = NameFlags::from_bits_retain(record.as_bytes()[4]);
    let fragment = &record.as_bytes()[NM_MIN_LEN..];

    match ctx.entry.append_name(fragment) {
        Ok(()) => {}
        Err(SuspError::AllocationFailure) => {
            ctx.protocol.report(Diagnostic::FragmentDropped {
                signature: record.signature(),
                len: fragment.len(),
            });
        }
        Err(e) => return Err(e),
    }

    ctx.entry.name_flags = flags;
    Ok(())
}
