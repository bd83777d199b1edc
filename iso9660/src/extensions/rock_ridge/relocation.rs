//! CL, PL and RE records: directory relocation
//!
//! ISO9660 caps directory depth at 8. Rock Ridge works around it by moving a
//! deep directory somewhere shallow (marked RE), leaving a file stub in the
//! original place that points to it (CL), and pointing the moved
//! directory's `..` back at its logical parent (PL).

use crate::extensions::susp::dispatch::DecodeContext;
use crate::extensions::susp::error::Result;
use crate::extensions::susp::record::SystemUseRecord;

/// CL and PL record length
pub const LINK_LEN: usize = 12;

/// RE record length
pub const RE_LEN: usize = 4;

fn link_target(record: &SystemUseRecord<'_>) -> Result<u32> {
    record.expect_exact(LINK_LEN)?;
    record.both_endian_u32(4).ok_or_else(|| record.bad_length())
}

pub(crate) fn decode_cl(ctx: &mut DecodeContext<'_>, record: &SystemUseRecord<'_>) -> Result<()> {
    ctx.entry.child_link = Some(link_target(record)?);
    Ok(())
}

pub(crate) fn decode_pl(ctx: &mut DecodeContext<'_>, record: &SystemUseRecord<'_>) -> Result<()> {
    ctx.entry.parent_link = Some(link_target(record)?);
    Ok(())
}

pub(crate) fn decode_re(ctx: &mut DecodeContext<'_>, record: &SystemUseRecord<'_>) -> Result<()> {
    record.expect_exact(RE_LEN)?;
    ctx.entry.relocated = true;
    Ok(())
}
