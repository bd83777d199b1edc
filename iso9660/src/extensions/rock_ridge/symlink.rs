//! SL (symbolic link) records
//!
//! An SL payload is a run of component sub-records:
//!
//! ```text
//! +-------+-----+------------------+
//! | flags | len | content (len)    |
//! +-------+-----+------------------+
//! ```
//!
//! Components are copied raw into the entry, one validated component at a
//! time, so a link split over several SL records (or over a continuation
//! area) ends up byte-identical to one written in a single record.

use alloc::string::String;
use bitflags::bitflags;

use crate::extensions::susp::diagnostics::Diagnostic;
use crate::extensions::susp::dispatch::DecodeContext;
use crate::extensions::susp::error::{Result, SuspError};
use crate::extensions::susp::record::SystemUseRecord;

/// Minimum SL length
pub const SL_MIN_LEN: usize = 6;

/// Offset of the first component
const SL_PAYLOAD: usize = 5;

/// Component header: flags + length
const COMPONENT_HEADER: usize = 2;

bitflags! {
    /// SL component flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ComponentFlags: u8 {
        /// Component continues in the next component
        const CONTINUE = 1 << 0;
        /// `.`
        const CURRENT = 1 << 1;
        /// `..`
        const PARENT = 1 << 2;
        /// `/`
        const ROOT = 1 << 3;
        /// Reserved (historically volume root)
        const VOLUME_ROOT = 1 << 4;
        /// Reserved (historically host name)
        const HOST = 1 << 5;
    }
}

/// One SL component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymlinkComponent<'a> {
    /// Component flags
    pub flags: ComponentFlags,
    /// Component text; empty for `.`, `..` and `/`
    pub content: &'a [u8],
}

/// Iterator over raw SL component bytes
#[derive(Debug, Clone)]
pub struct SymlinkComponents<'a> {
    rest: &'a [u8],
}

impl<'a> SymlinkComponents<'a> {
    /// Iterate components in `raw`
    pub fn new(raw: &'a [u8]) -> Self {
        Self { rest: raw }
    }
}

impl<'a> Iterator for SymlinkComponents<'a> {
    type Item = SymlinkComponent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (component, rest) = split_component(self.rest)?;
        self.rest = rest;
        Some(SymlinkComponent {
            flags: ComponentFlags::from_bits_retain(component[0]),
            content: &component[COMPONENT_HEADER..],
        })
    }
}

/// Split the first whole component off `bytes`
fn split_component(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let len = *bytes.get(1)? as usize;
    let end = COMPONENT_HEADER + len;
    if end > bytes.len() {
        return None;
    }
    Some(bytes.split_at(end))
}

/// Join components into a path
pub(crate) fn render_target(components: SymlinkComponents<'_>) -> String {
    let mut target = String::new();
    let mut separate = false;

    for component in components {
        if component.flags.contains(ComponentFlags::ROOT) {
            target.clear();
            target.push('/');
            separate = false;
            continue;
        }

        if separate {
            target.push('/');
        }

        if component.flags.contains(ComponentFlags::CURRENT) {
            target.push('.');
        } else if component.flags.contains(ComponentFlags::PARENT) {
            target.push_str("..");
        } else {
            target.push_str(&String::from_utf8_lossy(component.content));
        }

        separate = !component.flags.contains(ComponentFlags::CONTINUE);
    }

    target
}

pub(crate) fn decode_sl(ctx: &mut DecodeContext<'_>, record: &SystemUseRecord<'_>) -> Result<()> {
    record.expect_at_least(SL_MIN_LEN)?;

    let mut rest = &record.as_bytes()[SL_PAYLOAD..];
    while !rest.is_empty() {
        let Some((component, tail)) = split_component(rest) else {
            ctx.protocol.report(Diagnostic::RecordRejected(SuspError::Truncated {
                signature: record.signature(),
            }));
            break;
        };

        match ctx.entry.append_symlink(component) {
            Ok(()) => {}
            Err(SuspError::AllocationFailure) => {
                ctx.protocol.report(Diagnostic::FragmentDropped {
                    signature: record.signature(),
                    len: rest.len(),
                });
                break;
            }
            Err(e) => return Err(e),
        }

        rest = tail;
    }

    Ok(())
}
