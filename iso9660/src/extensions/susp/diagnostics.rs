//! Soft warnings raised while decoding System Use areas
//!
//! Real-world discs break the SUSP rules in small ways all the time, so
//! nothing in here changes what gets decoded. A [`DiagnosticSink`] can be
//! installed on [`SuspState`](super::protocol::SuspState) to observe them, and
//! with the `trace` feature every diagnostic is also emitted as a `tracing`
//! event under the `iso9660::susp` target.

use super::error::SuspError;
use super::signature::Signature;

/// Target name for tracing events
#[cfg(feature = "trace")]
const SUSP_TARGET: &str = "iso9660::susp";

/// A non-fatal observation made by the decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The first record of a root node was not SP
    SpNotFirst {
        /// Signature found instead
        found: Signature,
    },
    /// SP check bytes were not `BE EF`
    SpCheckBytes {
        /// Bytes found
        found: [u8; 2],
    },
    /// A root-only record appeared outside the root node
    RootOnlyRecord {
        /// Offending signature
        signature: Signature,
    },
    /// ER string lengths do not add up to the record length
    ErLengthMismatch {
        /// Declared record length
        length: u8,
        /// Sum of the three string lengths
        strings: usize,
    },
    /// More than one CE in a single range
    MultipleContinuations {
        /// Number of CE records seen so far in this range
        count: u32,
    },
    /// A record was rejected and skipped
    RecordRejected(SuspError),
    /// A continuation area could not be decoded
    ContinuationFailed(SuspError),
    /// A CL record pointed somewhere that is not a directory; the entry is
    /// listed as found, without following the link
    ChildLinkRejected {
        /// Location the CL record pointed at
        target: u32,
    },
    /// An NM or SL fragment was dropped because its buffer could not grow
    FragmentDropped {
        /// Signature of the dropped fragment
        signature: Signature,
        /// Bytes that were not appended
        len: usize,
    },
    /// CD-ROM XA extended attributes found ahead of the SUSP records
    Xa1Attributes {
        /// Owner group
        gid: u16,
        /// Owner user
        uid: u16,
        /// XA attribute bits
        attributes: u16,
        /// Whether the block carried the `XA` signature
        signed: bool,
        /// Interleaved file number
        file_number: u8,
    },
    /// Amiga protection bits from an AS record
    AmigaProtection {
        /// User flags byte
        user: u8,
        /// Multi-user flags byte
        multi_user: u8,
        /// Protection bits
        protection: u8,
    },
    /// Amiga file comment fragment from an AS record
    AmigaComment {
        /// Comment bytes in this fragment
        len: usize,
    },
}

/// Receiver for decoder diagnostics
pub trait DiagnosticSink {
    /// Called once per diagnostic, in decode order
    fn report(&mut self, diagnostic: &Diagnostic);
}

/// Report `diagnostic` to the tracing bridge
#[cfg(feature = "trace")]
#[inline]
pub(crate) fn trace_diagnostic(diagnostic: &Diagnostic) {
    match diagnostic {
        Diagnostic::Xa1Attributes { .. }
        | Diagnostic::AmigaProtection { .. }
        | Diagnostic::AmigaComment { .. } => {
            tracing::debug!(target: SUSP_TARGET, diagnostic = ?diagnostic, "susp_info");
        }
        _ => {
            tracing::warn!(target: SUSP_TARGET, diagnostic = ?diagnostic, "susp_warning");
        }
    }
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "trace"))]
#[inline]
pub(crate) fn trace_diagnostic(_diagnostic: &Diagnostic) {}

/// Trace entry into a dispatcher invocation
#[cfg(feature = "trace")]
#[inline]
pub(crate) fn trace_invocation(len: usize, root: bool, recursive: bool, charged: u32) {
    tracing::trace!(
        target: SUSP_TARGET,
        len = len,
        root = root,
        recursive = recursive,
        charged = charged,
        "susp_dispatch"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "trace"))]
#[inline]
pub(crate) fn trace_invocation(_len: usize, _root: bool, _recursive: bool, _charged: u32) {}

/// Trace a continuation jump
#[cfg(feature = "trace")]
#[inline]
pub(crate) fn trace_continuation(block: u32, offset: u32, length: u32) {
    tracing::trace!(
        target: SUSP_TARGET,
        block = block,
        offset = offset,
        length = length,
        "susp_continuation"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "trace"))]
#[inline]
pub(crate) fn trace_continuation(_block: u32, _offset: u32, _length: u32) {}
