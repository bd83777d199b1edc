//! SUSP housekeeping records and per-volume protocol state
//!
//! SP, ST, PD, ER and ES carry no file metadata. They switch SUSP on for a
//! volume, set how many bytes to skip at the start of each System Use area,
//! terminate a range, and announce which extensions the disc uses.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::diagnostics::{trace_diagnostic, Diagnostic, DiagnosticSink};
use super::dispatch::DecodeContext;
use super::error::{Result, SuspError};
use super::record::SystemUseRecord;

/// SP record length
pub const SP_LEN: usize = 7;

/// SP check bytes
pub const SP_CHECK: [u8; 2] = [0xBE, 0xEF];

/// ST record length
pub const ST_LEN: usize = 4;

/// Minimum ER record length
pub const ER_MIN_LEN: usize = 8;

/// Minimum ES record length
pub const ES_MIN_LEN: usize = 5;

/// Identifiers announcing Rock Ridge in an ER record
const RRIP_IDENTIFIERS: [&[u8]; 3] = [b"RRIP_1991A", b"IEEE_P1282", b"IEEE_1282"];

/// Per-volume SUSP state
///
/// Created when a volume is mounted and resumed for each directory walk.
/// Nothing in here is reset during a walk.
pub struct SuspState {
    rock_ridge: bool,
    susp_present: bool,
    skip_bytes: u8,
    xa1: bool,
    extensions: Vec<ExtensionReference>,
    extension_sequence: Option<u8>,
    sink: Option<Box<dyn DiagnosticSink>>,
}

impl SuspState {
    /// Fresh state; `xa1` tells the dispatcher an XA1 block precedes each area
    pub fn new(xa1: bool) -> Self {
        Self {
            rock_ridge: false,
            susp_present: false,
            skip_bytes: 0,
            xa1,
            extensions: Vec::new(),
            extension_sequence: None,
            sink: None,
        }
    }

    /// State for a volume whose root SP has already been decoded
    pub fn resume(xa1: bool, skip_bytes: u8, rock_ridge: bool) -> Self {
        Self {
            rock_ridge,
            susp_present: true,
            skip_bytes,
            ..Self::new(xa1)
        }
    }

    /// Start framing records `skip_bytes` into each area until an SP says otherwise
    pub fn with_skip_bytes(mut self, skip_bytes: u8) -> Self {
        self.skip_bytes = skip_bytes;
        self
    }

    /// Install a diagnostic sink
    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Remove the installed sink so it can be handed to another state
    pub(crate) fn take_sink(&mut self) -> Option<Box<dyn DiagnosticSink>> {
        self.sink.take()
    }

    /// Whether any Rock Ridge record has been decoded
    pub fn rock_ridge(&self) -> bool {
        self.rock_ridge
    }

    /// Whether an SP record has been accepted
    pub fn susp_present(&self) -> bool {
        self.susp_present
    }

    /// Bytes skipped at the start of every non-recursive area
    pub fn skip_bytes(&self) -> u8 {
        self.skip_bytes
    }

    /// Whether an XA1 block precedes each System Use area
    pub fn xa1(&self) -> bool {
        self.xa1
    }

    /// Extensions announced by ER records, in disc order
    pub fn extensions(&self) -> &[ExtensionReference] {
        &self.extensions
    }

    /// Extension sequence selected by the last ES record
    pub fn extension_sequence(&self) -> Option<u8> {
        self.extension_sequence
    }

    /// Whether Rock Ridge was seen directly or announced through ER
    pub fn uses_rock_ridge(&self) -> bool {
        self.rock_ridge || self.extensions.iter().any(ExtensionReference::is_rock_ridge)
    }

    pub(crate) fn mark_rock_ridge(&mut self) {
        self.rock_ridge = true;
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        trace_diagnostic(&diagnostic);
        if let Some(sink) = self.sink.as_mut() {
            sink.report(&diagnostic);
        }
    }
}

impl Default for SuspState {
    fn default() -> Self {
        Self::new(false)
    }
}

impl fmt::Debug for SuspState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuspState")
            .field("rock_ridge", &self.rock_ridge)
            .field("susp_present", &self.susp_present)
            .field("skip_bytes", &self.skip_bytes)
            .field("xa1", &self.xa1)
            .field("extensions", &self.extensions)
            .field("extension_sequence", &self.extension_sequence)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

/// One extension announced by an ER record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionReference {
    /// Extension identifier, e.g. `RRIP_1991A`
    pub identifier: String,
    /// Human readable description
    pub descriptor: String,
    /// Where the extension is specified
    pub source: String,
    /// Extension version
    pub version: u8,
}

impl ExtensionReference {
    /// Whether this extension is one of the Rock Ridge identifiers
    pub fn is_rock_ridge(&self) -> bool {
        RRIP_IDENTIFIERS
            .iter()
            .any(|id| self.identifier.as_bytes() == *id)
    }
}

/// SP: SUSP indicator, carries the skip-byte count
pub(crate) fn decode_sp(ctx: &mut DecodeContext<'_>, record: &SystemUseRecord<'_>) -> Result<()> {
    record.expect_exact(SP_LEN)?;

    if !ctx.root {
        ctx.protocol.report(Diagnostic::RootOnlyRecord {
            signature: record.signature(),
        });
        return Ok(());
    }

    let bytes = record.as_bytes();
    let check = [bytes[4], bytes[5]];
    if check != SP_CHECK {
        ctx.protocol.report(Diagnostic::SpCheckBytes { found: check });
    }

    ctx.protocol.skip_bytes = bytes[6];
    ctx.protocol.susp_present = true;
    Ok(())
}

/// ST: validate a terminator; the dispatcher stops regardless
pub(crate) fn check_terminator(record: &SystemUseRecord<'_>) -> Result<()> {
    record.expect_exact(ST_LEN)
}

/// PD: padding, nothing to decode
pub(crate) fn decode_pd(_ctx: &mut DecodeContext<'_>, record: &SystemUseRecord<'_>) -> Result<()> {
    record.expect_version()
}

/// ER: register an extension
pub(crate) fn decode_er(ctx: &mut DecodeContext<'_>, record: &SystemUseRecord<'_>) -> Result<()> {
    record.expect_at_least(ER_MIN_LEN)?;

    if !ctx.root {
        ctx.protocol.report(Diagnostic::RootOnlyRecord {
            signature: record.signature(),
        });
        return Ok(());
    }

    let bytes = record.as_bytes();
    let id_len = bytes[4] as usize;
    let des_len = bytes[5] as usize;
    let src_len = bytes[6] as usize;
    let version = bytes[7];

    let strings = id_len + des_len + src_len;
    if strings != record.len() - ER_MIN_LEN {
        ctx.protocol.report(Diagnostic::ErLengthMismatch {
            length: record.len() as u8,
            strings,
        });
    }

    let body = &bytes[ER_MIN_LEN..];
    if strings > body.len() {
        return Err(SuspError::Truncated {
            signature: record.signature(),
        });
    }

    let (identifier, rest) = body.split_at(id_len);
    let (descriptor, rest) = rest.split_at(des_len);
    let source = &rest[..src_len];

    ctx.protocol.extensions.push(ExtensionReference {
        identifier: String::from_utf8_lossy(identifier).into_owned(),
        descriptor: String::from_utf8_lossy(descriptor).into_owned(),
        source: String::from_utf8_lossy(source).into_owned(),
        version,
    });
    Ok(())
}

/// ES: select the extension the following records belong to
pub(crate) fn decode_es(ctx: &mut DecodeContext<'_>, record: &SystemUseRecord<'_>) -> Result<()> {
    record.expect_at_least(ES_MIN_LEN)?;

    if !ctx.root {
        ctx.protocol.report(Diagnostic::RootOnlyRecord {
            signature: record.signature(),
        });
        return Ok(());
    }

    ctx.protocol.extension_sequence = Some(record.as_bytes()[4]);
    Ok(())
}
