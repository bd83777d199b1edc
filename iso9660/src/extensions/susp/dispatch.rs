//! System Use dispatcher
//!
//! Walks one directory entry's System Use area, hands every record to its
//! decoder, and follows CE records into continuation sectors.
//!
//! CE jumps are executed with an explicit frame stack instead of host
//! recursion: entering a continuation pushes a frame, finishing it pops back
//! to the record after the CE. Records are therefore decoded in exactly the
//! order a recursive walk would produce, while the host stack stays flat no
//! matter how long (or cyclic) the CE chain on the disc is. The only bound
//! on the work done is the shared [`RecursionBudget`].

use alloc::vec;
use alloc::vec::Vec;
use gpt_disk_io::BlockIo;

use super::continuation::ContinuationArea;
use super::diagnostics::{trace_invocation, Diagnostic};
use super::error::{Result, SuspError};
use super::protocol::{self, SuspState};
use super::record::{Records, SystemUseRecord};
use super::signature::Signature;
use crate::extensions::amiga;
use crate::extensions::rock_ridge::{self, name, posix, relocation, symlink, timestamps, RockRidgeEntry};

/// Maximum number of dispatcher invocations per session
pub const RECURSION_LIMIT: u32 = 1000;

/// Size of the CD-ROM XA extended attribute block
pub const XA1_BLOCK_LEN: usize = 14;

/// Session-wide cap on dispatcher invocations
///
/// Charged once for every top-level call and once for every continuation
/// entered. It is never refunded, so it bounds total work rather than depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecursionBudget {
    charged: u32,
    limit: u32,
}

impl RecursionBudget {
    /// Budget with the standard limit of [`RECURSION_LIMIT`]
    pub const fn new() -> Self {
        Self::with_limit(RECURSION_LIMIT)
    }

    /// Budget with a custom limit
    pub const fn with_limit(limit: u32) -> Self {
        Self { charged: 0, limit }
    }

    /// Charge one invocation
    pub fn charge(&mut self) -> Result<()> {
        self.charged = self.charged.saturating_add(1);
        if self.charged > self.limit {
            return Err(SuspError::RecursionLimitExceeded);
        }
        Ok(())
    }

    /// Invocations charged so far, including a refused one
    pub fn charged(&self) -> u32 {
        self.charged
    }

    /// Whether an invocation has been refused
    pub fn is_exhausted(&self) -> bool {
        self.charged > self.limit
    }
}

impl Default for RecursionBudget {
    fn default() -> Self {
        Self::new()
    }
}

/// How a successful walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Ran out of bytes
    Exhausted,
    /// Stopped at an ST record
    Terminated,
}

/// What a record decoder gets to touch
pub struct DecodeContext<'c> {
    /// Per-volume protocol state
    pub protocol: &'c mut SuspState,
    /// Entry being decoded
    pub entry: &'c mut RockRidgeEntry,
    /// Whether the entry is the root directory's `.` record
    pub root: bool,
}

impl<'c> DecodeContext<'c> {
    /// Bundle decoder state
    pub fn new(protocol: &'c mut SuspState, entry: &'c mut RockRidgeEntry, root: bool) -> Self {
        Self {
            protocol,
            entry,
            root,
        }
    }
}

/// Uniform record decoder signature
pub type Handler = fn(&mut DecodeContext<'_>, &SystemUseRecord<'_>) -> Result<()>;

/// Decoders keyed by signature
///
/// CE and ST change control flow and are handled by [`Dispatcher`] itself.
static DISPATCH_TABLE: &[(Signature, Handler)] = &[
    (Signature::Sp, protocol::decode_sp),
    (Signature::Pd, protocol::decode_pd),
    (Signature::Er, protocol::decode_er),
    (Signature::Es, protocol::decode_es),
    (Signature::Px, posix::decode_px),
    (Signature::Pn, posix::decode_pn),
    (Signature::Tf, timestamps::decode_tf),
    (Signature::Sl, symlink::decode_sl),
    (Signature::Nm, name::decode_nm),
    (Signature::Cl, relocation::decode_cl),
    (Signature::Pl, relocation::decode_pl),
    (Signature::Re, relocation::decode_re),
    (Signature::Rr, rock_ridge::decode_rr),
    (Signature::As, amiga::decode_as),
];

/// Look up the decoder for `signature`
pub fn handler_for(signature: Signature) -> Option<Handler> {
    DISPATCH_TABLE
        .iter()
        .find(|(sig, _)| *sig == signature)
        .map(|(_, handler)| *handler)
}

/// Decode one leaf record into `ctx`
///
/// Unknown signatures are skipped. A Rock Ridge record that decodes cleanly
/// marks the volume as using Rock Ridge.
pub fn dispatch_record(ctx: &mut DecodeContext<'_>, record: &SystemUseRecord<'_>) -> Result<()> {
    let signature = record.signature();
    let Some(handler) = handler_for(signature) else {
        return Ok(());
    };

    handler(ctx, record)?;

    if signature.is_rock_ridge() {
        ctx.protocol.mark_rock_ridge();
    }
    Ok(())
}

/// Bytes a frame walks over
enum Area<'a> {
    Borrowed(&'a [u8]),
    Continuation(Vec<u8>),
}

impl Area<'_> {
    fn as_slice(&self) -> &[u8] {
        match self {
            Self::Borrowed(bytes) => bytes,
            Self::Continuation(bytes) => bytes,
        }
    }
}

/// One dispatcher invocation in flight
struct Frame<'a> {
    area: Area<'a>,
    cursor: usize,
    continuations: u32,
}

impl<'a> Frame<'a> {
    fn new(area: Area<'a>, cursor: usize) -> Self {
        Self {
            area,
            cursor,
            continuations: 0,
        }
    }
}

/// Result of decoding one record
enum Step {
    Next,
    Enter(ContinuationArea),
    Leave(Result<Completion>),
}

/// Walks System Use areas for one directory entry
///
/// ```ignore
/// let mut state = SuspState::new(volume.xa1);
/// let mut entry = RockRidgeEntry::new();
/// let mut budget = RecursionBudget::new();
///
/// Dispatcher::new(&mut disc, &mut state, &mut entry, &mut budget)
///     .in_root(true)
///     .run(system_use)?;
/// ```
pub struct Dispatcher<'d, B: BlockIo> {
    disc: &'d mut B,
    protocol: &'d mut SuspState,
    entry: &'d mut RockRidgeEntry,
    budget: &'d mut RecursionBudget,
    root: bool,
    records_seen: u32,
}

impl<'d, B: BlockIo> Dispatcher<'d, B> {
    /// Dispatcher for a non-root entry
    pub fn new(
        disc: &'d mut B,
        protocol: &'d mut SuspState,
        entry: &'d mut RockRidgeEntry,
        budget: &'d mut RecursionBudget,
    ) -> Self {
        Self {
            disc,
            protocol,
            entry,
            budget,
            root: false,
            records_seen: 0,
        }
    }

    /// Mark the entry as the root directory's `.` record
    pub fn in_root(mut self, root: bool) -> Self {
        self.root = root;
        self
    }

    /// Decode `area`, following continuations
    ///
    /// Returns `Err` only when this top-level walk itself is refused by the
    /// budget or hits a framing error. Failures inside continuation areas are
    /// reported as diagnostics; whatever was decoded before any failure stays
    /// in the entry.
    pub fn run(&mut self, area: &[u8]) -> Result<Completion> {
        self.charge(area.len(), false)?;

        let start = self.leading_skip(area);
        let mut frames = vec![Frame::new(Area::Borrowed(area), start)];
        let mut outcome = Ok(Completion::Exhausted);

        while let Some(frame) = frames.last_mut() {
            match self.step(frame) {
                Step::Next => {}
                Step::Enter(continuation) => match self.enter(&continuation) {
                    Ok(frame) => frames.push(frame),
                    Err(e) => self.protocol.report(Diagnostic::ContinuationFailed(e)),
                },
                Step::Leave(result) => {
                    frames.pop();
                    if frames.is_empty() {
                        outcome = result;
                    } else if let Err(e) = result {
                        self.protocol.report(Diagnostic::ContinuationFailed(e));
                    }
                }
            }
        }

        outcome
    }

    fn charge(&mut self, len: usize, recursive: bool) -> Result<()> {
        self.budget.charge()?;
        trace_invocation(len, self.root, recursive, self.budget.charged());
        Ok(())
    }

    /// Report an XA1 block if present and return where records start
    fn leading_skip(&mut self, area: &[u8]) -> usize {
        if self.protocol.xa1() && area.len() >= XA1_BLOCK_LEN {
            let xa = &area[..XA1_BLOCK_LEN];
            self.protocol.report(Diagnostic::Xa1Attributes {
                gid: u16::from_be_bytes([xa[0], xa[1]]),
                uid: u16::from_be_bytes([xa[2], xa[3]]),
                attributes: u16::from_be_bytes([xa[4], xa[5]]),
                signed: &xa[6..8] == b"XA",
                file_number: xa[8],
            });
        }

        (self.protocol.skip_bytes() as usize).min(area.len())
    }

    fn enter(&mut self, continuation: &ContinuationArea) -> Result<Frame<'static>> {
        self.charge(continuation.length as usize, true)?;
        let bytes = continuation.fetch(self.disc)?;
        Ok(Frame::new(Area::Continuation(bytes), 0))
    }

    fn step(&mut self, frame: &mut Frame<'_>) -> Step {
        let mut records = Records::starting_at(frame.area.as_slice(), frame.cursor);
        let record = match records.next() {
            Some(Ok((_, record))) => record,
            Some(Err(e)) => return Step::Leave(Err(e)),
            None => return Step::Leave(Ok(Completion::Exhausted)),
        };
        frame.cursor = records.offset();

        self.check_first_record(record.signature());

        match record.signature() {
            Signature::St => {
                if let Err(e) = protocol::check_terminator(&record) {
                    self.protocol.report(Diagnostic::RecordRejected(e));
                }
                Step::Leave(Ok(Completion::Terminated))
            }
            Signature::Ce => {
                frame.continuations += 1;
                if frame.continuations > 1 {
                    self.protocol.report(Diagnostic::MultipleContinuations {
                        count: frame.continuations,
                    });
                }
                match ContinuationArea::parse(&record) {
                    Ok(Some(continuation)) => Step::Enter(continuation),
                    Ok(None) => Step::Next,
                    Err(e) => {
                        self.protocol.report(Diagnostic::RecordRejected(e));
                        Step::Next
                    }
                }
            }
            _ => {
                let mut ctx = DecodeContext::new(self.protocol, self.entry, self.root);
                if let Err(e) = dispatch_record(&mut ctx, &record) {
                    self.protocol.report(Diagnostic::RecordRejected(e));
                }
                Step::Next
            }
        }
    }

    /// SUSP wants SP as the very first record of the root entry
    fn check_first_record(&mut self, signature: Signature) {
        if self.root && self.records_seen == 0 && signature != Signature::Sp {
            self.protocol.report(Diagnostic::SpNotFirst { found: signature });
        }
        self.records_seen = self.records_seen.saturating_add(1);
    }
}
