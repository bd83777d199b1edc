//! System Use Sharing Protocol (SUSP)
//!
//! SUSP turns the System Use field at the end of each directory record into
//! a list of tagged records. This module frames those records, handles the
//! protocol's own housekeeping records (SP, ST, PD, ER, ES), follows CE
//! continuation areas, and routes everything else to the extension decoders.
//!
//! Everything here reads untrusted disc data. Declared lengths are checked
//! before use, CE chains are bounded by a [`RecursionBudget`], and record
//! level problems turn into [`Diagnostic`]s instead of errors.

pub mod continuation;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod record;
pub mod signature;

pub use continuation::ContinuationArea;
pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use dispatch::{Completion, DecodeContext, Dispatcher, RecursionBudget, RECURSION_LIMIT};
pub use error::SuspError;
pub use protocol::{ExtensionReference, SuspState};
pub use record::{Records, SystemUseRecord};
pub use signature::Signature;
