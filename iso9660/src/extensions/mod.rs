//! ISO9660 extensions carried in directory record System Use areas
//!
//! - [`susp`] frames System Use records, follows continuation areas and
//!   dispatches records to their decoders
//! - [`rock_ridge`] decodes the RRIP records into a [`RockRidgeEntry`]
//! - [`amiga`] understands the Amiga `AS` record

pub mod amiga;
pub mod rock_ridge;
pub mod susp;

pub use rock_ridge::RockRidgeEntry;
pub use susp::{Completion, Dispatcher, RecursionBudget, SuspError, SuspState};
