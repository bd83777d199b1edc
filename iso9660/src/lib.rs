//! ISO9660 Filesystem Implementation
//!
//! A `no_std` ISO9660 reader whose directory layer understands the System
//! Use Sharing Protocol (SUSP) and the Rock Ridge extensions layered on it.
//!
//! # Overview
//!
//! Every directory record may end in a System Use area: a packed run of
//! self-describing records (`PX`, `NM`, `SL`, `TF`, ...) that can spill into
//! continuation areas elsewhere on the disc via `CE`. This crate provides:
//! - Volume descriptor parsing, including CD-ROM XA detection
//! - SUSP / Rock Ridge detection from the root directory's `.` entry
//! - A hardened record decoder that tolerates hostile or corrupt discs
//! - Directory iteration with POSIX names, attributes, symlinks and
//!   deep-directory relocation applied
//!
//! # Architecture
//!
//! 1. **Volume layer** - Parses volume descriptors from sectors 16+
//! 2. **Directory layer** - Walks directory records
//! 3. **Extension layer** - Frames, validates and dispatches System Use records
//!
//! # Usage
//!
//! ```ignore
//! use iso9660::{mount, find_file};
//!
//! let volume = mount(&mut block_io, 0)?;
//! let link = find_file(&mut block_io, &volume, "/usr/lib/libfoo.so")?;
//! if let Some(target) = link.symlink_target() {
//!     println!("-> {}", target);
//! }
//! ```
//!
//! # Decoding a System Use area directly
//!
//! ```ignore
//! use iso9660::extensions::{Dispatcher, RecursionBudget, RockRidgeEntry, SuspState};
//!
//! let mut state = SuspState::resume(volume.xa1, skip, true);
//! let mut entry = RockRidgeEntry::new();
//! let mut budget = RecursionBudget::new();
//! Dispatcher::new(&mut block_io, &mut state, &mut entry, &mut budget).run(system_use)?;
//! ```

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod directory;
pub mod error;
pub mod extensions;
pub mod types;
pub mod utils;
pub mod volume;

pub use error::{Iso9660Error, Result};
pub use types::{FileEntry, VolumeInfo};

// High-level API exports
pub use directory::{find_file, read_dir, DirectoryIterator};
pub use extensions::{RockRidgeEntry, SuspState};
pub use volume::{mount, mount_with_sink};
