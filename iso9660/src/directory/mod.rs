//! Directory record parsing and navigation

pub mod iterator;
pub mod record;

pub use iterator::DirectoryIterator;

use crate::error::{Iso9660Error, Result};
use crate::types::{FileEntry, FileFlags, VolumeInfo, MAX_DIRECTORY_DEPTH};
use alloc::string::String;
use alloc::vec::Vec;
use gpt_disk_io::BlockIo;

/// Iterate the entries of directory `dir`
///
/// Returns [`Iso9660Error::NotFound`] when `dir` is not a directory.
pub fn read_dir<'a, B: BlockIo>(
    block_io: &'a mut B,
    volume: &VolumeInfo,
    dir: &FileEntry,
) -> Result<DirectoryIterator<'a, B>> {
    if !dir.flags.directory {
        return Err(Iso9660Error::NotFound);
    }
    Ok(DirectoryIterator::new(block_io, volume, dir.extent_lba, dir.data_length))
}

/// Rock Ridge names are POSIX names and compare exactly; plain ISO9660
/// names are upper-case d-characters and compare case-insensitively.
fn name_matches(entry: &FileEntry, component: &str) -> bool {
    let rock_ridge_name = entry
        .rock_ridge
        .as_ref()
        .is_some_and(|rr| rr.name().is_some_and(|name| !name.is_empty()));

    if rock_ridge_name {
        entry.name == component
    } else {
        entry.name.eq_ignore_ascii_case(component)
    }
}

fn root_entry(volume: &VolumeInfo) -> FileEntry {
    FileEntry {
        name: String::from("/"),
        size: volume.root_extent_len as u64,
        extent_lba: volume.root_extent_lba,
        data_length: volume.root_extent_len,
        flags: FileFlags {
            hidden: false,
            directory: true,
            associated: false,
            extended_format: false,
            extended_permissions: false,
            not_final: false,
        },
        file_unit_size: 0,
        interleave_gap: 0,
        rock_ridge: None,
    }
}

/// Find a file or directory by path
///
/// Navigates the directory tree from root to locate a file/directory.
/// On Rock Ridge volumes the path is matched against NM names and
/// relocated directories are reached through their original location.
///
/// # Arguments
/// * `block_io` - Block device
/// * `volume` - Mounted volume info
/// * `path` - Path to find (e.g., "/usr/bin/env", "/README.TXT")
///
/// # Returns
/// File entry if found, with metadata and extent location
///
/// # Example
/// ```ignore
/// use iso9660::{mount, find_file};
///
/// let volume = mount(&mut block_io, 0)?;
/// let file = find_file(&mut block_io, &volume, "/usr/share/doc/README")?;
/// if let Some(px) = file.posix() {
///     println!("mode {:o}", px.mode);
/// }
/// ```
pub fn find_file<B: BlockIo>(block_io: &mut B, volume: &VolumeInfo, path: &str) -> Result<FileEntry> {
    let components: Vec<&str> = path
        .split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect();

    // Rock Ridge relocation lifts the ISO9660 depth limit
    if !volume.has_rock_ridge && components.len() > MAX_DIRECTORY_DEPTH {
        return Err(Iso9660Error::PathTooLong);
    }

    let mut current = root_entry(volume);

    for component in components {
        let mut found = None;
        for result in read_dir(block_io, volume, &current)? {
            let entry = result?;
            if name_matches(&entry, component) {
                found = Some(entry);
                break;
            }
        }

        current = found.ok_or(Iso9660Error::NotFound)?;
    }

    Ok(current)
}
