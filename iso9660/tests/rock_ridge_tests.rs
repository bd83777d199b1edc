//! Directory iteration and path lookup on Rock Ridge volumes

mod common;

use common::records::{area, ce, cl, nm, pl, px, re, sl, sp, er_rrip};
use common::{DirEntry, IsoBuilder, MemoryBlockDevice, RecordingSink};
use iso9660::error::Iso9660Error;
use iso9660::extensions::rock_ridge::NameFlags;
use iso9660::extensions::susp::{Diagnostic, SuspError};
use iso9660::{find_file, mount, read_dir, FileEntry, VolumeInfo};

const CONT: u8 = NameFlags::CONTINUE.bits();
const MODE_FILE: u32 = 0o100644;
const MODE_DIR: u32 = 0o040755;
const MODE_LINK: u32 = 0o120777;

const MOVED_LBA: u32 = 40;
const CONT_LBA: u32 = 50;

/// Root holding a plain file, a symlink, a CL stub, its relocated target
/// and a name continued through CE
fn rock_ridge_image() -> MemoryBlockDevice {
    let mut builder = IsoBuilder::new().rock_ridge();

    let readme = builder.alloc_sector();
    builder.write_sector(readme, 0, b"read me");
    builder.add_entry(
        DirEntry::file("README.TXT;1", readme, 7)
            .with_system_use(area(&[px(MODE_FILE, 1, 1000, 1000), nm(0, b"ReadMe.txt")])),
    );

    builder.add_entry(DirEntry::file("LATEST.;1", 0, 0).with_system_use(area(&[
        px(MODE_LINK, 1, 0, 0),
        nm(0, b"latest"),
        sl(&[(0, b"releases"), (0, b"v2")]),
    ])));

    // stub in the logical location, pointing at the relocated directory
    builder.add_entry(
        DirEntry::file("DEEP.;1", 0, 0)
            .with_system_use(area(&[px(MODE_DIR, 2, 0, 0), nm(0, b"deep"), cl(MOVED_LBA)])),
    );
    builder.add_entry(
        DirEntry::directory("MOVED", MOVED_LBA)
            .with_system_use(area(&[px(MODE_DIR, 2, 0, 0), nm(0, b"deep"), re()])),
    );

    let tail = nm(0, b"long_name.txt");
    builder.write_sector(CONT_LBA, 0, &tail);
    builder.add_entry(DirEntry::file("LONGNAME.;1", 0, 0).with_system_use(area(&[
        px(MODE_FILE, 1, 0, 0),
        nm(CONT, b"a_very_"),
        ce(CONT_LBA, 0, tail.len() as u32),
    ])));

    let inner = builder.alloc_sector();
    builder.write_sector(inner, 0, b"inner");
    builder.write_directory(
        MOVED_LBA,
        MOVED_LBA,
        Vec::new(),
        &[DirEntry::file("INNER.TXT;1", inner, 5)
            .with_system_use(area(&[px(MODE_FILE, 1, 0, 0), nm(0, b"inner.txt")]))],
    );

    builder.build()
}

fn mounted() -> (MemoryBlockDevice, VolumeInfo) {
    let mut device = rock_ridge_image();
    let volume = mount(&mut device, 0).expect("mount should succeed");
    assert!(volume.has_rock_ridge);
    (device, volume)
}

fn root_listing(device: &mut MemoryBlockDevice, volume: &VolumeInfo) -> Vec<FileEntry> {
    let root = find_file(device, volume, "/").expect("root");
    read_dir(device, volume, &root)
        .expect("root is a directory")
        .collect::<Result<_, _>>()
        .expect("root entries decode")
}

#[test]
fn test_rock_ridge_names_listed() {
    let (mut device, volume) = mounted();
    let names: Vec<String> = root_listing(&mut device, &volume)
        .into_iter()
        .map(|entry| entry.name)
        .collect();

    // the relocated directory only shows up through its stub
    assert_eq!(names, ["ReadMe.txt", "latest", "deep", "a_very_long_name.txt"]);
}

#[test]
fn test_posix_attributes() {
    let (mut device, volume) = mounted();
    let entry = find_file(&mut device, &volume, "/ReadMe.txt").expect("found by NM name");

    let posix = entry.posix().expect("PX decoded");
    assert_eq!(posix.permissions(), 0o644);
    assert_eq!(posix.uid, 1000);
    assert_eq!(posix.gid, 1000);
    assert!(!posix.is_directory());
    assert_eq!(entry.size, 7);
}

#[test]
fn test_rock_ridge_names_are_case_sensitive() {
    let (mut device, volume) = mounted();
    assert_eq!(
        find_file(&mut device, &volume, "/readme.txt").unwrap_err(),
        Iso9660Error::NotFound
    );
}

#[test]
fn test_symlink_target() {
    let (mut device, volume) = mounted();
    let link = find_file(&mut device, &volume, "/latest").expect("symlink entry");

    assert!(link.is_symlink());
    assert!(link.posix().is_some_and(|px| px.is_symlink()));
    assert_eq!(link.symlink_target().as_deref(), Some("releases/v2"));
}

#[test]
fn test_child_link_followed() {
    let (mut device, volume) = mounted();
    let deep = find_file(&mut device, &volume, "/deep").expect("CL stub");

    assert!(deep.is_directory());
    assert_eq!(deep.extent_lba, MOVED_LBA);
    assert_eq!(deep.data_length, 2048);
    assert!(deep.rock_ridge.as_ref().is_some_and(|rr| rr.is_augmented_directory()));

    let inner = find_file(&mut device, &volume, "/deep/inner.txt").expect("through relocation");
    assert_eq!(inner.size, 5);
}

#[test]
fn test_name_continued_through_ce() {
    let (mut device, volume) = mounted();
    let entry = find_file(&mut device, &volume, "/a_very_long_name.txt").expect("long name");
    assert_eq!(
        entry.rock_ridge.as_ref().map(|rr| rr.name_buffer().to_vec()),
        Some(b"a_very_long_name.txt\0".to_vec())
    );
}

#[test]
fn test_child_link_to_non_directory_spares_siblings() {
    let mut builder = IsoBuilder::new().rock_ridge();
    let file = builder.add_file("DATA.BIN;1", &[0xFF; 64]);
    builder.add_entry(DirEntry::file("BROKEN.;1", 0, 0).with_system_use(cl(file)));
    builder.add_entry(
        DirEntry::file("GOOD.;1", 0, 0).with_system_use(area(&[px(MODE_FILE, 1, 0, 0), nm(0, b"good")])),
    );
    let mut device = builder.build();
    let volume = mount(&mut device, 0).expect("mount should succeed");

    let good = find_file(&mut device, &volume, "/good").expect("sibling after a broken CL");
    assert!(!good.is_directory());

    let sink = RecordingSink::new();
    let root = find_file(&mut device, &volume, "/").expect("root");
    let entries: Vec<FileEntry> = read_dir(&mut device, &volume, &root)
        .expect("root")
        .with_sink(sink.boxed())
        .collect::<Result<_, _>>()
        .expect("a bad CL target is not fatal");

    let broken = &entries[1];
    assert_eq!(broken.name, "BROKEN");
    assert!(!broken.is_directory(), "link is not followed");
    assert_eq!(broken.rock_ridge.as_ref().and_then(|rr| rr.child_link), Some(file));
    assert_eq!(sink.diagnostics(), vec![Diagnostic::ChildLinkRejected { target: file }]);
}

#[test]
fn test_parent_link_recorded() {
    let mut builder = IsoBuilder::new().rock_ridge();
    builder.add_entry(
        DirEntry::directory("SUB", 30).with_system_use(area(&[nm(0, b"sub"), pl(18)])),
    );
    builder.write_directory(30, IsoBuilder::ROOT_LBA, Vec::new(), &[]);
    let mut device = builder.build();
    let volume = mount(&mut device, 0).expect("mount should succeed");

    let sub = find_file(&mut device, &volume, "/sub").expect("sub");
    let rr = sub.rock_ridge.expect("decoded");
    assert!(rr.dotdot_redirected());
    assert_eq!(rr.parent_link, Some(18));
}

#[test]
fn test_entry_diagnostics_reach_sink() {
    let mut builder = IsoBuilder::new().rock_ridge();
    let bad_ce = ce(9999, 0, 16);
    builder.add_entry(
        DirEntry::file("LOST.;1", 0, 0).with_system_use(area(&[nm(0, b"lost"), bad_ce])),
    );
    let mut device = builder.build();
    let volume = mount(&mut device, 0).expect("mount should succeed");

    let sink = RecordingSink::new();
    let root = find_file(&mut device, &volume, "/").expect("root");
    let entries: Vec<_> = read_dir(&mut device, &volume, &root)
        .expect("root")
        .with_sink(sink.boxed())
        .collect::<Result<_, _>>()
        .expect("decode failures are soft");

    assert_eq!(entries[0].name, "lost");
    assert_eq!(
        sink.diagnostics(),
        vec![Diagnostic::ContinuationFailed(SuspError::IoError)]
    );
}

#[test]
fn test_sp_skip_applies_to_entries() {
    let root = area(&[sp(4), er_rrip()]);
    let mut builder = IsoBuilder::new().root_system_use(root);
    let mut su = vec![0xAA; 4];
    su.extend(nm(0, b"skipped-prefix"));
    builder.add_entry(DirEntry::file("SKIP.;1", 0, 0).with_system_use(su));
    let mut device = builder.build();
    let volume = mount(&mut device, 0).expect("mount should succeed");
    assert_eq!(volume.susp_skip, Some(4));

    let entry = find_file(&mut device, &volume, "/skipped-prefix").expect("NM after skip");
    assert_eq!(entry.name(), "skipped-prefix");
}

#[test]
fn test_xa_entries() {
    let xa_block = [0, 0, 0, 0, 0x0D, 0x55, b'X', b'A', 0, 0, 0, 0, 0, 0];
    let root = [&xa_block[..], &sp(0)[..], &er_rrip()[..]].concat();
    let mut builder = IsoBuilder::new().xa().root_system_use(root);
    let entry_su = [&xa_block[..], &nm(0, b"xa-file")[..]].concat();
    builder.add_entry(DirEntry::file("XA.;1", 0, 0).with_system_use(entry_su));
    let mut device = builder.build();
    let volume = mount(&mut device, 0).expect("mount should succeed");

    let entry = find_file(&mut device, &volume, "/xa-file").expect("NM after XA block");
    assert_eq!(entry.name(), "xa-file");
}

#[test]
fn test_re_record_hides_entry_without_er() {
    // SP present but no ER: the RE record alone puts Rock Ridge in use
    let mut builder = IsoBuilder::new().root_system_use(sp(0));
    builder.add_entry(DirEntry::directory("MOVED", 30).with_system_use(re()));
    builder.write_directory(30, IsoBuilder::ROOT_LBA, Vec::new(), &[]);
    let mut device = builder.build();
    let volume = mount(&mut device, 0).expect("mount should succeed");
    assert!(!volume.has_rock_ridge);

    assert_eq!(
        find_file(&mut device, &volume, "/MOVED").unwrap_err(),
        Iso9660Error::NotFound
    );
}

#[test]
fn test_relocated_directory_visible_without_susp() {
    let mut builder = IsoBuilder::new();
    builder.add_entry(DirEntry::directory("MOVED", 30).with_system_use(re()));
    builder.write_directory(30, IsoBuilder::ROOT_LBA, Vec::new(), &[]);
    let mut device = builder.build();
    let volume = mount(&mut device, 0).expect("mount should succeed");
    assert_eq!(volume.susp_skip, None);

    let moved = find_file(&mut device, &volume, "/MOVED").expect("listed");
    assert!(moved.is_directory());
    assert!(moved.rock_ridge.is_none());
}
