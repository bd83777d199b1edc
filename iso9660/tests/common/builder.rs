use crate::common::records::{both, er_rrip, px, sp};
use crate::common::{MemoryBlockDevice, SECTOR};
use std::collections::BTreeMap;

/// Directory flag in a directory record
pub const FLAG_DIRECTORY: u8 = 0x02;

/// One directory record to be written into an extent
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: Vec<u8>,
    pub lba: u32,
    pub size: u32,
    pub flags: u8,
    pub system_use: Vec<u8>,
}

impl DirEntry {
    pub fn file(name: &str, lba: u32, size: u32) -> Self {
        Self {
            name: name.as_bytes().to_vec(),
            lba,
            size,
            flags: 0,
            system_use: Vec::new(),
        }
    }

    pub fn directory(name: &str, lba: u32) -> Self {
        Self {
            flags: FLAG_DIRECTORY,
            ..Self::file(name, lba, SECTOR as u32)
        }
    }

    pub fn with_system_use(mut self, system_use: Vec<u8>) -> Self {
        self.system_use = system_use;
        self
    }

    /// Encoded directory record, padded to an even length
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; 33];
        out[2..10].copy_from_slice(&both(self.lba));
        out[10..18].copy_from_slice(&both(self.size));
        out[25] = self.flags;
        out[28..32].copy_from_slice(&[1, 0, 0, 1]);
        out[32] = self.name.len() as u8;
        out.extend_from_slice(&self.name);
        if self.name.len() % 2 == 0 {
            out.push(0);
        }
        out.extend_from_slice(&self.system_use);
        if out.len() % 2 != 0 {
            out.push(0);
        }
        assert!(out.len() <= 255, "directory record too long");
        out[0] = out.len() as u8;
        out
    }
}

/// Builds small ISO images, optionally with SUSP / Rock Ridge metadata
pub struct IsoBuilder {
    root_system_use: Vec<u8>,
    root_entries: Vec<DirEntry>,
    sectors: BTreeMap<u32, Vec<u8>>,
    next_free_lba: u32,
    min_sectors: u32,
    xa: bool,
}

impl IsoBuilder {
    /// Root directory extent
    pub const ROOT_LBA: u32 = 18;

    pub fn new() -> Self {
        Self {
            root_system_use: Vec::new(),
            root_entries: Vec::new(),
            sectors: BTreeMap::new(),
            next_free_lba: Self::ROOT_LBA + 1, // 16=PVD, 17=Terminator, 18=Root
            min_sectors: 64,
            xa: false,
        }
    }

    /// Root `.` entry announces SUSP and Rock Ridge the way mkisofs does
    pub fn rock_ridge(self) -> Self {
        let root = [sp(0), px(0o040755, 2, 0, 0), er_rrip()].concat();
        self.root_system_use(root)
    }

    pub fn root_system_use(mut self, system_use: Vec<u8>) -> Self {
        self.root_system_use = system_use;
        self
    }

    /// Mark the volume as CD-ROM XA
    pub fn xa(mut self) -> Self {
        self.xa = true;
        self
    }

    pub fn alloc_sector(&mut self) -> u32 {
        let lba = self.next_free_lba;
        self.next_free_lba += 1;
        lba
    }

    /// Place raw bytes at `offset` inside sector `lba`
    pub fn write_sector(&mut self, lba: u32, offset: usize, bytes: &[u8]) {
        let sector = self.sectors.entry(lba).or_insert_with(|| vec![0u8; SECTOR]);
        sector[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// Plain file in the root directory; returns its extent
    pub fn add_file(&mut self, name: &str, content: &[u8]) -> u32 {
        let lba = self.alloc_sector();
        self.write_sector(lba, 0, content);
        self.add_entry(DirEntry::file(name, lba, content.len() as u32));
        lba
    }

    pub fn add_entry(&mut self, entry: DirEntry) {
        self.root_entries.push(entry);
    }

    /// Write a one-sector directory extent at `lba`
    pub fn write_directory(&mut self, lba: u32, parent: u32, dot_system_use: Vec<u8>, entries: &[DirEntry]) {
        let mut extent = Vec::new();
        let dot = DirEntry {
            name: vec![0],
            ..DirEntry::directory("", lba)
        };
        extent.extend(dot.with_system_use(dot_system_use).encode());
        let dotdot = DirEntry {
            name: vec![1],
            ..DirEntry::directory("", parent)
        };
        extent.extend(dotdot.encode());
        for entry in entries {
            extent.extend(entry.encode());
        }
        assert!(extent.len() <= SECTOR, "directory does not fit one sector");
        self.write_sector(lba, 0, &extent);
    }

    pub fn build(mut self) -> MemoryBlockDevice {
        let root_su = std::mem::take(&mut self.root_system_use);
        let root_entries = std::mem::take(&mut self.root_entries);
        self.write_directory(Self::ROOT_LBA, Self::ROOT_LBA, root_su, &root_entries);

        let last = self.sectors.keys().max().copied().unwrap_or(0);
        let total = self.min_sectors.max(last + 1);
        let mut data = vec![0u8; total as usize * SECTOR];

        // 1. PVD at 16
        let pvd = 16 * SECTOR;
        data[pvd] = 1;
        data[pvd + 1..pvd + 6].copy_from_slice(b"CD001");
        data[pvd + 6] = 1;
        data[pvd + 8..pvd + 19].copy_from_slice(b"TEST SYSTEM");
        data[pvd + 40..pvd + 51].copy_from_slice(b"TEST VOLUME");
        data[pvd + 80..pvd + 88].copy_from_slice(&both(total));
        data[pvd + 128..pvd + 130].copy_from_slice(&2048u16.to_le_bytes());
        data[pvd + 130..pvd + 132].copy_from_slice(&2048u16.to_be_bytes());

        // root record embedded in the PVD never carries System Use
        let root = DirEntry {
            name: vec![0],
            ..DirEntry::directory("", Self::ROOT_LBA)
        };
        data[pvd + 156..pvd + 190].copy_from_slice(&root.encode());

        if self.xa {
            data[pvd + 1024..pvd + 1032].copy_from_slice(b"CD-XA001");
        }

        // 2. Terminator at 17
        let term = 17 * SECTOR;
        data[term] = 255;
        data[term + 1..term + 6].copy_from_slice(b"CD001");
        data[term + 6] = 1;

        for (lba, bytes) in &self.sectors {
            let start = *lba as usize * SECTOR;
            data[start..start + SECTOR].copy_from_slice(bytes);
        }

        MemoryBlockDevice::new(data)
    }
}
