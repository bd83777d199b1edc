//! Common test utilities and mock block devices

#![allow(dead_code)]

pub mod builder;
pub mod records;

pub use builder::{DirEntry, IsoBuilder};

use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};
use iso9660::extensions::susp::{Diagnostic, DiagnosticSink};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;

/// ISO9660 sector size
pub const SECTOR: usize = 2048;

/// In-memory block device for testing
#[derive(Debug, Clone)]
pub struct MemoryBlockDevice {
    pub data: Vec<u8>,
    pub block_size: usize,
    pub reads: usize,
}

impl MemoryBlockDevice {
    /// Create a new memory block device from raw data
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            block_size: SECTOR,
            reads: 0,
        }
    }

    /// Create from a file path
    pub fn from_file(path: &str) -> io::Result<Self> {
        Ok(Self::new(std::fs::read(path)?))
    }

    /// Blank device of `sectors` sectors
    pub fn blank(sectors: usize) -> Self {
        Self::new(vec![0u8; sectors * SECTOR])
    }

    /// Create a minimal valid ISO9660 volume for testing: 64 sectors,
    /// root directory at sector 18 holding only `.` and `..`
    pub fn create_minimal_iso() -> Self {
        IsoBuilder::new().build()
    }

    /// Overwrite bytes at `offset` within sector `lba`
    pub fn write_at(&mut self, lba: u32, offset: usize, bytes: &[u8]) {
        let start = lba as usize * SECTOR + offset;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
    }
}

impl BlockIo for MemoryBlockDevice {
    type Error = io::Error;

    fn block_size(&self) -> BlockSize {
        BlockSize::new(self.block_size as u32).expect("valid block size")
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        Ok((self.data.len() / self.block_size) as u64)
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        self.reads += 1;
        let offset = start_lba.0 as usize * self.block_size;
        if offset + dst.len() > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "read beyond end of device",
            ));
        }
        dst.copy_from_slice(&self.data[offset..offset + dst.len()]);
        Ok(())
    }

    fn write_blocks(&mut self, start_lba: Lba, src: &[u8]) -> Result<(), Self::Error> {
        let offset = start_lba.0 as usize * self.block_size;
        if offset + src.len() > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "write beyond end of device",
            ));
        }
        self.data[offset..offset + src.len()].copy_from_slice(src);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Diagnostic sink that keeps everything it is given
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    seen: Rc<RefCell<Vec<Diagnostic>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boxed handle for `SuspState::with_sink`, sharing this sink's log
    pub fn boxed(&self) -> Box<dyn DiagnosticSink> {
        Box::new(self.clone())
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.seen.borrow().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.seen.borrow_mut().push(diagnostic.clone());
    }
}
