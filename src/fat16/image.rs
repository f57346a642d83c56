//! Raw byte access to the image file
//!
//! An `ImageFile` is opened at the start of each filesystem operation and
//! closed when it goes out of scope, on success and on every error path.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::boot_sector::{BootSector, BOOT_SECTOR_SIZE};
use super::error::{FsError, Result};

/// Open handle on a disk image
pub struct ImageFile {
    file: File,
}

impl ImageFile {
    /// Open the image read-only
    pub fn open_read(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| FsError::FileAccess(format!("cannot open {}: {}", path.display(), e)))?;
        Ok(ImageFile { file })
    }

    /// Open the image for reading and writing
    pub fn open_write(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| FsError::FileAccess(format!("cannot open {}: {}", path.display(), e)))?;
        Ok(ImageFile { file })
    }

    /// Read the boot sector and decode the volume geometry
    pub fn boot_sector(&mut self) -> Result<BootSector> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut buf = Vec::with_capacity(BOOT_SECTOR_SIZE);
        (&mut self.file)
            .take(BOOT_SECTOR_SIZE as u64)
            .read_to_end(&mut buf)?;
        let bs = BootSector::from_bytes(&buf)?;
        log::debug!("geometry: {:?}", bs);
        Ok(bs)
    }

    /// Size of the image in bytes
    pub fn size(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Read exactly `len` bytes at `offset`
    pub fn read_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(&mut buf).map_err(|e| {
            FsError::FileAccess(format!("reading {} bytes at {:#x}: {}", len, offset, e))
        })?;
        Ok(buf)
    }

    /// Write all of `data` at `offset`
    pub fn write_at(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(data).map_err(|e| {
            FsError::FileAccess(format!("writing {} bytes at {:#x}: {}", data.len(), offset, e))
        })?;
        Ok(())
    }

    /// Overwrite `len` bytes at `offset` with zeros
    pub fn zero_fill(&mut self, offset: u64, len: usize) -> Result<()> {
        self.write_at(offset, &vec![0u8; len])
    }

    /// Push buffered writes down to the file
    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}
