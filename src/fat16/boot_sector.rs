//! FAT16 Boot Sector Parser
//!
//! Decodes the BIOS parameter block at the start of the image and derives
//! the byte offsets of the FAT, the root directory and the data region.

use byteorder::{ByteOrder, LittleEndian};

use super::directory::DIR_ENTRY_SIZE;
use super::error::{FsError, Result};

/// Size of the boot sector in bytes
pub const BOOT_SECTOR_SIZE: usize = 512;

const BYTES_PER_SECTOR_OFFSET: usize = 11;
const SECTORS_PER_CLUSTER_OFFSET: usize = 13;
const RESERVED_SECTORS_OFFSET: usize = 14;
const NUMBER_OF_FATS_OFFSET: usize = 16;
const ROOT_DIR_ENTRIES_OFFSET: usize = 17;
const TOTAL_SECTORS_16_OFFSET: usize = 19;
const SECTORS_PER_FAT_OFFSET: usize = 22;
const TOTAL_SECTORS_32_OFFSET: usize = 32;

/// Geometry of a FAT16 volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootSector {
    /// Bytes per sector (usually 512)
    pub bytes_per_sector: u16,
    /// Sectors per allocation cluster
    pub sectors_per_cluster: u8,
    /// Number of reserved sectors before the first FAT
    pub reserved_sectors: u16,
    /// Number of FAT copies (only the first one is used)
    pub number_of_fats: u8,
    /// Capacity of the root directory table, in entries
    pub root_dir_entries: u16,
    /// Sectors per FAT copy
    pub sectors_per_fat: u16,
    /// Total sectors on the volume, 0 when the boot sector does not say
    pub total_sectors: u32,
}

impl BootSector {
    /// Parse boot sector from raw bytes
    ///
    /// # Returns
    /// * `Ok(BootSector)` when the six geometry fields can be read
    /// * `Err(InvalidDiskImage)` when the buffer is shorter than 512 bytes
    ///   or the geometry would make offsets meaningless (zero sector or
    ///   cluster size)
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < BOOT_SECTOR_SIZE {
            return Err(FsError::InvalidDiskImage(format!(
                "boot sector is {} bytes, expected {}",
                data.len(),
                BOOT_SECTOR_SIZE
            )));
        }

        let total_16 = LittleEndian::read_u16(&data[TOTAL_SECTORS_16_OFFSET..]);
        let total_sectors = if total_16 != 0 {
            total_16 as u32
        } else {
            LittleEndian::read_u32(&data[TOTAL_SECTORS_32_OFFSET..])
        };

        let bs = BootSector {
            bytes_per_sector: LittleEndian::read_u16(&data[BYTES_PER_SECTOR_OFFSET..]),
            sectors_per_cluster: data[SECTORS_PER_CLUSTER_OFFSET],
            reserved_sectors: LittleEndian::read_u16(&data[RESERVED_SECTORS_OFFSET..]),
            number_of_fats: data[NUMBER_OF_FATS_OFFSET],
            root_dir_entries: LittleEndian::read_u16(&data[ROOT_DIR_ENTRIES_OFFSET..]),
            sectors_per_fat: LittleEndian::read_u16(&data[SECTORS_PER_FAT_OFFSET..]),
            total_sectors,
        };

        if bs.bytes_per_sector == 0 || bs.sectors_per_cluster == 0 {
            return Err(FsError::InvalidDiskImage(String::from(
                "zero bytes per sector or sectors per cluster",
            )));
        }

        Ok(bs)
    }

    /// Write the geometry fields back into a boot sector buffer
    pub fn write_to(&self, data: &mut [u8]) -> Result<()> {
        if data.len() < BOOT_SECTOR_SIZE {
            return Err(FsError::InvalidDiskImage(String::from("boot sector buffer too small")));
        }
        LittleEndian::write_u16(&mut data[BYTES_PER_SECTOR_OFFSET..], self.bytes_per_sector);
        data[SECTORS_PER_CLUSTER_OFFSET] = self.sectors_per_cluster;
        LittleEndian::write_u16(&mut data[RESERVED_SECTORS_OFFSET..], self.reserved_sectors);
        data[NUMBER_OF_FATS_OFFSET] = self.number_of_fats;
        LittleEndian::write_u16(&mut data[ROOT_DIR_ENTRIES_OFFSET..], self.root_dir_entries);
        LittleEndian::write_u16(&mut data[SECTORS_PER_FAT_OFFSET..], self.sectors_per_fat);
        if self.total_sectors <= u16::MAX as u32 {
            LittleEndian::write_u16(&mut data[TOTAL_SECTORS_16_OFFSET..], self.total_sectors as u16);
            LittleEndian::write_u32(&mut data[TOTAL_SECTORS_32_OFFSET..], 0);
        } else {
            LittleEndian::write_u16(&mut data[TOTAL_SECTORS_16_OFFSET..], 0);
            LittleEndian::write_u32(&mut data[TOTAL_SECTORS_32_OFFSET..], self.total_sectors);
        }
        Ok(())
    }

    /// Byte offset of the first FAT
    #[inline]
    pub fn fat_start(&self) -> u64 {
        self.reserved_sectors as u64 * self.bytes_per_sector as u64
    }

    /// Size of one FAT copy in bytes
    #[inline]
    pub fn fat_size(&self) -> usize {
        self.sectors_per_fat as usize * self.bytes_per_sector as usize
    }

    /// Byte offset of the root directory table
    #[inline]
    pub fn root_dir_start(&self) -> u64 {
        (self.reserved_sectors as u64
            + self.number_of_fats as u64 * self.sectors_per_fat as u64)
            * self.bytes_per_sector as u64
    }

    /// Size of the root directory table in bytes
    #[inline]
    pub fn root_dir_size(&self) -> usize {
        self.root_dir_entries as usize * DIR_ENTRY_SIZE
    }

    /// Number of sectors occupied by the root directory (rounded up)
    #[inline]
    pub fn root_dir_sectors(&self) -> u64 {
        let bps = self.bytes_per_sector as u64;
        (self.root_dir_size() as u64 + bps - 1) / bps
    }

    /// Byte offset of the data region (sector after the root directory)
    #[inline]
    pub fn data_region_start(&self) -> u64 {
        self.root_dir_start() + self.root_dir_sectors() * self.bytes_per_sector as u64
    }

    /// Bytes per cluster
    #[inline]
    pub fn cluster_byte_size(&self) -> usize {
        self.bytes_per_sector as usize * self.sectors_per_cluster as usize
    }

    /// Byte offset of a data cluster (must be >= 2)
    #[inline]
    pub fn cluster_offset(&self, cluster: u16) -> u64 {
        self.data_region_start() + (cluster as u64 - 2) * self.cluster_byte_size() as u64
    }

    /// Number of data clusters the volume can hold, if the boot sector
    /// carries a total sector count
    pub fn data_cluster_count(&self) -> Option<u32> {
        if self.total_sectors == 0 {
            return None;
        }
        let data_start_sector = self.data_region_start() / self.bytes_per_sector as u64;
        let data_sectors = (self.total_sectors as u64).saturating_sub(data_start_sector);
        Some((data_sectors / self.sectors_per_cluster as u64) as u32)
    }
}
