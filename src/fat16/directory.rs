//! FAT16 Directory Entry handling
//!
//! Directory entries are 32-byte structures containing file metadata.
//! Only short (8.3) entries of the root directory table are handled.

use byteorder::{ByteOrder, LittleEndian};

use super::name::{ShortName, EXT_LEN, NAME_LEN};
use super::time::{FatDate, FatTime};

/// Size of one directory entry
pub const DIR_ENTRY_SIZE: usize = 32;

/// First byte of a never-used entry; ends the table scan
pub const ENTRY_FREE: u8 = 0x00;
/// First byte of a deleted entry
pub const ENTRY_DELETED: u8 = 0xE5;

// Directory entry attribute flags
/// Read-only file
pub const ATTR_READ_ONLY: u8 = 0x01;
/// Hidden file
pub const ATTR_HIDDEN: u8 = 0x02;
/// System file
pub const ATTR_SYSTEM: u8 = 0x04;
/// Volume label (root directory only)
pub const ATTR_VOLUME_ID: u8 = 0x08;
/// Directory
pub const ATTR_DIRECTORY: u8 = 0x10;
/// Archive flag
pub const ATTR_ARCHIVE: u8 = 0x20;

/// Occupancy state derived from the first byte of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// 0x00: unused, and so is every entry after it
    Free,
    /// 0xE5: skipped when listing, reusable on insert
    Deleted,
    /// Anything else
    Occupied,
}

impl EntryStatus {
    /// Classify an entry by its first byte
    #[inline]
    pub fn from_first_byte(b: u8) -> Self {
        match b {
            ENTRY_FREE => EntryStatus::Free,
            ENTRY_DELETED => EntryStatus::Deleted,
            _ => EntryStatus::Occupied,
        }
    }

    /// Can a new file be written into this slot
    #[inline]
    pub fn is_reusable(&self) -> bool {
        matches!(self, EntryStatus::Free | EntryStatus::Deleted)
    }
}

/// FAT16 Directory Entry (32 bytes)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    /// Short filename (8 chars, space-padded)
    pub name: [u8; NAME_LEN],
    /// Extension (3 chars, space-padded)
    pub ext: [u8; EXT_LEN],
    /// File attributes
    pub attr: u8,
    /// Bytes 12-21, kept as-is
    pub reserved: [u8; 10],
    /// Creation time (raw)
    pub create_time: u16,
    /// Creation date (raw)
    pub create_date: u16,
    /// First data cluster
    pub first_cluster: u16,
    /// File size in bytes
    pub size: u32,
}

impl DirEntry {
    /// Build a fresh entry for a new file
    pub fn new(
        name: &ShortName,
        attr: u8,
        time: FatTime,
        date: FatDate,
        first_cluster: u16,
        size: u32,
    ) -> Self {
        let raw = name.to_bytes();
        let mut entry = DirEntry {
            name: [b' '; NAME_LEN],
            ext: [b' '; EXT_LEN],
            attr,
            reserved: [0u8; 10],
            create_time: time.to_raw(),
            create_date: date.to_raw(),
            first_cluster,
            size,
        };
        entry.name.copy_from_slice(&raw[..NAME_LEN]);
        entry.ext.copy_from_slice(&raw[NAME_LEN..]);
        entry
    }

    /// Parse directory entry from 32 bytes
    ///
    /// # Returns
    /// * `Some(DirEntry)` if the entry is occupied
    /// * `None` if entry is deleted (0xE5), free (0x00) or too short
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < DIR_ENTRY_SIZE {
            return None;
        }

        if EntryStatus::from_first_byte(data[0]) != EntryStatus::Occupied {
            return None;
        }

        let mut name = [0u8; NAME_LEN];
        let mut ext = [0u8; EXT_LEN];
        let mut reserved = [0u8; 10];
        name.copy_from_slice(&data[0..8]);
        ext.copy_from_slice(&data[8..11]);
        reserved.copy_from_slice(&data[12..22]);

        Some(DirEntry {
            name,
            ext,
            attr: data[11],
            reserved,
            create_time: LittleEndian::read_u16(&data[22..24]),
            create_date: LittleEndian::read_u16(&data[24..26]),
            first_cluster: LittleEndian::read_u16(&data[26..28]),
            size: LittleEndian::read_u32(&data[28..32]),
        })
    }

    /// Serialize into the on-disk 32-byte layout
    pub fn to_bytes(&self) -> [u8; DIR_ENTRY_SIZE] {
        let mut out = [0u8; DIR_ENTRY_SIZE];
        out[0..8].copy_from_slice(&self.name);
        out[8..11].copy_from_slice(&self.ext);
        out[11] = self.attr;
        out[12..22].copy_from_slice(&self.reserved);
        LittleEndian::write_u16(&mut out[22..24], self.create_time);
        LittleEndian::write_u16(&mut out[24..26], self.create_date);
        LittleEndian::write_u16(&mut out[26..28], self.first_cluster);
        LittleEndian::write_u32(&mut out[28..32], self.size);
        out
    }

    /// Check if entry is read-only
    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.attr & ATTR_READ_ONLY != 0
    }

    /// Check if entry is hidden
    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.attr & ATTR_HIDDEN != 0
    }

    /// Check if entry is a system file
    #[inline]
    pub fn is_system(&self) -> bool {
        self.attr & ATTR_SYSTEM != 0
    }

    /// Decoded creation time
    pub fn time_created(&self) -> FatTime {
        FatTime::from_raw(self.create_time)
    }

    /// Decoded creation date
    pub fn date_created(&self) -> FatDate {
        FatDate::from_raw(self.create_date)
    }

    /// Get display name in standard format (NAME.EXT)
    ///
    /// Strips the space padding and joins name and extension.
    pub fn display_name(&self) -> String {
        let name_part = trim_field(&self.name);
        let ext_part = trim_field(&self.ext);

        if ext_part.is_empty() {
            name_part
        } else {
            format!("{}.{}", name_part, ext_part)
        }
    }
}

fn trim_field(field: &[u8]) -> String {
    field
        .iter()
        .map(|&b| b as char)
        .collect::<String>()
        .trim()
        .to_string()
}

/// One slot of the root directory table, as seen by a scan
#[derive(Clone, Debug)]
pub struct DirSlot {
    /// Byte offset of the slot inside the table
    pub offset: usize,
    pub status: EntryStatus,
    /// Decoded fields, present only for occupied slots
    pub entry: Option<DirEntry>,
}

/// Walk the directory table in order
///
/// Yields every slot up to and including the first free one, then stops.
pub fn scan_directory(data: &[u8]) -> Vec<DirSlot> {
    let mut slots = Vec::new();

    for (i, chunk) in data.chunks_exact(DIR_ENTRY_SIZE).enumerate() {
        let status = EntryStatus::from_first_byte(chunk[0]);
        slots.push(DirSlot {
            offset: i * DIR_ENTRY_SIZE,
            status,
            entry: DirEntry::from_bytes(chunk),
        });

        if status == EntryStatus::Free {
            break;
        }
    }

    slots
}

/// Occupied entries in table order
pub fn parse_directory(data: &[u8]) -> Vec<DirEntry> {
    scan_directory(data)
        .into_iter()
        .filter_map(|slot| slot.entry)
        .collect()
}

/// Find the occupied entry whose display name matches exactly
pub fn find_entry(data: &[u8], name: &str) -> Option<(usize, DirEntry)> {
    scan_directory(data).into_iter().find_map(|slot| match slot.entry {
        Some(entry) if entry.display_name() == name => Some((slot.offset, entry)),
        _ => None,
    })
}

/// Offset of the first slot a new entry can be written to
pub fn find_reusable_slot(data: &[u8]) -> Option<usize> {
    scan_directory(data)
        .into_iter()
        .find(|slot| slot.status.is_reusable())
        .map(|slot| slot.offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_entry(name: &[u8; 11], attr: u8, cluster: u16, size: u32) -> [u8; 32] {
        let mut data = [0u8; 32];
        data[0..11].copy_from_slice(name);
        data[11] = attr;
        data[26..28].copy_from_slice(&cluster.to_le_bytes());
        data[28..32].copy_from_slice(&size.to_le_bytes());
        data
    }

    #[test]
    fn test_dir_entry_parsing() {
        let mut data = raw_entry(b"TEST    TXT", ATTR_ARCHIVE | ATTR_HIDDEN, 5, 1234);
        data[22..24].copy_from_slice(&0x6A2Fu16.to_le_bytes());

        let entry = DirEntry::from_bytes(&data).unwrap();
        assert_eq!(entry.display_name(), "TEST.TXT");
        assert_eq!(entry.first_cluster, 5);
        assert_eq!(entry.size, 1234);
        assert_eq!(entry.create_time, 0x6A2F);
        assert!(entry.is_hidden());
        assert!(!entry.is_read_only());
        assert!(!entry.is_system());
        assert_eq!(entry.to_bytes(), data);
    }

    #[test]
    fn test_no_extension() {
        let data = raw_entry(b"DOCS       ", 0, 0, 0);
        let entry = DirEntry::from_bytes(&data).unwrap();
        assert_eq!(entry.display_name(), "DOCS");
    }

    #[test]
    fn test_deleted_entry() {
        let mut data = [0u8; 32];
        data[0] = 0xE5; // Deleted marker
        assert!(DirEntry::from_bytes(&data).is_none());
        assert_eq!(EntryStatus::from_first_byte(data[0]), EntryStatus::Deleted);
    }

    #[test]
    fn test_end_marker() {
        let data = [0u8; 32]; // First byte is 0x00
        assert!(DirEntry::from_bytes(&data).is_none());
        assert_eq!(EntryStatus::from_first_byte(data[0]), EntryStatus::Free);
    }

    #[test]
    fn test_scan_stops_at_free() {
        let mut table = vec![0u8; 32 * 6];
        table[0..32].copy_from_slice(&raw_entry(b"A       TXT", 0, 2, 1));
        table[32] = ENTRY_DELETED;
        table[64..96].copy_from_slice(&raw_entry(b"B       TXT", 0, 3, 1));
        // slot 3 free, slot 4 occupied but unreachable
        table[128..160].copy_from_slice(&raw_entry(b"HIDDEN  BIN", 0, 4, 1));

        let slots = scan_directory(&table);
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[1].status, EntryStatus::Deleted);
        assert_eq!(slots[3].status, EntryStatus::Free);

        let names: Vec<String> = parse_directory(&table).iter().map(|e| e.display_name()).collect();
        assert_eq!(names, vec!["A.TXT", "B.TXT"]);
        assert!(find_entry(&table, "HIDDEN.BIN").is_none());
        assert_eq!(find_entry(&table, "B.TXT").map(|(off, _)| off), Some(64));
    }

    #[test]
    fn test_deleted_slot_reused_first() {
        let mut table = vec![0u8; 32 * 4];
        table[0..32].copy_from_slice(&raw_entry(b"A       TXT", 0, 2, 1));
        table[32] = ENTRY_DELETED;
        assert_eq!(find_reusable_slot(&table), Some(32));

        table[32..64].copy_from_slice(&raw_entry(b"B       TXT", 0, 3, 1));
        assert_eq!(find_reusable_slot(&table), Some(64));
    }

    #[test]
    fn test_full_table() {
        let mut table = vec![0u8; 32 * 2];
        table[0..32].copy_from_slice(&raw_entry(b"A       TXT", 0, 2, 1));
        table[32..64].copy_from_slice(&raw_entry(b"B       TXT", 0, 3, 1));
        assert_eq!(find_reusable_slot(&table), None);
        assert_eq!(scan_directory(&table).len(), 2);
    }
}
