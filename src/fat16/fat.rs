//! FAT (File Allocation Table) handling
//!
//! The FAT16 table is an array of 16-bit little-endian entries that form
//! cluster chains. Entries 0 and 1 are reserved; data clusters start at 2.

use byteorder::{ByteOrder, LittleEndian};

use super::error::{FsError, Result};

/// First cluster index usable for file data
pub const FIRST_DATA_CLUSTER: u16 = 2;
/// Lowest value marking the end of a chain
pub const END_OF_CHAIN_MIN: u16 = 0xFFF8;
/// Value written to terminate a chain
pub const END_OF_CHAIN: u16 = 0xFFFF;
/// Bad cluster marker
pub const BAD_CLUSTER: u16 = 0xFFF7;

/// FAT entry types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatEntry {
    /// Cluster is free (0x0000)
    Free,
    /// Reserved cluster (0x0001)
    Reserved,
    /// Data cluster - value is next cluster number
    Data(u16),
    /// Bad cluster (0xFFF7)
    BadCluster,
    /// End of cluster chain (0xFFF8-0xFFFF)
    EndOfChain,
}

impl FatEntry {
    /// Parse raw 16-bit FAT entry value
    pub fn from_raw(value: u16) -> Self {
        match value {
            0x0000 => FatEntry::Free,
            0x0001 => FatEntry::Reserved,
            BAD_CLUSTER => FatEntry::BadCluster,
            END_OF_CHAIN_MIN..=0xFFFF => FatEntry::EndOfChain,
            n => FatEntry::Data(n),
        }
    }

    /// Raw value to store for this entry
    pub fn to_raw(&self) -> u16 {
        match *self {
            FatEntry::Free => 0x0000,
            FatEntry::Reserved => 0x0001,
            FatEntry::Data(n) => n,
            FatEntry::BadCluster => BAD_CLUSTER,
            FatEntry::EndOfChain => END_OF_CHAIN,
        }
    }

    /// Check if this entry marks end of chain
    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self, FatEntry::EndOfChain)
    }

    /// Check if this entry is free
    #[inline]
    pub fn is_free(&self) -> bool {
        matches!(self, FatEntry::Free)
    }

    /// Get next cluster number if this is a data entry
    #[inline]
    pub fn next_cluster(&self) -> Option<u16> {
        match self {
            FatEntry::Data(n) => Some(*n),
            _ => None,
        }
    }
}

/// In-memory copy of the first FAT
///
/// Loaded once per operation, edited in place, then written back whole.
pub struct FatTable {
    /// Raw FAT data (array of 16-bit little-endian entries)
    data: Vec<u8>,
    /// One past the highest cluster index that may be allocated
    limit: usize,
}

impl FatTable {
    /// Wrap raw FAT bytes
    ///
    /// # Arguments
    /// * `data` - Raw bytes of the FAT
    /// * `data_clusters` - Number of clusters in the data region, if known;
    ///   caps allocation so no cluster lands past the end of the volume
    pub fn new(data: Vec<u8>, data_clusters: Option<u32>) -> Self {
        let entries = data.len() / 2;
        let limit = match data_clusters {
            Some(n) => entries.min(n as usize + FIRST_DATA_CLUSTER as usize),
            None => entries,
        }
        .min(BAD_CLUSTER as usize);
        FatTable { data, limit }
    }

    /// Raw bytes, for writing back to the image
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of entries in the table
    pub fn len(&self) -> usize {
        self.data.len() / 2
    }

    /// Get FAT entry for a cluster
    ///
    /// Out-of-range clusters read as end of chain.
    pub fn get_entry(&self, cluster: u16) -> FatEntry {
        let offset = cluster as usize * 2;
        if offset + 2 > self.data.len() {
            return FatEntry::EndOfChain;
        }
        FatEntry::from_raw(LittleEndian::read_u16(&self.data[offset..]))
    }

    /// Set FAT entry for a cluster
    pub fn set_entry(&mut self, cluster: u16, entry: FatEntry) -> Result<()> {
        let offset = cluster as usize * 2;
        if offset + 2 > self.data.len() {
            return Err(FsError::InvalidDiskImage(format!(
                "cluster {} is outside the FAT",
                cluster
            )));
        }
        LittleEndian::write_u16(&mut self.data[offset..], entry.to_raw());
        Ok(())
    }

    /// Collect up to `count` free clusters, lowest index first
    ///
    /// Clusters need not be contiguous. A result shorter than `count`
    /// means the volume does not have room.
    pub fn find_free(&self, count: usize) -> Vec<u16> {
        (FIRST_DATA_CLUSTER as usize..self.limit)
            .map(|c| c as u16)
            .filter(|&c| self.get_entry(c).is_free())
            .take(count)
            .collect()
    }

    /// Link clusters into a chain in list order and terminate it
    pub fn link_chain(&mut self, clusters: &[u16]) -> Result<()> {
        for pair in clusters.windows(2) {
            self.set_entry(pair[0], FatEntry::Data(pair[1]))?;
        }
        if let Some(&last) = clusters.last() {
            self.set_entry(last, FatEntry::EndOfChain)?;
        }
        Ok(())
    }

    /// Get complete cluster chain starting from a cluster
    ///
    /// # Returns
    /// * `Ok(vec![])` if `start` is not a data cluster (empty file)
    /// * `Err(InvalidDiskImage)` if the chain loops, runs into a free or
    ///   reserved entry, or points outside the table
    pub fn get_cluster_chain(&self, start: u16) -> Result<Vec<u16>> {
        let mut chain = Vec::new();
        if start < FIRST_DATA_CLUSTER {
            return Ok(chain);
        }

        let mut visited = vec![false; self.len()];
        let mut current = start;

        loop {
            let idx = current as usize;
            if idx >= visited.len() {
                return Err(FsError::InvalidDiskImage(format!(
                    "cluster {} is outside the FAT",
                    current
                )));
            }
            if visited[idx] {
                return Err(FsError::InvalidDiskImage(format!(
                    "cluster chain from {} loops at {}",
                    start, current
                )));
            }
            visited[idx] = true;
            chain.push(current);

            let entry = self.get_entry(current);
            if entry.is_end() {
                break;
            }
            match entry.next_cluster() {
                Some(next) if next >= FIRST_DATA_CLUSTER => current = next,
                _ => {
                    return Err(FsError::InvalidDiskImage(format!(
                        "cluster {} has unexpected FAT entry {:?}",
                        current, entry
                    )))
                }
            }
        }

        Ok(chain)
    }

    /// Release a chain: every entry is reset to free
    ///
    /// # Returns
    /// The freed clusters in chain order, so their payload can be zeroed
    pub fn free_chain(&mut self, start: u16) -> Result<Vec<u16>> {
        let chain = self.get_cluster_chain(start)?;
        for &cluster in &chain {
            self.set_entry(cluster, FatEntry::Free)?;
        }
        Ok(chain)
    }

    /// Count free clusters available for allocation
    pub fn count_free_clusters(&self) -> usize {
        (FIRST_DATA_CLUSTER as usize..self.limit)
            .filter(|&c| self.get_entry(c as u16).is_free())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[u16]) -> FatTable {
        let mut data = Vec::with_capacity(entries.len() * 2);
        for e in entries {
            data.extend_from_slice(&e.to_le_bytes());
        }
        FatTable::new(data, None)
    }

    #[test]
    fn test_fat_entry_types() {
        assert_eq!(FatEntry::from_raw(0x0000), FatEntry::Free);
        assert_eq!(FatEntry::from_raw(0x0001), FatEntry::Reserved);
        assert_eq!(FatEntry::from_raw(0x0064), FatEntry::Data(100));
        assert_eq!(FatEntry::from_raw(0xFFF7), FatEntry::BadCluster);
        assert_eq!(FatEntry::from_raw(0xFFF8), FatEntry::EndOfChain);
        assert_eq!(FatEntry::from_raw(0xFFFF), FatEntry::EndOfChain);
    }

    #[test]
    fn test_fat_entry_methods() {
        assert!(FatEntry::EndOfChain.is_end());
        assert!(!FatEntry::Data(5).is_end());
        assert!(FatEntry::Free.is_free());
        assert_eq!(FatEntry::Data(42).next_cluster(), Some(42));
        assert_eq!(FatEntry::EndOfChain.next_cluster(), None);
    }

    #[test]
    fn test_find_free_skips_used() {
        let fat = table(&[0xFFF8, 0xFFFF, 0xFFFF, 0, 0xFFFF, 0, 0, 0]);
        assert_eq!(fat.find_free(2), vec![3, 5]);
        assert_eq!(fat.find_free(10), vec![3, 5, 6, 7]);
        assert_eq!(fat.count_free_clusters(), 4);
    }

    #[test]
    fn test_find_free_respects_data_clusters() {
        let data = vec![0u8; 16];
        let fat = FatTable::new(data, Some(3));
        assert_eq!(fat.find_free(10), vec![2, 3, 4]);
    }

    #[test]
    fn test_bad_cluster_index_never_allocated() {
        // everything used except the last two indices below the markers
        let mut entries = vec![0xFFFFu16; END_OF_CHAIN_MIN as usize];
        entries[0xFFF6] = 0;
        entries[BAD_CLUSTER as usize] = 0;
        let fat = table(&entries);
        assert_eq!(fat.find_free(2), vec![0xFFF6]);
        assert_eq!(fat.count_free_clusters(), 1);
    }

    #[test]
    fn test_chain_into_bad_cluster() {
        let fat = table(&[0xFFF8, 0xFFFF, BAD_CLUSTER]);
        assert!(matches!(fat.get_cluster_chain(2), Err(FsError::InvalidDiskImage(_))));
    }

    #[test]
    fn test_link_and_walk_chain() {
        let mut fat = table(&[0xFFF8, 0xFFFF, 0, 0, 0, 0, 0, 0]);
        fat.link_chain(&[2, 5, 3]).unwrap();

        assert_eq!(fat.get_entry(2), FatEntry::Data(5));
        assert_eq!(fat.get_entry(5), FatEntry::Data(3));
        assert_eq!(fat.get_entry(3), FatEntry::EndOfChain);
        assert_eq!(fat.get_cluster_chain(2).unwrap(), vec![2, 5, 3]);
    }

    #[test]
    fn test_free_chain() {
        let mut fat = table(&[0xFFF8, 0xFFFF, 3, 4, 0xFFFF, 0xFFFF]);
        let freed = fat.free_chain(2).unwrap();
        assert_eq!(freed, vec![2, 3, 4]);
        assert!(fat.get_entry(2).is_free());
        assert!(fat.get_entry(3).is_free());
        assert!(fat.get_entry(4).is_free());
        assert_eq!(fat.get_entry(5), FatEntry::EndOfChain);
    }

    #[test]
    fn test_empty_chain() {
        let mut fat = table(&[0xFFF8, 0xFFFF, 0, 0]);
        assert!(fat.free_chain(0).unwrap().is_empty());
    }

    #[test]
    fn test_cycle_detected() {
        let mut fat = table(&[0xFFF8, 0xFFFF, 3, 2]);
        assert!(matches!(fat.free_chain(2), Err(FsError::InvalidDiskImage(_))));
        // nothing was released
        assert_eq!(fat.get_entry(2), FatEntry::Data(3));
    }

    #[test]
    fn test_chain_into_free_entry() {
        let fat = table(&[0xFFF8, 0xFFFF, 3, 0]);
        assert!(matches!(fat.get_cluster_chain(2), Err(FsError::InvalidDiskImage(_))));
    }
}
