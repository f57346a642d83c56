//! Implémentation du système de fichiers FAT16 (répertoire racine, lecture/écriture)

pub mod boot_sector;
pub mod directory;
pub mod error;
pub mod fat;
pub mod host;
pub mod image;
pub mod name;
pub mod time;

pub use boot_sector::BootSector;
pub use directory::{DirEntry, DirSlot, EntryStatus, parse_directory, scan_directory};
pub use directory::{ATTR_READ_ONLY, ATTR_HIDDEN, ATTR_SYSTEM, ATTR_VOLUME_ID,
                   ATTR_DIRECTORY, ATTR_ARCHIVE};
pub use error::{FsError, Result};
pub use fat::{FatTable, FatEntry, END_OF_CHAIN, END_OF_CHAIN_MIN};
pub use name::{ShortName, split_filename};
pub use time::{FatDate, FatTime};

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use directory::{DIR_ENTRY_SIZE, ENTRY_DELETED};
use image::ImageFile;

/// Attributs d'un fichier tels que stockés dans son entrée
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttributes {
    pub file_name: String,
    pub read_only: bool,
    pub hidden: bool,
    pub system: bool,
    pub time_created: FatTime,
    pub date_created: FatDate,
}

/// Image ouverte pour une seule opération, avec sa géométrie et sa table racine
struct Volume {
    image: ImageFile,
    bs: BootSector,
    root_dir: Vec<u8>,
}

impl Volume {
    fn load(mut image: ImageFile) -> Result<Self> {
        let bs = image.boot_sector()?;
        let root_dir = image.read_at(bs.root_dir_start(), bs.root_dir_size())?;
        Ok(Volume { image, bs, root_dir })
    }

    fn fat_table(&mut self) -> Result<FatTable> {
        let data = self.image.read_at(self.bs.fat_start(), self.bs.fat_size())?;
        Ok(FatTable::new(data, self.bs.data_cluster_count()))
    }

    fn write_fat(&mut self, fat: &FatTable) -> Result<()> {
        self.image.write_at(self.bs.fat_start(), fat.as_bytes())
    }

    fn write_entry(&mut self, offset: usize, raw: &[u8]) -> Result<()> {
        self.image.write_at(self.bs.root_dir_start() + offset as u64, raw)
    }

    fn find(&self, name: &str) -> Result<(usize, DirEntry)> {
        directory::find_entry(&self.root_dir, name)
            .ok_or_else(|| FsError::FileNotFound(format!("'{}' not found", name)))
    }
}

/// Interface du système de fichiers FAT16
///
/// Chaque opération ouvre l'image, relit la géométrie, travaille, puis
/// referme l'image. Rien n'est gardé en cache d'un appel à l'autre.
///
/// Un seul écrivain à la fois : les écritures d'entrée et de FAT ne sont
/// pas atomiques entre elles.
pub struct Fat16 {
    image_path: PathBuf,
}

impl Fat16 {
    /// Crée un accès au filesystem contenu dans l'image `image_path`
    pub fn new<P: AsRef<Path>>(image_path: P) -> Result<Self> {
        let image_path = image_path.as_ref().to_path_buf();
        if !image_path.exists() {
            return Err(FsError::FileNotFound(format!(
                "disk image not found: {}",
                image_path.display()
            )));
        }
        Ok(Fat16 { image_path })
    }

    /// Chemin de l'image
    #[inline]
    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    fn open_read(&self) -> Result<Volume> {
        Volume::load(ImageFile::open_read(&self.image_path)?)
    }

    fn open_write(&self) -> Result<Volume> {
        Volume::load(ImageFile::open_write(&self.image_path)?)
    }

    /// Géométrie décodée du boot sector
    pub fn geometry(&self) -> Result<BootSector> {
        ImageFile::open_read(&self.image_path)?.boot_sector()
    }

    /// Liste les fichiers du répertoire racine: (nom complet, taille)
    pub fn list_files(&self) -> Result<Vec<(String, u32)>> {
        let vol = self.open_read()?;
        Ok(parse_directory(&vol.root_dir)
            .iter()
            .map(|e| (e.display_name(), e.size))
            .collect())
    }

    /// Lit le contenu d'un fichier
    ///
    /// Le contenu est lu d'un seul tenant à partir du premier cluster, sur
    /// `size` octets ; la chaîne FAT n'est pas suivie.
    pub fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let mut vol = self.open_read()?;
        let (_, entry) = vol.find(name)?;

        if entry.size == 0 {
            return Ok(Vec::new());
        }
        if entry.first_cluster < fat::FIRST_DATA_CLUSTER {
            return Err(FsError::InvalidDiskImage(format!(
                "'{}' has {} bytes but no data cluster",
                name, entry.size
            )));
        }

        let offset = vol.bs.cluster_offset(entry.first_cluster);
        let image_len = vol.image.size()?;
        match offset.checked_add(entry.size as u64) {
            Some(end) if end <= image_len => {}
            _ => {
                return Err(FsError::InvalidDiskImage(format!(
                    "'{}' claims {} bytes at {:#x}, past the end of the image ({} bytes)",
                    name, entry.size, offset, image_len
                )))
            }
        }
        log::debug!("read {}: {} bytes at {:#x}", name, entry.size, offset);
        vol.image.read_at(offset, entry.size as usize)
    }

    /// Retourne les attributs et dates de création d'un fichier
    pub fn get_file_attributes(&self, name: &str) -> Result<FileAttributes> {
        let vol = self.open_read()?;
        let (_, entry) = vol.find(name)?;

        Ok(FileAttributes {
            file_name: String::from(name),
            read_only: entry.is_read_only(),
            hidden: entry.is_hidden(),
            system: entry.is_system(),
            time_created: entry.time_created(),
            date_created: entry.date_created(),
        })
    }

    /// Renomme un fichier. Retourne `false` si le fichier n'existe pas.
    pub fn rename_file(&self, name: &str, new_name: &str) -> Result<bool> {
        let short = ShortName::parse(new_name).map_err(|e| {
            log::warn!("rename {} refused: {}", name, e);
            e
        })?;

        let mut vol = self.open_write()?;
        let offset = match directory::find_entry(&vol.root_dir, name) {
            Some((offset, _)) => offset,
            None => return Ok(false),
        };

        vol.write_entry(offset, &short.to_bytes())?;
        vol.image.flush()?;
        log::info!("renamed {} to {}", name, short.display_name());
        Ok(true)
    }

    /// Copie un fichier de l'hôte dans l'image
    ///
    /// Le nom 8.3, les attributs et la date de création viennent du fichier
    /// source.
    pub fn insert_file<P: AsRef<Path>>(&self, source: P) -> Result<()> {
        let source = source.as_ref();
        if !source.exists() {
            return Err(FsError::FileNotFound(format!(
                "source file not found: {}",
                source.display()
            )));
        }

        let meta = std::fs::metadata(source).map_err(|e| {
            FsError::FileAccess(format!("cannot stat {}: {}", source.display(), e))
        })?;
        let data = std::fs::read(source).map_err(|e| {
            FsError::FileAccess(format!("cannot read {}: {}", source.display(), e))
        })?;
        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                FsError::InvalidFileName(format!("{} has no usable file name", source.display()))
            })?;

        self.insert_bytes(
            file_name,
            &data,
            host::attributes(source, &meta),
            host::created(&meta),
        )
    }

    /// Écrit `data` comme nouveau fichier `name` dans le répertoire racine
    pub fn insert_bytes(
        &self,
        name: &str,
        data: &[u8],
        attributes: u8,
        created: NaiveDateTime,
    ) -> Result<()> {
        let short = ShortName::parse(name)?;
        let size = u32::try_from(data.len()).map_err(|_| {
            FsError::NotEnoughSpace(format!("{} bytes exceed the FAT16 file size limit", data.len()))
        })?;

        let mut vol = self.open_write()?;
        let cluster_size = vol.bs.cluster_byte_size();
        let clusters_needed = data.len() / cluster_size + usize::from(data.len() % cluster_size != 0);

        let mut fat = vol.fat_table()?;
        let clusters = fat.find_free(clusters_needed);
        if clusters.len() < clusters_needed {
            log::warn!(
                "insert {}: need {} clusters, {} free",
                short.display_name(),
                clusters_needed,
                clusters.len()
            );
            return Err(FsError::NotEnoughSpace(String::from(
                "there are not enough free clusters",
            )));
        }

        let slot = directory::find_reusable_slot(&vol.root_dir).ok_or_else(|| {
            log::warn!("insert {}: root directory is full", short.display_name());
            FsError::NotEnoughSpace(String::from("there are no available directory entries"))
        })?;

        // payload first, then FAT, then the entry that makes it visible
        for (&cluster, chunk) in clusters.iter().zip(data.chunks(cluster_size)) {
            vol.image.write_at(vol.bs.cluster_offset(cluster), chunk)?;
        }
        fat.link_chain(&clusters)?;
        vol.write_fat(&fat)?;

        let first_cluster = clusters.first().copied().unwrap_or(0);
        let entry = DirEntry::new(
            &short,
            attributes,
            FatTime::from(&created),
            FatDate::from(&created),
            first_cluster,
            size,
        );
        vol.write_entry(slot, &entry.to_bytes())?;
        vol.image.flush()?;

        log::info!(
            "inserted {} ({} bytes, clusters {:?}) at slot {}",
            short.display_name(),
            size,
            clusters,
            slot / DIR_ENTRY_SIZE
        );
        Ok(())
    }

    /// Supprime un fichier et libère ses clusters
    ///
    /// Retourne `false` si le fichier n'existe pas.
    pub fn delete_file(&self, name: &str) -> Result<bool> {
        let mut vol = self.open_write()?;
        let (offset, entry) = match directory::find_entry(&vol.root_dir, name) {
            Some(found) => found,
            None => return Ok(false),
        };

        let mut fat = vol.fat_table()?;
        let freed = fat.free_chain(entry.first_cluster)?;

        let mut tombstone = [0u8; DIR_ENTRY_SIZE];
        tombstone[0] = ENTRY_DELETED;
        vol.write_entry(offset, &tombstone)?;
        vol.write_fat(&fat)?;

        let cluster_size = vol.bs.cluster_byte_size();
        for &cluster in &freed {
            vol.image.zero_fill(vol.bs.cluster_offset(cluster), cluster_size)?;
        }
        vol.image.flush()?;

        log::info!("deleted {} (freed clusters {:?})", name, freed);
        Ok(true)
    }

    /// Espace libre en octets
    pub fn free_space(&self) -> Result<u64> {
        let mut vol = self.open_read()?;
        let fat = vol.fat_table()?;
        Ok(fat.count_free_clusters() as u64 * vol.bs.cluster_byte_size() as u64)
    }
}
