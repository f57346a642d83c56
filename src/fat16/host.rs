//! Metadata of host files being copied into an image

use std::fs::Metadata;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime};

use super::directory::ATTR_READ_ONLY;
#[cfg(any(unix, windows))]
use super::directory::ATTR_HIDDEN;
#[cfg(windows)]
use super::directory::ATTR_SYSTEM;

/// FAT attribute bits matching the host file's flags
pub fn attributes(path: &Path, meta: &Metadata) -> u8 {
    let mut attr = 0u8;

    if meta.permissions().readonly() {
        attr |= ATTR_READ_ONLY;
    }

    #[cfg(unix)]
    {
        let dotfile = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.starts_with('.'));
        if dotfile {
            attr |= ATTR_HIDDEN;
        }
    }

    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
        const FILE_ATTRIBUTE_SYSTEM: u32 = 0x4;
        let _ = path;
        let flags = meta.file_attributes();
        if flags & FILE_ATTRIBUTE_HIDDEN != 0 {
            attr |= ATTR_HIDDEN;
        }
        if flags & FILE_ATTRIBUTE_SYSTEM != 0 {
            attr |= ATTR_SYSTEM;
        }
    }

    #[cfg(not(any(unix, windows)))]
    let _ = path;

    attr
}

/// Timestamp recorded as the entry's creation time, in local time
///
/// Windows keeps a real creation time. Elsewhere the birth time is the
/// moment of the local copy, so the modification time is used. Falls back
/// to now when neither is available.
pub fn created(meta: &Metadata) -> NaiveDateTime {
    #[cfg(windows)]
    let stamp = meta.created().or_else(|_| meta.modified());
    #[cfg(not(windows))]
    let stamp = meta.modified().or_else(|_| meta.created());

    stamp
        .map(|t| DateTime::<Local>::from(t).naive_local())
        .unwrap_or_else(|_| Local::now().naive_local())
}
