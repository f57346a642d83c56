//! Error taxonomy for FAT16 image operations
//!
//! Every failure surfaced by the crate is one `FsError`. Raw I/O faults
//! never escape: they are converted into `FsError::FileAccess`.

use core::fmt;
use std::io;

/// FAT16 filesystem error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    /// Boot sector unreadable or malformed, or a corrupted cluster chain
    InvalidDiskImage(String),
    /// No matching directory entry (or a missing image/source file)
    FileNotFound(String),
    /// Name empty after normalization or containing forbidden characters
    InvalidFileName(String),
    /// Not enough free clusters or no free directory slot
    NotEnoughSpace(String),
    /// Underlying I/O failure
    FileAccess(String),
}

impl FsError {
    /// Name of the error kind, without its message
    pub fn kind(&self) -> &'static str {
        match self {
            FsError::InvalidDiskImage(_) => "InvalidDiskImage",
            FsError::FileNotFound(_) => "FileNotFound",
            FsError::InvalidFileName(_) => "InvalidFileName",
            FsError::NotEnoughSpace(_) => "NotEnoughSpace",
            FsError::FileAccess(_) => "FileAccess",
        }
    }

    /// Message attached to the error
    pub fn message(&self) -> &str {
        match self {
            FsError::InvalidDiskImage(m)
            | FsError::FileNotFound(m)
            | FsError::InvalidFileName(m)
            | FsError::NotEnoughSpace(m)
            | FsError::FileAccess(m) => m,
        }
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::InvalidDiskImage(m) => write!(f, "invalid disk image: {}", m),
            FsError::FileNotFound(m) => write!(f, "file not found: {}", m),
            FsError::InvalidFileName(m) => write!(f, "invalid file name: {}", m),
            FsError::NotEnoughSpace(m) => write!(f, "not enough space: {}", m),
            FsError::FileAccess(m) => write!(f, "file access error: {}", m),
        }
    }
}

impl std::error::Error for FsError {}

impl From<io::Error> for FsError {
    fn from(e: io::Error) -> Self {
        FsError::FileAccess(e.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = core::result::Result<T, FsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_becomes_file_access() {
        let err: FsError = io::Error::new(io::ErrorKind::UnexpectedEof, "short read").into();
        assert_eq!(err.kind(), "FileAccess");
        assert_eq!(err.message(), "short read");
    }

    #[test]
    fn test_display() {
        let err = FsError::FileNotFound(String::from("A.TXT"));
        assert_eq!(err.to_string(), "file not found: A.TXT");
    }
}
