//! 8.3 short name normalization

use super::error::{FsError, Result};

/// Width of the base name field
pub const NAME_LEN: usize = 8;
/// Width of the extension field
pub const EXT_LEN: usize = 3;

const FORBIDDEN: &[char] = &['"', '*', '+', ',', '/', ':', ';', '<', '=', '>', '?', '[', '\\', ']', '|'];

/// Normalized 8.3 name (upper-case, truncated, unpadded)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortName {
    pub name: String,
    pub ext: String,
}

impl ShortName {
    /// Normalize a human filename
    pub fn parse(filename: &str) -> Result<Self> {
        if let Some(c) = filename
            .chars()
            .find(|c| !c.is_ascii() || c.is_ascii_control() || FORBIDDEN.contains(c))
        {
            return Err(FsError::InvalidFileName(format!(
                "'{}' contains invalid character {:?}",
                filename, c
            )));
        }

        let (name, ext) = split_filename(filename);
        if name.trim().is_empty() {
            return Err(FsError::InvalidFileName(format!("'{}' has an empty name part", filename)));
        }
        // a leading space reads back as padding
        if name.starts_with(' ') || ext.starts_with(' ') {
            return Err(FsError::InvalidFileName(format!("'{}' starts a field with a space", filename)));
        }

        Ok(ShortName { name, ext })
    }

    /// Space-padded 11-byte field as stored in a directory entry
    pub fn to_bytes(&self) -> [u8; NAME_LEN + EXT_LEN] {
        let mut out = [b' '; NAME_LEN + EXT_LEN];
        for (slot, b) in out[..NAME_LEN].iter_mut().zip(self.name.bytes()) {
            *slot = b;
        }
        for (slot, b) in out[NAME_LEN..].iter_mut().zip(self.ext.bytes()) {
            *slot = b;
        }
        out
    }

    /// `NAME.EXT`, or `NAME` when there is no extension
    pub fn display_name(&self) -> String {
        if self.ext.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.ext)
        }
    }
}

/// Split a filename at its first `.` into an upper-cased, truncated
/// (name, extension) pair. No validation.
pub fn split_filename(filename: &str) -> (String, String) {
    match filename.split_once('.') {
        Some((name, ext)) => (
            name.chars().take(NAME_LEN).collect::<String>().to_ascii_uppercase(),
            ext.chars().take(EXT_LEN).collect::<String>().to_ascii_uppercase(),
        ),
        None => (
            filename.chars().take(NAME_LEN).collect::<String>().to_ascii_uppercase(),
            String::new(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        assert_eq!(split_filename("readme.txt"), (String::from("README"), String::from("TXT")));
        assert_eq!(split_filename("noext"), (String::from("NOEXT"), String::new()));
        assert_eq!(
            split_filename("verylongname.text"),
            (String::from("VERYLONG"), String::from("TEX"))
        );
        assert_eq!(split_filename("a.tar.gz"), (String::from("A"), String::from("TAR")));
    }

    #[test]
    fn test_to_bytes() {
        let sn = ShortName::parse("hello.c").unwrap();
        assert_eq!(&sn.to_bytes(), b"HELLO   C  ");
        assert_eq!(sn.display_name(), "HELLO.C");

        let sn = ShortName::parse("kernel").unwrap();
        assert_eq!(&sn.to_bytes(), b"KERNEL     ");
        assert_eq!(sn.display_name(), "KERNEL");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(ShortName::parse(""), Err(FsError::InvalidFileName(_))));
        assert!(matches!(ShortName::parse(".txt"), Err(FsError::InvalidFileName(_))));
        assert!(matches!(ShortName::parse("   .txt"), Err(FsError::InvalidFileName(_))));
        assert!(matches!(ShortName::parse("        "), Err(FsError::InvalidFileName(_))));
    }

    #[test]
    fn test_leading_space_rejected() {
        assert!(matches!(ShortName::parse(" a.txt"), Err(FsError::InvalidFileName(_))));
        assert!(matches!(ShortName::parse("a. tx"), Err(FsError::InvalidFileName(_))));
        // inner spaces are kept
        assert_eq!(ShortName::parse("my doc.txt").unwrap().display_name(), "MY DOC.TXT");
    }

    #[test]
    fn test_invalid_characters_rejected() {
        assert!(matches!(ShortName::parse("a*b.txt"), Err(FsError::InvalidFileName(_))));
        assert!(matches!(ShortName::parse("dir/file"), Err(FsError::InvalidFileName(_))));
        assert!(matches!(ShortName::parse("café.txt"), Err(FsError::InvalidFileName(_))));
    }
}
