//! FAT16 Disk Image Access
//!
//! Direct read/write access to the root directory of a FAT16 disk image
//! file, without mounting it.
//!
//! # Features
//! - Boot sector geometry decoding
//! - Root directory listing, file reading and attribute lookup
//! - Rename, insert and delete with FAT cluster chain maintenance
//! - Interactive shell with ls, cat, attr, rename, insert, rm commands
//!
//! # Limitations
//! - Root directory only, 8.3 names only
//! - Only the first FAT copy is read and written
//! - One writer at a time; mutations are not journaled
//!
//! # Usage
//! ```ignore
//! use fat16_image::Fat16;
//!
//! let fs = Fat16::new("disk.img")?;
//! for (name, size) in fs.list_files()? {
//!     println!("{:>10} {}", size, name);
//! }
//! fs.insert_file("notes.txt")?;
//! let data = fs.read_file("NOTES.TXT")?;
//! fs.delete_file("NOTES.TXT")?;
//! ```
//!
//! # Author
//! Noella IKIREZI - ESGI 4A
//!
//! # References
//! - Microsoft FAT: General Overview of On-Disk Format

pub mod fat16;
pub mod shell;

// Re-export commonly used types at crate root
pub use fat16::{Fat16, FileAttributes, FsError, Result, BootSector, DirEntry};
pub use shell::{Command, Output};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Print library info
pub fn print_info<O: Output>(out: &mut O) {
    out.write_line("FAT16 Disk Image Tool");
    out.write_line(&format!("Version: {}", VERSION));
    out.write_line("Author: Noella IKIREZI - ESGI 4A");
    out.write_line("");
    out.write_line("Features:");
    out.write_line("  - Boot sector parsing");
    out.write_line("  - FAT cluster chain allocation");
    out.write_line("  - Root directory listing and lookup");
    out.write_line("  - File read, rename, insert, delete");
    out.write_line("  - Interactive shell");
}
