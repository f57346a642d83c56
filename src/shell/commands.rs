//! Implémentation des commandes shell: ls, cat, attr, rename, insert, rm, info, help

use crate::fat16::{Fat16, FsError};

/// Trait pour l'affichage
pub trait Output {
    fn write_str(&mut self, s: &str);

    fn write_line(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\n");
    }
}

/// Sortie accumulée dans une chaîne
#[derive(Default)]
pub struct StringOutput {
    pub buffer: String,
}

impl StringOutput {
    pub fn new() -> Self {
        StringOutput { buffer: String::new() }
    }
}

impl Output for StringOutput {
    fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }
}

fn report<O: Output>(err: &FsError, out: &mut O) {
    out.write_line(&format!("Error [{}]: {}", err.kind(), err.message()));
}

/// Commande ls - liste le répertoire racine
pub fn cmd_ls<O: Output>(fs: &Fat16, out: &mut O) {
    let files = match fs.list_files() {
        Ok(files) => files,
        Err(e) => return report(&e, out),
    };

    if files.is_empty() {
        out.write_line("(empty directory)");
        return;
    }

    let mut total_size = 0u64;
    for (name, size) in &files {
        out.write_line(&format!("{:>10}    {}", size, name));
        total_size += *size as u64;
    }

    out.write_line("");
    out.write_line(&format!("  {} file(s)  {} bytes", files.len(), total_size));
}

/// Commande cat - affiche le contenu d'un fichier
pub fn cmd_cat<O: Output>(fs: &Fat16, filename: &str, out: &mut O) {
    let data = match fs.read_file(filename) {
        Ok(data) => data,
        Err(e) => return report(&e, out),
    };

    if let Ok(text) = core::str::from_utf8(&data) {
        out.write_str(text);
        if !text.is_empty() && !text.ends_with('\n') {
            out.write_str("\n");
        }
    } else {
        hex_dump(&data, out, 256);
    }
}

/// Commande attr - affiche les attributs d'un fichier
pub fn cmd_attr<O: Output>(fs: &Fat16, filename: &str, out: &mut O) {
    match fs.get_file_attributes(filename) {
        Ok(attr) => {
            out.write_line(&format!("Name:      {}", attr.file_name));
            out.write_line(&format!("Read-only: {}", yes_no(attr.read_only)));
            out.write_line(&format!("Hidden:    {}", yes_no(attr.hidden)));
            out.write_line(&format!("System:    {}", yes_no(attr.system)));
            out.write_line(&format!("Created:   {} {}", attr.date_created, attr.time_created));
        }
        Err(e) => report(&e, out),
    }
}

/// Commande rename - renomme un fichier
pub fn cmd_rename<O: Output>(fs: &Fat16, old: &str, new: &str, out: &mut O) {
    match fs.rename_file(old, new) {
        Ok(true) => out.write_line(&format!("Renamed {} -> {}", old, new)),
        Ok(false) => out.write_line("File not found"),
        Err(e) => report(&e, out),
    }
}

/// Commande insert - copie un fichier de l'hôte dans l'image
pub fn cmd_insert<O: Output>(fs: &Fat16, path: &str, out: &mut O) {
    match fs.insert_file(path) {
        Ok(()) => out.write_line(&format!("Inserted {}", path)),
        Err(e) => report(&e, out),
    }
}

/// Commande rm - supprime un fichier
pub fn cmd_rm<O: Output>(fs: &Fat16, filename: &str, out: &mut O) {
    match fs.delete_file(filename) {
        Ok(true) => out.write_line(&format!("Deleted {}", filename)),
        Ok(false) => out.write_line("File not found"),
        Err(e) => report(&e, out),
    }
}

/// Commande info - géométrie et espace libre
pub fn cmd_info<O: Output>(fs: &Fat16, out: &mut O) {
    let bs = match fs.geometry() {
        Ok(bs) => bs,
        Err(e) => return report(&e, out),
    };
    out.write_line(&format!("Image:            {}", fs.image_path().display()));
    out.write_line(&format!("Bytes/sector:     {}", bs.bytes_per_sector));
    out.write_line(&format!("Sectors/cluster:  {}", bs.sectors_per_cluster));
    out.write_line(&format!("Reserved sectors: {}", bs.reserved_sectors));
    out.write_line(&format!("FATs:             {} x {} sectors", bs.number_of_fats, bs.sectors_per_fat));
    out.write_line(&format!("Root entries:     {}", bs.root_dir_entries));
    match fs.free_space() {
        Ok(free) => out.write_line(&format!("Free space:       {} bytes", free)),
        Err(e) => report(&e, out),
    }
}

/// Commande help - affiche l'aide
pub fn cmd_help<O: Output>(out: &mut O) {
    out.write_line("FAT16 Shell Commands:");
    out.write_line("");
    out.write_line("  ls                 - List root directory");
    out.write_line("  cat <file>         - Display file contents");
    out.write_line("  attr <file>        - Show file attributes");
    out.write_line("  rename <file> <new>- Rename a file");
    out.write_line("  insert <host-path> - Copy a host file into the image");
    out.write_line("  rm <file>          - Delete a file");
    out.write_line("  info               - Show volume geometry");
    out.write_line("  help               - Show this help");
    out.write_line("  exit               - Exit shell");
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Affiche un dump hexadécimal
fn hex_dump<O: Output>(data: &[u8], out: &mut O, max_bytes: usize) {
    let display_len = data.len().min(max_bytes);

    for (i, chunk) in data[..display_len].chunks(16).enumerate() {
        let mut line = format!("{:08X}:  ", i * 16);

        for (j, byte) in chunk.iter().enumerate() {
            line.push_str(&format!("{:02X} ", byte));
            if j == 7 {
                line.push(' ');
            }
        }

        for j in chunk.len()..16 {
            line.push_str("   ");
            if j == 7 {
                line.push(' ');
            }
        }

        line.push_str(" |");
        line.extend(chunk.iter().map(|&b| if (0x20..=0x7E).contains(&b) { b as char } else { '.' }));
        line.push('|');
        out.write_line(&line);
    }

    if data.len() > max_bytes {
        out.write_line(&format!("... ({} more bytes)", data.len() - max_bytes));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_dump() {
        let mut out = StringOutput::new();
        hex_dump(&[0x41, 0x00, 0xFF], &mut out, 256);
        assert!(out.buffer.starts_with("00000000:  41 00 FF "));
        assert!(out.buffer.trim_end().ends_with("|A..|"));
    }

    #[test]
    fn test_hex_dump_truncates() {
        let mut out = StringOutput::new();
        hex_dump(&[0u8; 40], &mut out, 16);
        assert_eq!(out.buffer.lines().count(), 2);
        assert!(out.buffer.contains("(24 more bytes)"));
    }

    #[test]
    fn test_help_lists_commands() {
        let mut out = StringOutput::new();
        cmd_help(&mut out);
        for cmd in ["ls", "cat", "attr", "rename", "insert", "rm", "info"] {
            assert!(out.buffer.contains(cmd));
        }
    }
}
