//! Shell Module for FAT16 images
//!
//! Provides a command-line interface over the root directory of a
//! FAT16 disk image.
//!
//! # Commands
//! - `ls` - List root directory
//! - `cat` - Display file contents
//! - `attr` - Show file attributes
//! - `rename` - Rename a file
//! - `insert` - Copy a host file into the image
//! - `rm` - Delete a file
//! - `info` - Show volume geometry
//! - `help` - Show help
//! - `exit` - Exit shell

pub mod parser;
pub mod commands;

pub use parser::{Command, parse_command};
pub use commands::{Output, StringOutput, cmd_ls, cmd_cat, cmd_attr, cmd_rename,
                   cmd_insert, cmd_rm, cmd_info, cmd_help};

use crate::fat16::Fat16;

/// Main shell loop
///
/// Runs an interactive shell for the given filesystem.
///
/// # Arguments
/// * `fs` - FAT16 filesystem to operate on
/// * `out` - Output device
/// * `get_input` - Function to get user input, `None` on end of input
pub fn run_shell<O, F>(fs: &Fat16, out: &mut O, mut get_input: F)
where
    O: Output,
    F: FnMut() -> Option<String>,
{
    out.write_line("FAT16 Shell - Type 'help' for commands");
    out.write_line("");

    loop {
        out.write_str("fat16> ");

        let input = match get_input() {
            Some(s) => s,
            None => break, // EOF or error
        };

        if !execute_command(fs, &input, out) {
            out.write_line("Goodbye!");
            break;
        }

        out.write_line("");
    }
}

/// Execute a single command
///
/// For non-interactive use or scripting.
///
/// # Returns
/// `false` if exit command was given, `true` otherwise
pub fn execute_command<O: Output>(fs: &Fat16, input: &str, out: &mut O) -> bool {
    match parse_command(input) {
        Command::Ls => cmd_ls(fs, out),
        Command::Cat(file) => cmd_cat(fs, file, out),
        Command::Attr(file) => cmd_attr(fs, file, out),
        Command::Rename(old, new) => cmd_rename(fs, old, new, out),
        Command::Insert(path) => cmd_insert(fs, path, out),
        Command::Rm(file) => cmd_rm(fs, file, out),
        Command::Info => cmd_info(fs, out),
        Command::Help => cmd_help(out),
        Command::Exit => return false,
        Command::Usage(usage) => out.write_line(&format!("Usage: {}", usage)),
        Command::Unknown(cmd) => {
            out.write_line(&format!("Unknown command: {}", cmd));
            out.write_line("Type 'help' for available commands");
        }
        Command::Empty => {}
    }
    true
}
