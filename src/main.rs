//! FAT16 Shell - accès en ligne de commande à une image disque FAT16

use std::io::{self, BufRead, Write};

use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::OwoColorize;

use fat16_image::shell::run_shell;
use fat16_image::{print_info, Fat16, Output};

struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn write_str(&mut self, s: &str) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(s.as_bytes());
        let _ = stdout.flush();
    }
}

/// Logger stderr, une couleur par niveau
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = record.level();
        let tag = format!("{level:5}");
        let args = record.args();
        match level {
            Level::Error => eprintln!("{} {}", tag.bright_red(), args),
            Level::Warn => eprintln!("{} {}", tag.bright_yellow(), args),
            Level::Info => eprintln!("{} {}", tag.bright_blue(), args),
            Level::Debug => eprintln!("{} {}", tag.bright_cyan(), args),
            Level::Trace => eprintln!("{} {}", tag.bright_magenta(), args),
        }
    }

    fn flush(&self) {}
}

fn init_logger() {
    let level = std::env::var("FAT16_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() {
    init_logger();

    let image_path = match std::env::args().nth(1) {
        Some(p) => p,
        None => {
            eprintln!("Usage: fat16-shell <image>");
            std::process::exit(2);
        }
    };

    let mut output = ConsoleOutput;
    print_info(&mut output);
    output.write_line("");

    let fs = match Fat16::new(&image_path) {
        Ok(fs) => fs,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = fs.geometry() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let stdin = io::stdin();
    run_shell(&fs, &mut output, || {
        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => None,
            Ok(_) => Some(input),
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                None
            }
        }
    });
}
