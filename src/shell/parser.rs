//! Parser de commandes pour le shell FAT16

/// Commande parsée
#[derive(Debug, PartialEq)]
pub enum Command<'a> {
    Ls,
    Cat(&'a str),
    Attr(&'a str),
    Rename(&'a str, &'a str),
    Insert(&'a str),
    Rm(&'a str),
    Info,
    Help,
    Exit,
    Usage(&'static str),
    Unknown(&'a str),
    Empty,
}

/// Parse une chaîne de commande
pub fn parse_command(input: &str) -> Command<'_> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Command::Empty;
    }

    let mut parts = trimmed.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let arg = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    match cmd.to_ascii_lowercase().as_str() {
        "ls" | "dir" | "list" => Command::Ls,

        "cat" | "type" | "read" => match arg {
            Some(file) => Command::Cat(file),
            None => Command::Usage("cat <file>"),
        },

        "attr" | "stat" => match arg {
            Some(file) => Command::Attr(file),
            None => Command::Usage("attr <file>"),
        },

        "rename" | "mv" | "ren" => {
            match arg.and_then(|a| a.split_once(char::is_whitespace)) {
                Some((old, new)) if !new.trim().is_empty() => Command::Rename(old, new.trim()),
                _ => Command::Usage("rename <file> <new-name>"),
            }
        }

        "insert" | "put" | "copy" => match arg {
            Some(path) => Command::Insert(path),
            None => Command::Usage("insert <host-path>"),
        },

        "rm" | "del" | "delete" => match arg {
            Some(file) => Command::Rm(file),
            None => Command::Usage("rm <file>"),
        },

        "info" | "df" => Command::Info,

        "help" | "?" | "h" => Command::Help,

        "exit" | "quit" | "q" => Command::Exit,

        _ => Command::Unknown(cmd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ls_command() {
        assert!(matches!(parse_command("ls"), Command::Ls));
        assert!(matches!(parse_command("LS"), Command::Ls));
        assert!(matches!(parse_command("dir"), Command::Ls));
    }

    #[test]
    fn test_file_commands() {
        assert_eq!(parse_command("cat README.TXT"), Command::Cat("README.TXT"));
        assert_eq!(parse_command("attr  A.TXT "), Command::Attr("A.TXT"));
        assert_eq!(parse_command("rm OLD.LOG"), Command::Rm("OLD.LOG"));
        assert_eq!(parse_command("insert /tmp/notes.txt"), Command::Insert("/tmp/notes.txt"));
        assert!(matches!(parse_command("cat"), Command::Usage(_)));
    }

    #[test]
    fn test_rename_command() {
        assert_eq!(
            parse_command("rename A.TXT b.txt"),
            Command::Rename("A.TXT", "b.txt")
        );
        assert!(matches!(parse_command("rename A.TXT"), Command::Usage(_)));
        assert!(matches!(parse_command("mv"), Command::Usage(_)));
    }

    #[test]
    fn test_special_commands() {
        assert!(matches!(parse_command("info"), Command::Info));
        assert!(matches!(parse_command("help"), Command::Help));
        assert!(matches!(parse_command("exit"), Command::Exit));
        assert!(matches!(parse_command("quit"), Command::Exit));
    }

    #[test]
    fn test_empty_and_unknown() {
        assert!(matches!(parse_command(""), Command::Empty));
        assert!(matches!(parse_command("   "), Command::Empty));

        if let Command::Unknown(cmd) = parse_command("foobar") {
            assert_eq!(cmd, "foobar");
        } else {
            panic!("Expected Unknown");
        }
    }
}
