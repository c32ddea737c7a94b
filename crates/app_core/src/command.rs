//! Shell command parsing

use crate::content::DEFAULT_TAIL_LINES;
use crate::AppError;

/// Parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `ls [path]`
    Ls(Option<String>),
    /// `cd [path]`
    Cd(Option<String>),
    /// `tail [-n N | -N] <file>`
    Tail { path: String, lines: usize },
    /// `mv <source> <destination>`
    Mv { source: String, destination: String },
    /// `rev <file>`
    Rev(String),
    /// `pwd`
    Pwd,
    /// `exit`
    Exit,
}

impl Command {
    pub const LS: &'static str = "ls";
    pub const CD: &'static str = "cd";
    pub const TAIL: &'static str = "tail";
    pub const MV: &'static str = "mv";
    pub const REV: &'static str = "rev";
    pub const PWD: &'static str = "pwd";
    pub const EXIT: &'static str = "exit";

    /// Parse a command line
    ///
    /// Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, AppError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match name {
            Self::LS => Command::Ls(optional_arg(&args, "ls [path]")?),
            Self::CD => Command::Cd(optional_arg(&args, "cd [path]")?),
            Self::TAIL => parse_tail(&args)?,
            Self::MV => match args.as_slice() {
                [source, destination] => Command::Mv {
                    source: source.to_string(),
                    destination: destination.to_string(),
                },
                _ => return Err(usage("mv <source> <destination>")),
            },
            Self::REV => match args.as_slice() {
                [path] => Command::Rev(path.to_string()),
                _ => return Err(usage("rev <file>")),
            },
            Self::PWD => no_args(&args, Command::Pwd, "pwd")?,
            Self::EXIT => no_args(&args, Command::Exit, "exit")?,
            other => {
                return Err(AppError::MalformedCommand(format!(
                    "{}: command not found",
                    other
                )))
            }
        };

        Ok(Some(command))
    }

    /// Command name as typed
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ls(_) => Self::LS,
            Command::Cd(_) => Self::CD,
            Command::Tail { .. } => Self::TAIL,
            Command::Mv { .. } => Self::MV,
            Command::Rev(_) => Self::REV,
            Command::Pwd => Self::PWD,
            Command::Exit => Self::EXIT,
        }
    }
}

fn usage(text: &str) -> AppError {
    AppError::MalformedCommand(format!("usage: {}", text))
}

fn optional_arg(args: &[&str], text: &str) -> Result<Option<String>, AppError> {
    match args {
        [] => Ok(None),
        [path] => Ok(Some(path.to_string())),
        _ => Err(usage(text)),
    }
}

fn no_args(args: &[&str], command: Command, text: &str) -> Result<Command, AppError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(usage(text))
    }
}

fn parse_tail(args: &[&str]) -> Result<Command, AppError> {
    const TEXT: &str = "tail [-n N | -N] <file>";

    let count = |value: &str| value.parse::<usize>().map_err(|_| usage(TEXT));

    let (lines, path) = match args {
        [path] if !path.starts_with('-') => (DEFAULT_TAIL_LINES, *path),
        ["-n", n, path] => (count(*n)?, *path),
        [flag, path] if flag.starts_with('-') => (count(&flag[1..])?, *path),
        _ => return Err(usage(TEXT)),
    };

    Ok(Command::Tail {
        path: path.to_string(),
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   \t ").unwrap(), None);
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("ls"), Command::Ls(None));
        assert_eq!(parse("ls dir1"), Command::Ls(Some("dir1".into())));
        assert_eq!(parse("  cd   папка1 "), Command::Cd(Some("папка1".into())));
        assert_eq!(parse("cd"), Command::Cd(None));
        assert_eq!(parse("rev file1.txt"), Command::Rev("file1.txt".into()));
        assert_eq!(parse("pwd"), Command::Pwd);
        assert_eq!(parse("exit"), Command::Exit);
    }

    #[test]
    fn test_tail_variants() {
        assert_eq!(
            parse("tail file1.txt"),
            Command::Tail { path: "file1.txt".into(), lines: 10 }
        );
        assert_eq!(
            parse("tail -n 3 file1.txt"),
            Command::Tail { path: "file1.txt".into(), lines: 3 }
        );
        assert_eq!(
            parse("tail -5 file1.txt"),
            Command::Tail { path: "file1.txt".into(), lines: 5 }
        );
    }

    #[test]
    fn test_mv() {
        assert_eq!(
            parse("mv file1.txt dir1/file1_renamed.txt"),
            Command::Mv {
                source: "file1.txt".into(),
                destination: "dir1/file1_renamed.txt".into(),
            }
        );
        assert_eq!(parse("mv a b").name(), "mv");
    }

    #[test]
    fn test_malformed() {
        let lines = [
            "mv onlyone",
            "mv a b c",
            "rev",
            "tail",
            "tail -x f",
            "tail -n f",
            "pwd now",
            "cd a b",
        ];
        for line in lines {
            let err = Command::parse(line).unwrap_err();
            assert!(
                matches!(err, AppError::MalformedCommand(ref m) if m.starts_with("usage:")),
                "{}",
                line
            );
        }
    }

    #[test]
    fn test_unknown_command() {
        let err = Command::parse("rm -rf /").unwrap_err();
        assert!(matches!(err, AppError::MalformedCommand(ref m) if m == "rm: command not found"));
    }
}
