//! Interactive command loop

use anyhow::Result;
use app_core::{AppError, Command, Outcome, ShellConfig, ShellState};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

const COMMANDS: [&str; 7] = [
    Command::LS,
    Command::CD,
    Command::TAIL,
    Command::MV,
    Command::REV,
    Command::PWD,
    Command::EXIT,
];

/// Completes command names in the first word of the line
struct CommandCompleter;

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        if prefix.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }

        let candidates = COMMANDS
            .iter()
            .filter(|name| name.starts_with(prefix))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: format!("{} ", name),
            })
            .collect();

        Ok((0, candidates))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}

/// What the loop does after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Run the shell until `exit`, Ctrl-D or Ctrl-C
pub fn run(config: &ShellConfig, mut state: ShellState) -> Result<()> {
    let mut rl: Editor<CommandCompleter, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CommandCompleter));

    let identity = config.prompt_identity();

    loop {
        let prompt = format!("{} {}$ ", identity, state.current_dir());

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                if let Flow::Stop = dispatch(&mut state, line) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                tracing::debug!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(e) => {
                tracing::error!("Readline failed: {}", e);
                drop(state);
                return Err(e.into());
            }
        }
    }

    drop(state);
    println!("Goodbye!");
    Ok(())
}

fn dispatch(state: &mut ShellState, line: &str) -> Flow {
    let command = match Command::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Flow::Continue,
        Err(e) => return report(&e, line.split_whitespace().next().unwrap_or_default()),
    };

    let name = command.name();
    match state.execute(command) {
        Ok(outcome) => print_outcome(outcome),
        Err(e) => report(&e, name),
    }
}

fn print_outcome(outcome: Outcome) -> Flow {
    match outcome {
        Outcome::Listing(names) if names.is_empty() => println!("Directory is empty."),
        Outcome::Listing(names) => {
            for name in names {
                println!("{}", name);
            }
        }
        Outcome::Text(text) => {
            print!("{}", text);
            if !text.is_empty() && !text.ends_with('\n') {
                println!();
            }
        }
        Outcome::Moved { from, to } => println!("{} moved to {}", from, to),
        Outcome::Path(path) => println!("{}", path),
        Outcome::Silent => {}
        Outcome::Exit => return Flow::Stop,
    }
    Flow::Continue
}

/// Print an error; the session ends only on errors it cannot recover from
fn report(error: &AppError, command: &str) -> Flow {
    eprintln!("{}", error.user_message(command));

    if error.is_recoverable() {
        tracing::debug!("{} failed: {:?}", command, error);
        Flow::Continue
    } else {
        tracing::error!("{} failed, ending session: {}", command, error);
        Flow::Stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_keeps_session_on_command_errors() {
        let errors = [
            AppError::NotFound("ghost.txt".into()),
            AppError::NotADirectory("/file1.txt".into()),
            AppError::MalformedCommand("usage: rev <file>".into()),
            AppError::Archive("Short read".into()),
        ];
        for error in &errors {
            assert_eq!(report(error, "tail"), Flow::Continue);
        }
    }

    #[test]
    fn test_report_ends_session_on_fatal_errors() {
        assert_eq!(report(&AppError::Init("archive gone".into()), "ls"), Flow::Stop);
        assert_eq!(report(&AppError::Config("bad".into()), "ls"), Flow::Stop);
    }

    #[test]
    fn test_completer_candidates() {
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (start, pairs) = CommandCompleter.complete("ta", 2, &ctx).unwrap();
        assert_eq!(start, 0);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].replacement, "tail ");

        let (_, pairs) = CommandCompleter.complete("cd di", 5, &ctx).unwrap();
        assert!(pairs.is_empty());
    }
}
