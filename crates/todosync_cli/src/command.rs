//! Line commands read from stdin.

use todosync_core::{Filter, SortAxis};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Title is kept as typed after the command word.
    Add(String),
    Toggle(String),
    Delete(String),
    Filter(Filter),
    Sort(SortAxis),
    Draft(String),
    Submit,
    Dismiss,
    List,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  add <title>                      create an item
  toggle <id>                      flip completed
  delete <id>                      remove an item
  filter <all|active|completed>    choose visible items
  sort <title|time>                advance a sort control
  draft <text>                     set the draft input
  submit                           create from the draft
  dismiss                          clear the last error
  list                             print the list
  help                             print this text
  quit                             exit";

/// Parses one input line. Empty lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(None);
    }

    let (word, rest) = match trimmed.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "add" => Command::Add(rest.to_string()),
        "toggle" => Command::Toggle(required_id(rest, word)?),
        "delete" | "rm" => Command::Delete(required_id(rest, word)?),
        "filter" => Command::Filter(
            rest.trim()
                .parse::<Filter>()
                .map_err(|err| err.to_string())?,
        ),
        "sort" => match rest.trim().to_ascii_lowercase().as_str() {
            "title" => Command::Sort(SortAxis::Title),
            "time" => Command::Sort(SortAxis::Time),
            other => return Err(format!("unknown sort control `{other}`; expected title|time")),
        },
        "draft" => Command::Draft(rest.to_string()),
        "submit" => Command::Submit,
        "dismiss" => Command::Dismiss,
        "list" | "ls" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}`; try `help`")),
    };
    Ok(Some(command))
}

fn required_id(rest: &str, word: &str) -> Result<String, String> {
    let id = rest.trim();
    if id.is_empty() || id.contains(char::is_whitespace) {
        return Err(format!("`{word}` expects exactly one id"));
    }
    Ok(id.to_string())
}
