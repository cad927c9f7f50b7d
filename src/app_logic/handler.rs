/*
 * Turns one line of user input into an action on the `TallySession`. Lines are
 * split into words (double quotes group words) and parsed with clap, so the
 * command set, its help text and its error messages all come from the
 * `TallyCommand` definition below. The handler never prints; it returns the text
 * the front end should show.
 */
use super::session::{SessionError, TallySession};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    no_binary_name = true,
    disable_version_flag = true
)]
struct CommandLine {
    #[command(subcommand)]
    command: TallyCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TallyCommand {
    /// Show the ranked list
    #[command(alias = "ls")]
    List,
    /// Add an entry starting at 0 points
    Add {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        name: Vec<String>,
    },
    /// Select an entry by name (no name clears the selection)
    Select {
        #[arg(allow_hyphen_values = true)]
        name: Vec<String>,
    },
    /// Give the selected entry one more point
    Inc,
    /// Take one point from the selected entry
    Dec,
    /// Rename the selected entry
    Rename {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        new_name: Vec<String>,
    },
    /// Change the list title
    Title {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Open a tally file
    Open { path: PathBuf },
    /// Create a new, empty tally file and switch to it
    New { path: PathBuf },
    /// Write the list to the current file
    Save,
    /// Show the dump without updating the change baseline
    Preview,
    /// Show the dump and make the current ranking the new baseline
    Copy,
    /// Leave the program
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug)]
pub enum HandlerError {
    Parse(clap::Error),
    Session(SessionError),
}

impl From<SessionError> for HandlerError {
    fn from(err: SessionError) -> Self {
        HandlerError::Session(err)
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerError::Parse(e) => write!(f, "{}", e.render().to_string().trim_end()),
            HandlerError::Session(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandlerError::Parse(e) => Some(e),
            HandlerError::Session(e) => Some(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Nothing,
    Text(String),
    Quit,
}

/*
 * Splits a command line into words on whitespace. A double-quoted run is kept
 * as one word (quotes removed); an unterminated quote extends to end of line.
 */
pub fn split_command_line(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_word = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_word = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_word {
                    words.push(std::mem::take(&mut current));
                    has_word = false;
                }
            }
            c => {
                current.push(c);
                has_word = true;
            }
        }
    }
    if has_word {
        words.push(current);
    }
    words
}

pub fn parse_command(line: &str) -> Result<Option<TallyCommand>, HandlerError> {
    let words = split_command_line(line);
    if words.is_empty() {
        return Ok(None);
    }
    CommandLine::try_parse_from(words)
        .map(|parsed| Some(parsed.command))
        .map_err(HandlerError::Parse)
}

pub fn render_list(session: &TallySession) -> String {
    let rows = session.list_rows();
    let mut lines = vec![format!("{}  [{}]", session.title(), session.window_title())];
    if rows.is_empty() {
        lines.push("  (No entries)".to_string());
    }
    for row in rows {
        let marker = if row.is_selected { '>' } else { ' ' };
        lines.push(format!("{marker} {}", row.text));
    }
    lines.join("\n")
}

pub fn execute(session: &mut TallySession, command: TallyCommand) -> Result<Reply, HandlerError> {
    log::trace!("Handler: Executing {command:?}");
    let reply = match command {
        TallyCommand::List => Reply::Text(render_list(session)),
        TallyCommand::Add { name } => {
            session.add_entry(&name.join(" "))?;
            Reply::Text(render_list(session))
        }
        TallyCommand::Select { name } => {
            if name.is_empty() {
                session.clear_selection();
            } else {
                session.select(&name.join(" "))?;
            }
            Reply::Text(render_list(session))
        }
        TallyCommand::Inc => {
            session.increment_selected()?;
            Reply::Text(render_list(session))
        }
        TallyCommand::Dec => {
            session.decrement_selected()?;
            Reply::Text(render_list(session))
        }
        TallyCommand::Rename { new_name } => {
            session.rename_selected(&new_name.join(" "))?;
            Reply::Text(render_list(session))
        }
        TallyCommand::Title { text } => {
            session.set_title(&text.join(" "));
            Reply::Nothing
        }
        TallyCommand::Open { path } => {
            session.open_file(&path)?;
            Reply::Text(format!(
                "Loaded file: {}\n{}",
                path.display(),
                render_list(session)
            ))
        }
        TallyCommand::New { path } => {
            let created = session.create_file(&path)?;
            Reply::Text(format!("Created new file: {}", created.display()))
        }
        TallyCommand::Save => {
            let path = session.save()?;
            Reply::Text(format!("Updated file: {}", path.display()))
        }
        TallyCommand::Preview => Reply::Text(session.preview_dump()),
        TallyCommand::Copy => Reply::Text(session.commit_dump()),
        TallyCommand::Quit => Reply::Quit,
    };
    Ok(reply)
}

pub fn handle_line(session: &mut TallySession, line: &str) -> Result<Reply, HandlerError> {
    match parse_command(line)? {
        Some(command) => execute(session, command),
        None => Ok(Reply::Nothing),
    }
}
