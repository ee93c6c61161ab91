use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pt",
    about = concat!("[ ] pintask v", env!("CARGO_PKG_VERSION"), " - a to-do list on top"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory (default: $PINTASK_DIR, then the platform data dir)
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks in display order
    List(ListArgs),
    /// Add a task to the end of the list
    Add(AddArgs),
    /// Mark a task done
    Done(IdArgs),
    /// Change a task's title (a blank title removes it)
    Rename(RenameArgs),
    /// Remove a task
    Rm(IdArgs),
    /// Show the saved window placement
    Window,
    /// Show the recovery log
    Log(LogCmd),
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only open tasks
    #[arg(long, conflicts_with = "done")]
    pub open: bool,
    /// Only completed tasks
    #[arg(long)]
    pub done: bool,
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task id, or a unique prefix of one
    pub id: String,
}

#[derive(Args)]
pub struct RenameArgs {
    /// Task id, or a unique prefix of one
    pub id: String,
    /// New title (words are joined with spaces)
    #[arg(num_args = 0..)]
    pub title: Vec<String>,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LogCmd {
    #[command(subcommand)]
    pub action: Option<LogAction>,
    /// Show only the N most recent entries
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum LogAction {
    /// Remove entries older than 30 days
    Prune(LogPruneArgs),
    /// Print the log file path
    Path,
}

#[derive(Args)]
pub struct LogPruneArgs {
    /// Remove every entry
    #[arg(long)]
    pub all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_joins_words() {
        let cli = Cli::try_parse_from(["pt", "add", "Buy", "milk"]).unwrap();
        match cli.command {
            Some(Commands::Add(args)) => assert_eq!(args.title.join(" "), "Buy milk"),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pt", "list", "--json", "--data-dir", "/tmp/x"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn add_requires_a_title() {
        assert!(Cli::try_parse_from(["pt", "add"]).is_err());
    }

    #[test]
    fn log_prune_all() {
        let cli = Cli::try_parse_from(["pt", "log", "prune", "--all"]).unwrap();
        match cli.command {
            Some(Commands::Log(LogCmd {
                action: Some(LogAction::Prune(args)),
                ..
            })) => assert!(args.all),
            _ => panic!("expected log prune"),
        }
    }
}
