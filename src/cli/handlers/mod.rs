use std::error::Error;
use std::path::Path;

use chrono::Utc;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::read_config;
use crate::io::recovery::{prune_recovery, read_recovery_entries, recovery_log_path};
use crate::io::storage::{JsonStorage, Storage, resolve_data_dir};
use crate::model::task::TaskCollection;
use crate::ops::task_ops;

/// Entries shown by `pt log` when no limit is given
const DEFAULT_LOG_LIMIT: usize = 20;

/// Run a subcommand. `pt` with no subcommand is handled in main.rs.
pub fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    let json = cli.json;
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;

    match cli.command {
        None => Ok(()),
        Some(cmd) => match cmd {
            // Read commands
            Commands::List(args) => cmd_list(&data_dir, args, json),
            Commands::Window => cmd_window(&data_dir, json),
            Commands::Log(args) => cmd_log(&data_dir, args, json),

            // Write commands
            Commands::Add(args) => cmd_add(&data_dir, args, json),
            Commands::Done(args) => cmd_done(&data_dir, args, json),
            Commands::Rename(args) => cmd_rename(&data_dir, args, json),
            Commands::Rm(args) => cmd_rm(&data_dir, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_task(tasks: &TaskCollection, id: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let task = tasks
        .find(id)
        .ok_or_else(|| task_ops::TaskError::NotFound(id.to_string()))?;
    if json {
        print_json(&task_to_json(task))
    } else {
        println!("{}", task.id);
        Ok(())
    }
}

fn print_removed(id: &str, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        print_json(&RemovedJson {
            removed: id.to_string(),
        })
    } else {
        println!("removed {}", id);
        Ok(())
    }
}

/// Load, resolve the id, and hand both to `f`. A record that fails to load
/// stops the command before anything is written.
fn with_task<F>(data_dir: &Path, needle: &str, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&JsonStorage, &TaskCollection, &str) -> Result<(), Box<dyn Error>>,
{
    let storage = JsonStorage::new(data_dir);
    let tasks = storage.read_tasks()?;
    let id = task_ops::resolve_task_id(&tasks, needle)?;
    f(&storage, &tasks, &id)
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(data_dir: &Path, args: ListArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let tasks = JsonStorage::new(data_dir).read_tasks()?;
    let shown = tasks.todos.iter().filter(|t| {
        if args.open {
            !t.completed
        } else if args.done {
            t.completed
        } else {
            true
        }
    });

    if json {
        let out: Vec<TaskJson> = shown.map(task_to_json).collect();
        return print_json(&out);
    }
    for task in shown {
        println!("{}", format_task_line(task));
    }
    Ok(())
}

fn cmd_window(data_dir: &Path, json: bool) -> Result<(), Box<dyn Error>> {
    let saved = JsonStorage::new(data_dir).read_window_state()?;
    let (geometry, is_saved) = match saved {
        Some(g) => (g, true),
        None => (read_config(data_dir)?.window.default_geometry(), false),
    };
    if json {
        print_json(&window_to_json(&geometry, is_saved))
    } else {
        println!("{}", format_window(&geometry, is_saved));
        Ok(())
    }
}

fn cmd_log(data_dir: &Path, args: LogCmd, json: bool) -> Result<(), Box<dyn Error>> {
    match args.action {
        Some(LogAction::Prune(prune)) => {
            let removed = prune_recovery(data_dir, prune.all)?;
            if json {
                print_json(&serde_json::json!({ "pruned": removed }))
            } else {
                println!("pruned {} entries", removed);
                Ok(())
            }
        }
        Some(LogAction::Path) => {
            println!("{}", recovery_log_path(data_dir).display());
            Ok(())
        }
        None => {
            let limit = args.limit.unwrap_or(DEFAULT_LOG_LIMIT);
            let entries = read_recovery_entries(data_dir, Some(limit));
            if json {
                let out: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
                return print_json(&out);
            }
            if entries.is_empty() {
                println!("no recovery entries");
            }
            for entry in &entries {
                print!("{}", entry.to_display_markdown());
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(data_dir: &Path, args: AddArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let storage = JsonStorage::new(data_dir);
    let tasks = storage.read_tasks()?;
    let now = Utc::now();
    let id = task_ops::new_task_id(now.timestamp_millis());
    let title = args.title.join(" ");

    let next = task_ops::add_task(&tasks, &title, id.clone(), now.timestamp())
        .ok_or("task title is empty")?;
    storage.write_tasks(&next)?;
    print_task(&next, &id, json)
}

fn cmd_done(data_dir: &Path, args: IdArgs, json: bool) -> Result<(), Box<dyn Error>> {
    with_task(data_dir, &args.id, |storage, tasks, id| {
        match task_ops::complete_task(tasks, id, Utc::now().timestamp()) {
            Some(next) => {
                storage.write_tasks(&next)?;
                print_task(&next, id, json)
            }
            None => {
                if !json {
                    eprintln!("{} is already done", id);
                }
                print_task(tasks, id, json)
            }
        }
    })
}

fn cmd_rename(data_dir: &Path, args: RenameArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let title = args.title.join(" ");
    with_task(data_dir, &args.id, |storage, tasks, id| {
        let Some(next) = task_ops::rename_task(tasks, id, &title, Utc::now().timestamp()) else {
            return print_task(tasks, id, json);
        };
        storage.write_tasks(&next)?;
        if next.find(id).is_some() {
            print_task(&next, id, json)
        } else {
            print_removed(id, json)
        }
    })
}

fn cmd_rm(data_dir: &Path, args: IdArgs, json: bool) -> Result<(), Box<dyn Error>> {
    with_task(data_dir, &args.id, |storage, tasks, id| {
        if let Some(next) = task_ops::remove_task(tasks, id, Utc::now().timestamp()) {
            storage.write_tasks(&next)?;
        }
        print_removed(id, json)
    })
}
