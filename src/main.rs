use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::Result;
use std::path::PathBuf;
use taskpad::{FileStorage, StatusFilter, TaskStore, TermNotifier};

#[derive(Parser)]
#[command(name = "taskpad")]
#[command(about = "Taskpad CLI - a persistent task list")]
#[command(version)]
struct Cli {
    /// Directory the task list is stored in (default: per-user data dir)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task text
        text: String,
    },

    /// List tasks
    List {
        /// Status filter: all, active, or completed
        #[arg(short, long, default_value_t = StatusFilter::All)]
        filter: StatusFilter,

        /// Keep only tasks whose text contains this (case-insensitive)
        #[arg(short = 'q', long, default_value = "")]
        search: String,
    },

    /// Toggle a task's completion flag
    Toggle {
        /// Task id
        id: String,
    },

    /// Replace a task's text
    Edit {
        /// Task id
        id: String,
        /// New task text
        text: String,
    },

    /// Delete a task
    Delete {
        /// Task id
        id: String,
    },

    /// Show status counts
    Stats,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let dir = cli.store_path.unwrap_or_else(FileStorage::default_dir);
    let mut store = TaskStore::open(FileStorage::new(dir), TermNotifier);

    match cli.command {
        Commands::Add { text } => {
            if store.add_task(&text)?.is_none() {
                println!("Nothing to add: task text is empty.");
            }
        }
        Commands::List { filter, search } => {
            let tasks = store.visible_tasks(filter, &search);
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for task in tasks {
                let mark = if task.completed { "x".green() } else { " ".normal() };
                let text = if task.completed {
                    task.text.dimmed().strikethrough()
                } else {
                    task.text.normal()
                };
                println!("[{}] {}  {}", mark, text, task.id.dimmed());
            }
        }
        Commands::Toggle { id } => {
            if !store.toggle_task(&id)? {
                println!("No task with id {}", id);
            }
        }
        Commands::Edit { id, text } => {
            if !store.start_editing(&id) {
                println!("No task with id {}", id);
            } else {
                store.set_edit_buffer(&text);
                if !store.save_edit()? {
                    store.cancel_edit();
                    println!("Nothing to save: new text is empty.");
                }
            }
        }
        Commands::Delete { id } => {
            if !store.delete_task(&id)? {
                println!("No task with id {}", id);
            }
        }
        Commands::Stats => {
            let stats = store.stats();
            println!(
                "{} total, {} active, {} completed",
                stats.total,
                stats.active.to_string().yellow(),
                stats.completed.to_string().green()
            );
        }
    }

    Ok(())
}
