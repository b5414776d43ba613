use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    due_date,
    session::{HeaderControl, HeaderState, HeaderView, ThemeProvider},
    Notice, TaskBoard,
};
use shared::domain::{Task, TaskId};
use store::{HttpTaskStore, HttpTaskStoreConfig};
use tokio::sync::broadcast;

mod providers;
mod settings;

use providers::{FileTheme, SettingsAuth};
use settings::load_settings;

#[derive(Parser, Debug)]
#[command(name = "tasks", about = "Task board terminal client")]
struct Args {
    /// Remote store base URL; overrides tasks.toml and environment settings.
    #[arg(long)]
    server_url: Option<String>,
    /// Api key sent with every store request.
    #[arg(long)]
    api_key: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tasks with created and due dates.
    List,
    /// Add a new task.
    Add { text: String },
    /// Flip a task's completed state.
    Toggle { id: i64 },
    /// Replace a task's text.
    Edit { id: i64, text: String },
    /// Delete a task.
    Rm { id: i64 },
    /// Show the header line and the board.
    Status,
    /// Flip the colour theme.
    Theme,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }
    if let Some(key) = args.api_key {
        settings.api_key = Some(key);
    }

    if let Command::Theme = args.command {
        let theme = FileTheme::open(&settings.theme_file);
        println!("theme set to {:?}", theme.toggle());
        return Ok(());
    }

    let store = HttpTaskStore::new(HttpTaskStoreConfig {
        base_url: settings.server_url.clone(),
        table: settings.table.clone(),
        api_key: settings.api_key.clone(),
    })
    .context("failed to build task store")?;

    let mut board = TaskBoard::new(Arc::new(store));
    let mut notices = board.subscribe_notices();

    board.load().await;

    match &args.command {
        Command::List => {}
        Command::Add { text } => {
            board.set_draft(text.clone());
            board.add().await;
        }
        Command::Toggle { id } => {
            let id = require_task(&board, *id)?;
            board.toggle_complete(id).await;
        }
        Command::Edit { id, text } => {
            let id = require_task(&board, *id)?;
            board.start_edit(id);
            board.set_edit_draft(text.clone());
            board.save_edit().await;
        }
        Command::Rm { id } => {
            let id = require_task(&board, *id)?;
            board.delete(id).await;
        }
        Command::Status => {
            let auth = SettingsAuth::new(
                settings.api_key.as_deref(),
                settings.account_name.as_deref(),
            );
            let theme = FileTheme::open(&settings.theme_file);
            print_header(&HeaderState::default().view(&auth, &theme));
        }
        Command::Theme => unreachable!("handled before the store is built"),
    }

    print_notices(&mut notices);
    print_board(&board);

    Ok(())
}

fn require_task(board: &TaskBoard, id: i64) -> Result<TaskId> {
    let id = TaskId(id);
    if board.state.tasks.iter().any(|task| task.id == id) {
        Ok(id)
    } else {
        Err(anyhow!("no task with id {}", id.0))
    }
}

fn print_notices(rx: &mut broadcast::Receiver<Notice>) {
    while let Ok(notice) = rx.try_recv() {
        match notice {
            Notice::Success { message } => println!("{message}"),
            Notice::Failure { headline, detail } => eprintln!("{headline}: {detail}"),
        }
    }
}

fn print_board(board: &TaskBoard) {
    for task in &board.state.tasks {
        print_task(task);
    }
    println!(
        "{} total, {} completed, {} pending",
        board.total_count(),
        board.completed_count(),
        board.pending_count()
    );
}

fn print_task(task: &Task) {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!(
        "[{mark}] {:>4}  {:<40}  created {}",
        task.id.0,
        task.text,
        task.created_at.format("%Y-%m-%d")
    );
    if !task.completed {
        line.push_str(&format!("  due {}", due_date(task)));
    }
    println!("{line}");
}

fn print_header(view: &HeaderView) {
    let mut parts = vec![view.brand.clone(), format!("theme {:?}", view.theme)];
    for control in &view.controls {
        match control {
            HeaderControl::SignIn => parts.push("[Sign In]".to_string()),
            HeaderControl::SignUp => parts.push("[Sign Up]".to_string()),
            HeaderControl::AccountMenu { .. } => {
                let name = view
                    .session
                    .as_ref()
                    .map(|s| s.display_name.as_str())
                    .unwrap_or("account");
                parts.push(format!("[{name}]"));
            }
        }
    }
    println!("{}", parts.join("  "));
}
