//! Ticklist CLI - Terminal front end for the to-do service.
//!
//! # Usage
//!
//! ```bash
//! # Create an account, then sign in
//! ticklist register -n "Ada Lovelace" -e ada@example.com
//! ticklist login -e ada@example.com
//!
//! # Work with the task list
//! ticklist todo add Buy milk
//! ticklist todo list
//! ticklist todo rename 3 Buy oat milk
//! ticklist todo toggle 3
//! ticklist todo delete 3
//!
//! # End the session
//! ticklist logout
//! ```
//!
//! # Commands
//!
//! - `login` / `register` / `logout` - Session management
//! - `status` - Show where the session stands
//! - `profile` - Show the signed-in user
//! - `todo` - List, add, rename, toggle and delete tasks
//!
//! Passwords are read from `TICKLIST_PASSWORD` or, failing that, from the
//! first line of standard input.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

use commands::CliError;

#[derive(Parser)]
#[command(name = "ticklist")]
#[command(author, version, about = "Ticklist to-do client")]
struct Cli {
    /// Backend base URL (overrides `TICKLIST_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides `TICKLIST_SESSION_FILE`)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Create an account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the session state and the route the client would open
    Status,
    /// Show the signed-in user
    Profile,
    /// Manage tasks
    Todo {
        #[command(subcommand)]
        action: TodoAction,
    },
}

#[derive(Subcommand)]
enum TodoAction {
    /// List tasks
    List,
    /// Add a task
    Add {
        /// Task title; words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Give a task a new title
    Rename {
        /// Task ID
        id: i64,

        /// New title; words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Flip a task between pending and completed
    Toggle {
        /// Task ID
        id: i64,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
    },
    /// Show completion counters
    Stats,
}

#[tokio::main]
async fn main() {
    // Initialize tracing; stdout is reserved for command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ticklist_cli=warn,ticklist_client=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let app = commands::build_app(cli.api_url.as_deref(), cli.session_file)?;

    match cli.command {
        Commands::Login { email } => commands::auth::login(&app, &email).await,
        Commands::Register { name, email } => commands::auth::register(&app, &name, &email).await,
        Commands::Logout => commands::auth::logout(&app).await,
        Commands::Status => commands::auth::status(&app).await,
        Commands::Profile => commands::auth::profile(&app).await,
        Commands::Todo { action } => match action {
            TodoAction::List => commands::todo::list(&app).await,
            TodoAction::Add { title } => commands::todo::add(&app, &title.join(" ")).await,
            TodoAction::Rename { id, title } => {
                commands::todo::rename(&app, id.into(), &title.join(" ")).await
            }
            TodoAction::Toggle { id } => commands::todo::toggle(&app, id.into()).await,
            TodoAction::Delete { id } => commands::todo::delete(&app, id.into()).await,
            TodoAction::Stats => commands::todo::stats(&app).await,
        },
    }
}
