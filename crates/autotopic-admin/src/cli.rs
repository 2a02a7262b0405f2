//! Command line definition.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

/// Manage description windows and record events.
#[derive(Debug, Parser)]
#[command(name = "autotopic-admin", version, about)]
pub struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, env = "AUTOTOPIC_CONFIG", default_value = "autotopic-config.yaml")]
    pub config: String,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level command groups.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply pending database migrations.
    Migrate,

    /// Manage description windows.
    #[command(subcommand)]
    Window(WindowCommand),

    /// Record events.
    #[command(subcommand)]
    Event(EventCommand),
}

/// Window subcommands.
#[derive(Debug, Subcommand)]
pub enum WindowCommand {
    /// Create a window. Omitted times fall back to the configured defaults.
    Add(WindowAddArgs),

    /// Change an existing window.
    Update(WindowUpdateArgs),

    /// List all windows on a site.
    List {
        /// Site to list.
        #[arg(long)]
        site: Uuid,
    },

    /// Delete a window.
    Delete {
        /// Window to delete.
        #[arg(long)]
        id: Uuid,
    },
}

/// Arguments for `window add`.
#[derive(Debug, Args)]
pub struct WindowAddArgs {
    /// Site the window applies to.
    #[arg(long)]
    pub site: Uuid,

    /// Inclusive start (RFC 3339).
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,

    /// Inclusive end (RFC 3339).
    #[arg(long)]
    pub end: Option<DateTime<Utc>>,

    /// Text applied to matching events.
    #[arg(long)]
    pub description: String,
}

/// Arguments for `window update`.
#[derive(Debug, Args)]
pub struct WindowUpdateArgs {
    /// Window to change.
    #[arg(long)]
    pub id: Uuid,

    /// New inclusive start (RFC 3339).
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,

    /// New inclusive end (RFC 3339).
    #[arg(long)]
    pub end: Option<DateTime<Utc>>,

    /// New description.
    #[arg(long)]
    pub description: Option<String>,
}

/// Event subcommands.
#[derive(Debug, Subcommand)]
pub enum EventCommand {
    /// Record an event now, filling in its description from the open window.
    Record {
        /// Site the event happens on.
        #[arg(long)]
        site: Uuid,

        /// Explicit description; skips the window lookup.
        #[arg(long)]
        description: Option<String>,
    },

    /// Show the most recent events on a site, newest first.
    List {
        /// Site to list.
        #[arg(long)]
        site: Uuid,

        /// Maximum number of events to show.
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(i64).range(1..))]
        limit: i64,
    },
}
