//! Administrative command line for description windows and events.
//!
//! Windows are created, edited, and deleted here; every write goes through
//! the same [`WritePipeline`] the application uses, so the no-overlap rule
//! and the description lookup behave exactly as they do in production.
//!
//! # Startup Sequence
//!
//! 1. Parse the command line
//! 2. Load configuration from `autotopic-config.yaml` (or `AUTOTOPIC_CONFIG`)
//! 3. Initialize structured logging (tracing)
//! 4. Connect to `PostgreSQL` and apply migrations
//! 5. Run the requested command

mod cli;
mod error;

use std::path::Path;

use anyhow::Context;
use autotopic_core::{AutotopicConfig, SystemClock, WindowDefaults, WindowStore, WritePipeline};
use autotopic_db::{EventRow, PgStore, PostgresConfig, PostgresPool, WindowRow};
use autotopic_types::{EventDraft, SiteId, WindowDraft, WindowId};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, EventCommand, WindowAddArgs, WindowCommand, WindowUpdateArgs};
use crate::error::AdminError;

/// Application entry point for the admin tool.
///
/// # Errors
///
/// Returns an error if configuration, the database connection, or the
/// requested command fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_found) = load_config(Path::new(&cli.config))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    if !config_found {
        info!(path = cli.config, "Config file not found, using defaults");
    }

    let defaults = WindowDefaults::from_config(&config.defaults).map_err(AdminError::from)?;

    let pg = PostgresPool::connect(&PostgresConfig::from_infrastructure(&config.infrastructure))
        .await
        .map_err(AdminError::from)
        .context("connecting to PostgreSQL")?;
    pg.run_migrations().await.map_err(AdminError::from)?;

    let store = PgStore::new(pg.pool());
    let clock = SystemClock;
    let pipeline = WritePipeline::new(&store, &clock);

    let outcome = match cli.command {
        Command::Migrate => Ok(()),
        Command::Window(cmd) => run_window(cmd, &pipeline, &store, &defaults, &clock).await,
        Command::Event(cmd) => run_event(cmd, &pipeline, &store).await,
    };

    pg.close().await;
    outcome.map_err(anyhow::Error::from)
}

fn load_config(path: &Path) -> Result<(AutotopicConfig, bool), AdminError> {
    if path.exists() {
        Ok((AutotopicConfig::from_file(path)?, true))
    } else {
        Ok((AutotopicConfig::parse("")?, false))
    }
}

async fn run_window(
    cmd: WindowCommand,
    pipeline: &WritePipeline<'_, PgStore<'_>, SystemClock>,
    store: &PgStore<'_>,
    defaults: &WindowDefaults,
    clock: &SystemClock,
) -> Result<(), AdminError> {
    match cmd {
        WindowCommand::Add(WindowAddArgs {
            site,
            start,
            end,
            description,
        }) => {
            let mut draft = defaults
                .new_draft(SiteId::from(site), clock)
                .with_description(description);
            if let Some(start) = start {
                draft = draft.with_start_time(start);
            }
            if let Some(end) = end {
                draft = draft.with_end_time(end);
            }
            let saved = pipeline.save_window(&draft).await?;
            println!("{}\t{saved}", saved.id);
        }
        WindowCommand::Update(WindowUpdateArgs {
            id,
            start,
            end,
            description,
        }) => {
            let id = WindowId::from(id);
            let existing = store
                .get_window(id)
                .await?
                .ok_or(AdminError::UnknownWindow(id))?;
            let draft = WindowDraft {
                start_time: start.or(Some(existing.start_time)),
                end_time: end.or(Some(existing.end_time)),
                description: description.or_else(|| Some(existing.description.clone())),
                ..WindowDraft::from_window(&existing)
            };
            let saved = pipeline.save_window(&draft).await?;
            println!("{}\t{saved}", saved.id);
        }
        WindowCommand::List { site } => {
            let rows = store
                .windows()
                .list_for_site(SiteId::from(site))
                .await?;
            for window in rows.into_iter().map(WindowRow::into_window) {
                println!(
                    "{}\t{}\t{}\t{}",
                    window.id,
                    window.start_time.to_rfc3339(),
                    window.end_time.to_rfc3339(),
                    window.description
                );
            }
        }
        WindowCommand::Delete { id } => {
            let removed = pipeline.delete_window(WindowId::from(id)).await?;
            if !removed {
                return Err(AdminError::UnknownWindow(WindowId::from(id)));
            }
        }
    }
    Ok(())
}

async fn run_event(
    cmd: EventCommand,
    pipeline: &WritePipeline<'_, PgStore<'_>, SystemClock>,
    store: &PgStore<'_>,
) -> Result<(), AdminError> {
    match cmd {
        EventCommand::Record { site, description } => {
            let mut draft = EventDraft::new(SiteId::from(site));
            draft.description = description;
            let record = pipeline.save_event(&mut draft).await?;
            println!(
                "{}\t{}\t{}",
                record.id,
                record.created_at.to_rfc3339(),
                record.description.as_deref().unwrap_or("")
            );
        }
        EventCommand::List { site, limit } => {
            let rows = store
                .events()
                .recent_for_site(SiteId::from(site), limit)
                .await?;
            for record in rows.into_iter().map(EventRow::into_record) {
                println!(
                    "{}\t{}\t{}",
                    record.id,
                    record.created_at.to_rfc3339(),
                    record.description.as_deref().unwrap_or("")
                );
            }
        }
    }
    Ok(())
}
