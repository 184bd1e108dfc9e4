//! `fillsyncd` -- one-shot fill database synchronizer.
//!
//! Reads the configured sync jobs, runs each once against the source
//! database, and exits. Intended to be invoked from cron or a systemd
//! timer between playout runs.
//!
//! # Environment variables
//!
//! | Variable        | Required | Default              | Description                         |
//! |-----------------|----------|----------------------|-------------------------------------|
//! | `DATABASE_URL`  | yes      | --                   | PostgreSQL DSN of the source DB     |
//! | `FILLSYNC_JOBS` | no       | `fillsync-jobs.json` | Path to the job configuration file  |

use std::path::PathBuf;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fillsync_engine::config::SyncConfig;
use fillsync_engine::orchestrator;
use fillsync_engine::selector::PgFillSource;

/// Default job configuration path.
const DEFAULT_JOBS_FILE: &str = "fillsync-jobs.json";

/// The run is a short sequence of read queries; two pooled connections
/// cover it.
const MAX_SOURCE_CONNECTIONS: u32 = 2;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fillsyncd=info,fillsync_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        tracing::error!("DATABASE_URL environment variable is required");
        std::process::exit(1);
    });

    let jobs_file: PathBuf = std::env::var("FILLSYNC_JOBS")
        .unwrap_or_else(|_| DEFAULT_JOBS_FILE.into())
        .into();

    let config = SyncConfig::load(&jobs_file).unwrap_or_else(|error| {
        tracing::error!(path = %jobs_file.display(), %error, "could not load job configuration");
        std::process::exit(1);
    });

    if config.jobs.is_empty() {
        tracing::warn!(path = %jobs_file.display(), "no sync jobs configured, nothing to do");
        return;
    }

    let pool = PgPoolOptions::new()
        .max_connections(MAX_SOURCE_CONNECTIONS)
        .connect(&database_url)
        .await
        .unwrap_or_else(|error| {
            tracing::error!(%error, "could not connect to source database");
            std::process::exit(1);
        });

    let source = PgFillSource::new(pool);
    let reports = orchestrator::run_all(&source, &config.jobs).await;

    let failed = reports
        .iter()
        .filter(|report| !report.outcome.is_committed())
        .count();
    tracing::info!(jobs = reports.len(), failed, "sync run complete");

    if failed > 0 {
        std::process::exit(1);
    }
}
