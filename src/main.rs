use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

mod app;
mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = cli::Args::parse();

    let config = match &args.config {
        Some(path) => tvshell::config::load_from(path)?,
        None => tvshell::config::load()?,
    };

    let _guard = initialize_logging(args.log_dir, config.logging.filter.as_deref())?;
    info!("Starting tvshell");

    let mut app = App::new(&config);
    app.run().await?;

    Ok(())
}

fn initialize_logging(log_dir: Option<PathBuf>, filter: Option<&str>) -> Result<WorkerGuard> {
    let directory = log_dir.unwrap_or_else(|| {
        dirs::data_local_dir().map_or_else(
            || PathBuf::from("logs"),
            |path| path.join("tvshell").join("logs"),
        )
    });
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "tvshell.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::from_default_env(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
