//! tour-dash - A terminal dashboard for PGA Tour analytics.

use clap::Parser;
use std::sync::Arc;
use tour_dash::app::Dashboard;
use tour_dash::cli::Cli;
use tour_dash::config::Config;
use tour_dash::demo::DemoDatabase;
use tour_dash::error::{DashError, Result};
use tour_dash::logging;
use tour_dash::tui::{self, App};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    logging::init(logging::LogTarget::for_mode(cli.is_headless()));

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!(category = e.category(), "{e}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    // Holds the demo database's temp directory until the dashboard exits
    let demo = if cli.use_demo_database() {
        Some(match &cli.demo.seed {
            Some(path) => DemoDatabase::from_seed_file(path).await?,
            None => DemoDatabase::create().await?,
        })
    } else {
        None
    };

    let connection = match &demo {
        Some(demo) => demo.config().clone(),
        None => cli
            .resolve_connection(&config, |key| std::env::var(key).ok())?
            .ok_or_else(|| {
                DashError::config(
                    "No database connection configured. Pass a connection string, --database, \
                     set MYSQL_DATABASE, add a [connections.default] entry, or use --mock-db.",
                )
            })?,
    };

    let connection_info = connection.display_string();
    info!("Connection: {}", connection_info);

    let dashboard = Dashboard::new(Arc::new(connection), config.dashboard.preview_limit);
    let app = App::new(&config.dashboard, Some(connection_info));

    if cli.is_headless() {
        tui::headless::run_headless(&cli, app, dashboard).await
    } else {
        tui::run(app, dashboard).await?;
        Ok(0)
    }
}
