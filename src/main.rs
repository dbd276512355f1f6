//! Vitalwatch entry point: `monitor` runs the generator/evaluator loop,
//! `serve` runs the dashboard API.

use std::time::Duration;

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vitalwatch::api::{self, AppState};
use vitalwatch::config::{self, Config};
use vitalwatch::monitor::Monitor;
use vitalwatch::notify::{AlertDispatcher, AlertNotifier};
use vitalwatch::store::StoreClient;
use vitalwatch::thresholds::ThresholdTable;

#[derive(Parser)]
#[command(name = "vitalwatch", about = "Patient vital-sign monitoring and alerting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the fixed-interval generator/evaluator loop
    Monitor,
    /// Serve the dashboard API
    Serve,
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = config::load_config().context("failed to load configuration")?;

    let store = StoreClient::new(
        &config.store.base_url,
        Duration::from_secs(config.store.timeout_secs),
    )
    .context("failed to build store client")?;
    let notifier =
        AlertNotifier::new(config.notifier.clone()).context("failed to build notifier")?;
    let dispatcher = AlertDispatcher::new(ThresholdTable::standard(), notifier);

    match cli.command {
        Commands::Monitor => run_monitor(config, store, dispatcher).await,
        Commands::Serve => run_server(config, store, dispatcher).await,
    }
}

async fn run_monitor(config: Config, store: StoreClient, dispatcher: AlertDispatcher) -> Result<()> {
    let monitor = Monitor::new(
        store,
        dispatcher,
        config.monitor.patient_ids,
        Duration::from_secs(config.monitor.poll_interval_secs),
    );
    monitor.run().await;
    Ok(())
}

async fn run_server(config: Config, store: StoreClient, dispatcher: AlertDispatcher) -> Result<()> {
    let state = web::Data::new(AppState { store, dispatcher });
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        "starting dashboard API"
    );
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(api::configure)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
    .context("server terminated")
}
