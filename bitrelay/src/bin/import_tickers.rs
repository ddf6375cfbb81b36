use bitrelay::{
    cli::ImportCli,
    services::{JsonClient, StoreClient},
    tasks::BulkMigrator,
    telemetry,
};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = ImportCli::parse();
    telemetry::init(&cli.log_level);

    let http = match JsonClient::new() {
        Ok(http) => http,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create HTTP client");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(source = %cli.source, target = %cli.target, workers = cli.workers, "Starting ticker import");
    let migrator = BulkMigrator::new(
        Arc::new(StoreClient::new(http.clone(), cli.source)),
        Arc::new(StoreClient::new(http, cli.target)),
        cli.workers,
    );

    match migrator.run().await {
        Ok(report) => {
            report.log_summary();
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Ticker import aborted");
            ExitCode::FAILURE
        }
    }
}
