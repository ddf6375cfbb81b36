use bitrelay::{
    cli::ServiceCli,
    config::Config,
    services::{GatewayClient, JsonClient, StoreClient},
    shutdown::shutdown_signal,
    tasks::TickerRelay,
    telemetry,
};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let cli = ServiceCli::parse();
    let config = Config::load(&cli.config.toml_path, &cli.config.env_path)
        .expect("Failed to load config");

    telemetry::init(&config.log_level);
    tracing::info!("Loaded configuration");

    let http = JsonClient::new().expect("Failed to create HTTP client");
    let relay = TickerRelay::new(
        Arc::new(GatewayClient::new(http.clone(), &config.server_url.golang_server)),
        Arc::new(StoreClient::new(http, &config.server_url.drf_server)),
        config.ticker_batch.product_code,
        config.ticker_interval(),
    );

    let token = CancellationToken::new();
    tokio::spawn(shutdown_signal(token.clone()));

    relay.run(token).await;
    tracing::info!("Ticker batch finished");
}
