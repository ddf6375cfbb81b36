use bitrelay::{
    cli::ServiceCli,
    config::Config,
    services::{FastApiClient, GatewayClient, JsonClient, LineClient, StoreClient},
    shutdown::shutdown_signal,
    tasks::{HealthMonitor, Target},
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

    let time_zone = config.time_zone().expect("Invalid time zone");
    let http = JsonClient::new().expect("Failed to create HTTP client");
    let notifier = LineClient::new(http.clone(), &config.line).expect("Failed to create LINE client");

    let urls = &config.server_url;
    let monitor = HealthMonitor::new(
        Arc::new(notifier),
        config.check_interval(),
        config.notification_interval(),
        time_zone,
    )
    .with_buffer(
        config.health_batch.buffer_capacity,
        config.health_batch.backpressure,
    )
    .with_target(
        Target::GolangServer,
        Arc::new(GatewayClient::new(http.clone(), &urls.golang_server)),
    )
    .with_target(
        Target::DrfServer,
        Arc::new(StoreClient::new(http.clone(), &urls.drf_server)),
    )
    .with_target(
        Target::FastApiServer,
        Arc::new(FastApiClient::new(http, &urls.fast_api_server)),
    );

    let token = CancellationToken::new();
    tokio::spawn(shutdown_signal(token.clone()));

    monitor.run(token).await;
}
