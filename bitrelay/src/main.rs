use bitrelay::{
    app::{self, AppState},
    cli::ServiceCli,
    config::Config,
    exchange::BitFlyer,
    services::{JsonClient, LineClient, url},
    shutdown::shutdown_signal,
    telemetry,
};
use clap::Parser;
use std::{
    net::{Ipv4Addr, SocketAddrV4},
    sync::Arc,
};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let cli = ServiceCli::parse();
    let config = Config::load(&cli.config.toml_path, &cli.config.env_path)
        .expect("Failed to load config");

    telemetry::init(&config.log_level);
    tracing::info!("Loaded configuration");

    let http = JsonClient::new().expect("Failed to create HTTP client");
    let notifier = LineClient::new(http.clone(), &config.line).expect("Failed to create LINE client");

    let state = AppState {
        exchange: Arc::new(BitFlyer::new(http, &config.bitflyer)),
        notifier: Arc::new(notifier),
    };
    let app = app::create_app(state);

    let port = url::extract_port(&config.server_url.golang_server).expect("Invalid server url");
    let addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    tracing::info!("Server listening on {}", addr);

    let token = CancellationToken::new();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(token.clone()))
        .await
        .expect("Server error");
}
