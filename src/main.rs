use case_track::config::AppConfig;
use case_track::run_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Info by default with sqlx kept quiet; RUST_LOG still wins
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .parse_default_env()
        .init();

    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: environment={}, server={}",
        config.environment.as_str(),
        config.server_address()
    );

    run_server(config).await
}
