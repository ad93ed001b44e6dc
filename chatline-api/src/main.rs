use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use chatline_api::config::ApiConfig;
use chatline_api::AppState;
use clap::Parser;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "chatline-api")]
#[command(about = "Chat timeline and simulation telemetry service")]
struct Args {
    /// Path to the config file (defaults to <config_dir>/chatline/api.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let (config, config_path) = ApiConfig::load(args.config.as_deref()).map_err(|e| {
        error!(error = %e, "Failed to load config");
        anyhow::anyhow!("Failed to load config: {}", e)
    })?;
    info!("Loaded config from {}", config_path.display());

    let state = web::Data::new(AppState::from_config(&config)?);
    let allowed_origins = config
        .cors
        .as_ref()
        .map(|cors| cors.allowed_origins.clone())
        .unwrap_or_default();

    let bind_addr = config.bind_addr();
    info!("Starting chatline-api server at http://{}", bind_addr);

    let server_state = state.clone();
    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(server_state.clone())
            .configure(chatline_api::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    state.previews.stop_all().await;
    info!("chatline-api server stopped");
    Ok(())
}
