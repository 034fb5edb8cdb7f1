use std::io;
use std::path::Path;

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{info, warn};

use workflow_storage::api;
use workflow_storage::app_state::AppState;
use workflow_storage::config::AppConfig;

fn init_logging(config_file: &str) {
    if Path::new(config_file).exists() {
        match log4rs::init_file(config_file, Default::default()) {
            Ok(()) => return,
            Err(e) => eprintln!("Failed to load {}: {}, falling back to env_logger", config_file, e),
        }
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = AppConfig::load().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    init_logging(&config.logging.config_file);

    let state = AppState::from_config(config.clone()).await.map_err(|e| {
        warn!("Failed to initialize object store: {}", e);
        io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;
    let state = web::Data::new(state);

    info!(
        "Starting workflow storage on {}:{} (bucket {}, backend {:?})",
        config.server.host, config.server.port, config.storage.bucket, config.storage.backend
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(api::configure)
    })
    .workers(config.server.workers)
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
