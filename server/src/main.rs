use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use anyhow::Context;

use link_library::config::AppConfig;
use link_library::handlers;
use link_library::state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (for development)
    dotenvy::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/library.toml".to_string());

    let mut config = AppConfig::load_from_file(&config_path).unwrap_or_else(|e| {
        log::warn!(
            "Failed to load config from '{}': {}. Falling back to defaults.",
            config_path,
            e
        );
        AppConfig::default()
    });
    config.apply_env_overrides();

    log::info!("Library file: {}", config.library_file.display());
    log::info!("Admin file: {}", config.admin_file.display());
    log::info!("Session expiry set to {} hours", config.session_expiry_hours);
    if config.protect_library_writes {
        log::info!("Library writes require an admin token");
    }

    let host = config.host.clone();
    let port = config.port;

    let state = AppState::bootstrap(config);
    state.logs.append("Server starting...");
    state.spawn_background_tasks();

    let app_state = web::Data::new(state.clone());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(actix_middleware::Logger::default())
            .wrap(actix_middleware::Compress::default())
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))
    .with_context(|| format!("failed to bind {}:{}", host, port))?
    .run();

    state
        .logs
        .append(format!("Server ready on http://{}:{}", host, port));

    server.await.context("HTTP server failed")?;

    state.shutdown().context("failed to flush library on shutdown")?;
    log::info!("Server stopped");

    Ok(())
}
