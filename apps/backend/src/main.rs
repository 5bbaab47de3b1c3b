use actix_web::{web, App, HttpServer};
use collection_wars_backend::config::server::ServerConfig;
use collection_wars_backend::infra::state::build_state;
use collection_wars_backend::middleware::cors::cors_middleware;
use collection_wars_backend::routes;
use collection_wars_backend::state::security_config::SecurityConfig;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting Collection Wars Backend on http://{}:{}",
        config.host, config.port
    );

    let security_config = SecurityConfig::new(config.jwt_secret.as_bytes());

    let app_state = match build_state()
        .with_security(security_config)
        .with_database_url(config.database_url.clone())
        .with_pending_timeout(config.pending_action_timeout)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    info!(
        results_db = config.database_url.is_some(),
        pending_timeout = ?config.pending_action_timeout,
        "Application state ready"
    );

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
