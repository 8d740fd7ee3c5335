use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use backend::config::AppConfig;
use backend::middleware::cors::cors_middleware;
use backend::routes;
use backend::services::email::SmtpMailer;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use backend::telemetry;
use sea_orm::Database;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: via docker-compose env_file or docker run --env-file
    // - Local dev: source env files manually (e.g., set -a; . ./.env; set +a)
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting Billfold backend on http://{}:{}",
        config.host, config.port
    );

    let security = SecurityConfig::new(config.jwt_secret.as_bytes()).with_ttls(
        config.access_token_ttl_minutes,
        config.email_token_ttl_minutes,
    );

    let db = match Database::connect(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    println!("✅ Database connected");

    let mut state = AppState::new(db, security).with_frontend_url(config.frontend_url.clone());

    if let Some(smtp) = &config.smtp {
        match SmtpMailer::new(smtp) {
            Ok(mailer) => state = state.with_mailer(Arc::new(mailer)),
            Err(e) => {
                eprintln!("❌ Invalid SMTP configuration: {e}");
                std::process::exit(1);
            }
        }
    } else {
        tracing::warn!("SMTP_HOST not set; email endpoints will refuse to send");
    }

    let data = web::Data::new(state);

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
