//! Bank service entry point
//!
//! Loads configuration, opens the selected storage backend, wires the
//! services and runs the Actix-web server.

use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use bank_service_backend::config::{DatabaseConfig, PasswordConfig, ServerConfig, StorageBackend};
use bank_service_backend::db::Database;
use bank_service_backend::repositories::{create_mongo_indexes, Repositories};
use bank_service_backend::routes;
use bank_service_backend::services::auth::TokenService;
use bank_service_backend::services::crypto::FieldCipher;
use bank_service_backend::services::AppServices;

#[derive(Debug)]
struct RateLimitConfig {
    per_second: u64,
    burst_size: u32,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 Starting bank service...");

    // The server refuses to start without a valid encryption key.
    let cipher = FieldCipher::from_env().map_err(|e| {
        error!("Encryption key unavailable: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let repositories = initialize_repositories().await?;

    let services = AppServices::new(
        repositories,
        cipher,
        TokenService::from_config(),
        PasswordConfig::bcrypt_cost(),
    );

    info!("✅ Services initialized");

    start_http_server(services).await
}

async fn start_http_server(services: AppServices) -> std::io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    info!("🌐 Listening on http://{}", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let rate_limit_config = load_rate_limit_config();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "Rate limits must be greater than zero")
        })?;

    info!(
        "🛡️ Rate limiting: {} req/s, burst {}",
        rate_limit_config.per_second, rate_limit_config.burst_size
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(|cfg| routes::configure_app(cfg, &services))
            .default_service(web::to(routes::not_found))
    })
    .bind(bind_address)?
    .workers(ServerConfig::workers())
    .run()
    .await
}

/// Loads `.env.prod`, `.env.dev` or `.env` depending on `PROFILE`
/// (default `dev`).
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod loaded"),
            Err(e) => error!("Failed to load .env.prod: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev loaded"),
            Err(e) => error!("Failed to load .env.dev: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("Default .env loaded");
        }
    }
}

/// `RUST_LOG` overrides the default `info,actix_web=debug`.
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

async fn initialize_repositories() -> std::io::Result<Repositories> {
    match DatabaseConfig::backend() {
        StorageBackend::Memory => {
            info!("💾 Using in-memory storage; data is lost on restart");
            Ok(Repositories::in_memory())
        }
        StorageBackend::MongoDb => {
            info!("📡 Connecting to MongoDB...");

            let database = Arc::new(Database::new().await.map_err(|e| {
                error!("MongoDB connection failed: {}", e);
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
            })?);

            create_mongo_indexes(database.clone()).await.map_err(|e| {
                error!("Index creation failed: {}", e);
                std::io::Error::other(e.to_string())
            })?;

            Ok(Repositories::mongo(database))
        }
    }
}

fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_origin("http://localhost:8080")
        .allowed_origin("http://127.0.0.1:8080")
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600)
}

/// `RATE_LIMIT_PER_SECOND` (default 100) and `RATE_LIMIT_BURST_SIZE`
/// (default 200).
fn load_rate_limit_config() -> RateLimitConfig {
    let per_second = std::env::var("RATE_LIMIT_PER_SECOND")
        .unwrap_or_else(|_| "100".to_string())
        .parse::<u64>()
        .unwrap_or_else(|e| {
            error!("Invalid RATE_LIMIT_PER_SECOND: {}. Using 100", e);
            100
        });

    let burst_size = std::env::var("RATE_LIMIT_BURST_SIZE")
        .unwrap_or_else(|_| "200".to_string())
        .parse::<u32>()
        .unwrap_or_else(|e| {
            error!("Invalid RATE_LIMIT_BURST_SIZE: {}. Using 200", e);
            200
        });

    let config = RateLimitConfig { per_second, burst_size };

    info!("Rate limit config: {:?}", config);
    config
}
