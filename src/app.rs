/*
 * Responsibility
 * - Config読み込み → 依存生成 (PgPool, TokenAuthorizer, S3Attachments) → Router 組み立て
 * - Middleware の適用 (HTTP/CORS/Security headers, Bearer は v1 routes 側)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware;
use crate::services::{attachments::S3Attachments, authorizer::build_token_authorizer};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,todo_authorizer=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost".
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        jwks_url = %config.jwks_url,
        cert_cache_policy = ?config.cert_cache_policy,
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, addr = %config.addr, "failed to bind");
            AppError::Internal
        })?;
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!(error = %e, "server error");
        AppError::Internal
    })?;

    Ok(())
}

pub async fn build_state(config: &Config) -> Result<AppState, AppError> {
    // Lazy: the authorizer must keep answering even while the database is unreachable.
    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy(&config.database_url)
        .map_err(|e| {
            tracing::error!(error = %e, "invalid DATABASE_URL");
            AppError::Internal
        })?;

    let authorizer = build_token_authorizer(config).await?;

    let attachments = match config.attachments.clone() {
        Some(settings) => {
            tracing::info!(bucket = %settings.bucket, "attachment uploads enabled");
            Some(Arc::new(S3Attachments::from_env(settings)?))
        }
        None => None,
    };

    Ok(AppState::new(db, authorizer, attachments))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}
