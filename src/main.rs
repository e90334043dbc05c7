// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use relational_todo_server::{
    api::router,
    auth::TokenService,
    config::{AppConfig, JWT_SECRET_ENV},
    logging::init_logging,
    state::AppState,
    storage::TodoDatabase,
};

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();

    let config = AppConfig::from_env();
    init_logging(config.log_format);

    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "No .env file loaded");
    }

    let tokens = TokenService::new(config.auth_config());
    if !tokens.is_configured() {
        tracing::warn!(
            "{JWT_SECRET_ENV} is not set; token issuance and verification will fail"
        );
    }

    let db = TodoDatabase::open(&config.database_path).expect("Failed to open database");
    tracing::info!(path = %config.database_path.display(), "Database opened");

    let app = router(AppState::new(db, tokens));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(%addr, "Relational To-Do server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
