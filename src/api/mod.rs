// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_auth,
    models::{LoginRequest, RegisterRequest, TodoItem, TodoPage, TodoRequest, TokenResponse},
    state::AppState,
};

pub mod health;
pub mod todos;
pub mod users;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/todos", get(todos::list_todos).post(todos::create_todo))
        .route(
            "/todos/{todo_id}",
            put(todos::update_todo).delete(todos::delete_todo),
        )
        .route(
            "/todos/",
            put(todos::missing_todo_id).delete(todos::missing_todo_id),
        )
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_auth,
        ));

    let api = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/health", get(health::health))
        .merge(protected)
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Any origin may call the API; credentials are not exposed to scripts.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Registers the `bearer` scheme referenced by the protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Relational To-Do API",
        description = "Multi-user to-do list service with bearer token authentication."
    ),
    paths(
        users::register,
        users::login,
        todos::create_todo,
        todos::list_todos,
        todos::update_todo,
        todos::delete_todo,
        health::health
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            TodoItem,
            TodoRequest,
            TodoPage,
            health::HealthResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Registration and login"),
        (name = "Todos", description = "Per-user to-do items"),
        (name = "Health", description = "Service health")
    )
)]
struct ApiDoc;
