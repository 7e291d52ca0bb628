//! Application startup and lifecycle management.

use crate::config::OrderConfig;
use crate::handlers;
use crate::models::{CreateUser, Role, ADMIN_USERNAME};
use crate::services::Database;
use crate::utils::{hash_password, Password};
use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{HeaderValue, Method},
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::security_headers::security_headers_middleware;
use service_core::middleware::tracing::{request_id_middleware, REQUEST_ID_HEADER};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<OrderConfig>,
    pub db: Database,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}

/// Build the HTTP router with every route and middleware layer.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::api_health))
        .route(
            "/clientes",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route(
            "/clientes/:id",
            put(handlers::clients::update_client).delete(handlers::clients::delete_client),
        )
        .route(
            "/servicos",
            get(handlers::catalog::list_services).post(handlers::catalog::create_service),
        )
        .route(
            "/servicos/:id",
            delete(handlers::catalog::delete_service),
        )
        .route(
            "/pedidos",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route(
            "/pedidos/:id",
            get(handlers::orders::get_order).put(handlers::orders::replace_order),
        )
        .route("/pedidos/:id/withdraw", patch(handlers::orders::mark_withdrawn))
        .route("/pedidos/:id/pay", patch(handlers::orders::mark_paid))
        .route("/pedidos/:id/receipt", get(handlers::orders::get_receipt))
        .route("/financeiro", get(handlers::finance::finance_summary))
        .route("/login", post(handlers::users::login))
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/:username",
            delete(handlers::users::delete_user),
        )
        .route(
            "/users/:username/password",
            patch(handlers::users::change_password),
        )
        .route(
            "/settings",
            get(handlers::settings::get_settings).post(handlers::settings::save_settings),
        );

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let request_id = req
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %req.method(),
                uri = %req.uri(),
                request_id = %request_id,
            )
        })
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let max_body_bytes = state.config.http.max_body_bytes;
    let cors = cors_layer(&state.config.http.allowed_origins);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(trace_layer)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(cors)
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Create the `admin` account when it does not exist yet.
async fn bootstrap_admin(db: &Database, password: &Secret<String>) -> Result<(), AppError> {
    let password_hash = hash_password(&Password::new(password.expose_secret().as_str()))?;

    let created = db
        .create_user_if_missing(&CreateUser {
            username: ADMIN_USERNAME.to_string(),
            password_hash,
            name: "Administrador".to_string(),
            role: Role::Admin,
        })
        .await?;

    if created {
        tracing::info!(username = ADMIN_USERNAME, "Admin user bootstrapped");
    }
    Ok(())
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: OrderConfig) -> Result<Self, AppError> {
        let db = Database::new(
            config.database.url.expose_secret(),
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        Self::build_with_database(config, db).await
    }

    /// Build on an existing pool. Tests use this to pin a schema per run.
    pub async fn build_with_database(config: OrderConfig, db: Database) -> Result<Self, AppError> {
        if config.database.run_migrations {
            db.run_migrations().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to run migrations");
                e
            })?;
        }

        if let Some(password) = &config.admin_bootstrap_password {
            bootstrap_admin(&db, password).await?;
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Order service listener bound");

        Ok(Self {
            port,
            listener,
            state: AppState {
                config: Arc::new(config),
                db,
            },
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        tracing::info!(
            service = "order-service",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        axum::serve(self.listener, router).await.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}
