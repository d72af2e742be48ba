pub mod api;
pub mod config;
pub mod model;
pub mod seed;
pub mod store;
pub mod templates;

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{get_service, MethodRouter},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
};

use crate::api::middleware::{log_request, rate_limit, RateLimiter};
use crate::api::{create_router, route_not_found, ApiError, AppContext, AppState};

// Export configuration and storage types
pub use config::AppConfig;
pub use store::{SqliteStore, Store};
pub use templates::TemplateStore;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; style-src 'self' 'unsafe-inline'; \
     script-src 'self'; img-src 'self' data: https:";

/// Opens the database, applies migrations, writes missing default
/// templates and loads the seed data when configured to.
pub async fn initialize(config: AppConfig) -> anyhow::Result<AppState<SqliteStore>> {
    log::info!("Opening database {}", config.database.url);
    let store = SqliteStore::new(&config.database.url, config.database.max_connections).await?;
    store.migrate().await?;

    let templates = TemplateStore::new(&config.paths.templates_dir);
    let created = templates
        .ensure_defaults()
        .await
        .with_context(|| format!("Failed to prepare templates in {}", templates.root().display()))?;
    log::info!(
        "Templates directory {} ({} default template(s) created)",
        templates.root().display(),
        created.len()
    );

    tokio::fs::create_dir_all(&config.paths.uploads_dir)
        .await
        .with_context(|| format!("Failed to create uploads directory {}", config.paths.uploads_dir.display()))?;

    if config.seed {
        seed::load_seed_data(&store).await?;
    }

    Ok(Arc::new(AppContext::new(store, templates, config)))
}

/// The complete application: API routes, static directories and the
/// middleware stack.
pub fn build_app<S: Store + 'static>(state: AppState<S>) -> Router {
    let config = &state.config;
    let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));

    let mut app = create_router::<S>()
        .nest_service("/templates", ServeDir::new(&config.paths.templates_dir))
        .nest_service("/uploads", ServeDir::new(&config.paths.uploads_dir));

    app = match (&config.server.frontend_dir, config.environment.is_production()) {
        (Some(frontend_dir), true) => {
            // Only reads fall through to the bundle; anything else is an unknown route
            let index = ServeFile::new(frontend_dir.join("index.html"));
            let bundle: MethodRouter =
                get_service(ServeDir::new(frontend_dir).fallback(index))
                    .fallback(route_not_found);
            app.fallback_service(bundle)
        }
        _ => app.fallback(route_not_found),
    };
    app = app.method_not_allowed_fallback(route_not_found);

    // Outermost first: every request is logged, rate limiting runs last
    let layers = ServiceBuilder::new()
        .layer(middleware::from_fn(log_request))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ))
        .layer(cors_layer(config.cors_origins()))
        .layer(CompressionLayer::new())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(DefaultBodyLimit::max(config.server.body_limit_bytes))
        .layer(middleware::from_fn_with_state(limiter, rate_limit));

    app.layer(layers).with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let mut allowed = Vec::with_capacity(origins.len());
    for origin in origins {
        match HeaderValue::from_str(origin) {
            Ok(value) => allowed.push(value),
            Err(e) => log::warn!("Ignoring invalid CORS origin '{}': {}", origin, e),
        }
    }

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());
    log::error!("Handler panicked: {}", detail);
    ApiError::Internal("Something went wrong!".to_string()).into_response()
}

/// Serves `app` on `listener` until SIGINT or SIGTERM.
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    log::info!("Server shut down");
    Ok(())
}

pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let environment = config.environment;

    let state = initialize(config).await?;
    let app = build_app(state);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    log::info!(
        "Case Track server running on http://{} ({})",
        bind_address,
        environment.as_str()
    );
    log::info!("Health check: http://{}/health", bind_address);

    serve(listener, app).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("SIGINT received, shutting down gracefully"),
        _ = terminate => log::info!("SIGTERM received, shutting down gracefully"),
    }
}
