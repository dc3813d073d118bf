use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use domain::services::AccessCodeNotifier;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, security_headers_middleware,
    trace_id, RateLimiterState,
};
use crate::routes::{events, guests, health};
use crate::services::{EmailError, EmailService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub notifier: Arc<dyn AccessCodeNotifier>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

/// Builds the application with email delivery taken from configuration.
pub fn create_app(config: Config, pool: PgPool) -> Result<Router, EmailError> {
    let notifier = Arc::new(EmailService::new(config.email.clone())?);
    Ok(create_app_with_notifier(config, pool, notifier))
}

pub fn create_app_with_notifier(
    config: Config,
    pool: PgPool,
    notifier: Arc<dyn AccessCodeNotifier>,
) -> Router {
    let config = Arc::new(config);

    if !config.security.admin_key_configured() {
        warn!("ADMIN API key is not configured; admin routes will answer 500");
    }

    // None when rate_limit_per_minute is 0
    let rate_limiter = RateLimiterState::new(config.security.rate_limit_per_minute).map(Arc::new);

    let state = AppState {
        pool,
        config: config.clone(),
        notifier,
        rate_limiter,
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Guest self-service entry points, throttled per client
    let guest_entry_routes = Router::new()
        .route(
            "/api/guests/:event_slug/register",
            post(guests::register_guest),
        )
        .route("/api/guests/:event_slug/login", post(guests::login_guest))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Admin handlers take the AdminAuth extractor themselves
    let guest_routes = Router::new()
        .route("/api/guests/:event_slug", get(guests::list_guests))
        .route(
            "/api/guests/:event_slug/:guest_id",
            get(guests::get_guest_detail),
        )
        .route(
            "/api/guests/:event_slug/:guest_id/status",
            get(guests::get_guest_status),
        )
        .route(
            "/api/guests/:event_slug/:guest_id/state",
            patch(guests::update_guest_state),
        );

    let event_routes = Router::new()
        .route(
            "/api/events",
            get(events::list_public_events).post(events::create_event),
        )
        .route("/api/events/admin/all", get(events::list_all_events))
        .route(
            "/api/events/:slug",
            get(events::get_event_by_slug).patch(events::update_event),
        );

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(event_routes)
        .merge(guest_entry_routes)
        .merge(guest_routes)
        // Global middleware (bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
