use axum::{
    extract::Request,
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use userapi_shared::{
    config::DatabaseConfig,
    error::ServiceError,
    store::{postgres::PgUserStore, UserStore},
};

use crate::error::AppError;
use crate::handlers::{
    health_handlers::{health_check, root},
    user_handlers::{create_user, delete_user, get_user, get_users},
};

/// Creates a router backed by PostgreSQL
pub fn create_router(config: &DatabaseConfig) -> Router {
    tracing::info!("Creating router with PostgreSQL store");

    let pg_store = Arc::new(PgUserStore::new(config));
    create_router_with_store(pg_store)
}

/// Creates a router with a given store implementation
pub fn create_router_with_store<S>(store: Arc<S>) -> Router
where
    S: UserStore + 'static,
{
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Logging middleware to trace all requests
    async fn logging_middleware(
        req: Request,
        next: axum::middleware::Next,
    ) -> impl IntoResponse {
        tracing::info!(
            "Router received request: method={}, uri={}",
            req.method(),
            req.uri()
        );
        let response = next.run(req).await;
        tracing::debug!("Router returning response: status={}", response.status());
        response
    }

    let api_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check::<S>))
        .route("/users", get(get_users::<S>).post(create_user::<S>))
        .route("/users/:id", get(get_user::<S>).delete(delete_user::<S>))
        .with_state(store);

    tracing::info!("Router configured with user and health routes");

    api_routes
        .fallback(|req: Request| async move {
            tracing::warn!("No route matched for: {} {}", req.method(), req.uri());
            AppError::from(ServiceError::NotFound("Not Found".to_string()))
        })
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
