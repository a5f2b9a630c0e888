use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{any, get, post},
};

use http::Method;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::error::ApiError;
use crate::handlers;
use crate::middleware_layer;
use crate::state::AppState;

/// Unknown routes answer like unknown backend resources do.
async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Assembles the gateway's router.
///
/// `/login` is the only route reachable without a token; everything else
/// sits behind the token middleware and receives the decoded session as
/// an extension.
pub fn register_routes(state: AppState) -> Router {
    let login_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/login/refresh", post(handlers::auth::refresh))
        .route("/login/cookies", get(handlers::auth::cookies))
        .route("/me", get(handlers::profile::me))
        .route("/courses", get(handlers::courses::courses))
        .route(
            "/courses/{course_id}/announcements",
            get(handlers::courses::announcements),
        )
        .route(
            "/courses/{course_id}/assignments",
            get(handlers::assignments::assignments),
        )
        .route(
            "/courses/{course_id}/assignments/{assignment_id}",
            get(handlers::assignments::assignment_details),
        )
        .route(
            "/courses/{course_id}/grades",
            get(handlers::assignments::grades),
        )
        .route("/raw/{*path}", any(handlers::raw::passthrough))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_token,
        ))
        .with_state(state.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(86400));

    Router::new()
        .merge(login_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(cors)
        .fallback(not_found)
}
