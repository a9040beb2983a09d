//! Router configuration for the gateway.

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    cast_vote, comment, create_or_edit_anonce, create_vote, delete_anonce, delete_user,
    delete_vote, details, get_anonce, list_anonces, list_users, list_votes, logout, mark_as_read,
    me, read_by_user, readers, results, set_active, signin, signup, voters, AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};
use super::openapi::ApiDoc;

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/logout", post(logout))
        .route("/me", get(me));

    let user_routes = Router::new()
        .nest("/auth", auth_routes)
        .route("/", get(list_users))
        .route("/:id", delete(delete_user));

    let anonce_routes = Router::new()
        .route("/", get(list_anonces).post(create_or_edit_anonce))
        .route("/read-by-user", get(read_by_user))
        .route("/read/:id", post(mark_as_read))
        .route("/comment", post(comment))
        .route("/:id", get(get_anonce).delete(delete_anonce))
        .route("/:id/readers", get(readers))
        .route("/:id/details", get(details));

    let vote_routes = Router::new()
        .route("/", get(list_votes).post(create_vote))
        .route("/voter", post(cast_vote))
        .route("/activer", patch(set_active))
        .route("/:id", delete(delete_vote))
        .route("/:id/resultats", get(results))
        .route("/:id/votants", get(voters));

    let jwt_state_for_middleware = jwt_state.clone();

    Router::new()
        .nest("/users", user_routes)
        .nest("/anonces", anonce_routes)
        .nest("/votes", vote_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Swagger UI at `/docs`, OpenAPI document at `/api-docs/openapi.json`.
pub fn create_swagger_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_router() {
        let response = create_health_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_swagger_serves_openapi_json() {
        let response = create_swagger_router()
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
