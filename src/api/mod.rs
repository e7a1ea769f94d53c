//! API handlers and router for the library REST endpoints

pub mod books;
pub mod extract;
pub mod health;
pub mod openapi;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::{ErrorMessage, ErrorResponse},
    AppState,
};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/v1/books", get(books::list_books).post(books::create_book))
        .route(
            "/v1/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(openapi::create_openapi_router())
        .layer(middleware::from_fn(attach_request_details))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Fill the `details` field of error bodies with the request path
async fn attach_request_details(request: Request, next: Next) -> Response {
    let details = format!("uri={}", request.uri().path());
    let response = next.run(request).await;

    let Some(ErrorMessage(message)) = response.extensions().get::<ErrorMessage>().cloned() else {
        return response;
    };

    (response.status(), Json(ErrorResponse { message, details })).into_response()
}
