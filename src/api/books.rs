//! Book catalog endpoints

use axum::{extract::State, http::StatusCode, Json};

use super::extract::{AppJson, AppPath};
use crate::{
    error::AppResult,
    models::{book::validate_request, Book, BookRequest, BookResponse},
    AppState,
};

/// List all books in the library
#[utoipa::path(
    get,
    path = "/v1/books",
    tag = "books",
    responses(
        (status = 200, description = "List of books", body = Vec<BookResponse>),
        (status = 404, description = "The library has no books", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<BookResponse>>> {
    tracing::info!("Fetching all books from the library");
    let books = state.services.catalog.get_all_books().await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// Create a new book
///
/// A request without a JSON body is reported as a missing payload.
#[utoipa::path(
    post,
    path = "/v1/books",
    tag = "books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AppJson(request): AppJson<BookRequest>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    tracing::info!("Creating a new book in the library: {:?}", request);

    tracing::debug!("Validating the book request");
    let request = validate_request(request)?;
    tracing::debug!("Validation successful");

    let created = state.services.catalog.create_book(Book::from(request)).await?;
    Ok((StatusCode::CREATED, Json(BookResponse::from(created))))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/v1/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<BookResponse>> {
    tracing::info!("Fetching book with ID: {}", id);
    let book = state.services.catalog.get_book_by_id(id).await?;
    Ok(Json(BookResponse::from(book)))
}

/// Update a book
///
/// Only non-empty strings and a non-zero year replace the stored values; a request
/// without a body changes nothing.
#[utoipa::path(
    put,
    path = "/v1/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Unreadable body or ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(patch): AppJson<BookRequest>,
) -> AppResult<Json<BookResponse>> {
    tracing::info!("Updating book with ID: {}", id);
    let patch = patch.unwrap_or_default();
    let book = state.services.catalog.update_book(id, &patch).await?;
    Ok(Json(BookResponse::from(book)))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/v1/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<StatusCode> {
    tracing::info!("Deleting book with ID: {}", id);
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
