//! Book model, request payload and response payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Order in which violations are reported, whatever order the validator yields them in.
const FIELD_ORDER: [&str; 5] = ["title", "author", "isbn", "published_year", "genre"];

/// Book record as stored in the catalog.
///
/// `id` and the timestamps are assigned by the repository; a book without an `id`
/// has not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow)]
pub struct Book {
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: i32,
    pub genre: String,
    pub created_at: Option<DateTime<Utc>>,
    pub last_modified_at: Option<DateTime<Utc>>,
}

/// Create / update book request.
///
/// On create every field is required. On update the same payload acts as a patch:
/// absent, empty or zero fields leave the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[validate(
        required(message = "Title is required"),
        length(min = 1, message = "Title is required")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "Author is required"),
        length(min = 1, message = "Author is required")
    )]
    pub author: Option<String>,
    #[validate(
        required(message = "ISBN is required"),
        length(min = 1, message = "ISBN is required")
    )]
    pub isbn: Option<String>,
    #[validate(
        required(message = "Published year must be a positive integer"),
        range(min = 1, message = "Published year must be a positive integer")
    )]
    pub published_year: Option<i32>,
    #[validate(
        required(message = "Genre is required"),
        length(min = 1, message = "Genre is required")
    )]
    pub genre: Option<String>,
}

/// Book as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: i32,
    pub genre: String,
}

/// Check a create payload and hand it back when it is valid.
///
/// A missing payload fails on its own; otherwise every violated field contributes one
/// message and the messages are joined with `", "`.
pub fn validate_request(request: Option<BookRequest>) -> AppResult<BookRequest> {
    let request = request
        .ok_or_else(|| AppError::Validation("Book request payload is required".to_string()))?;

    let Err(errors) = request.validate() else {
        return Ok(request);
    };

    let field_errors = errors.field_errors();
    let messages: Vec<String> = FIELD_ORDER
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .filter_map(|errs| errs.first())
        .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .collect();

    Err(AppError::Validation(messages.join(", ")))
}

impl From<BookRequest> for Book {
    fn from(request: BookRequest) -> Self {
        Self {
            id: None,
            title: request.title.unwrap_or_default(),
            author: request.author.unwrap_or_default(),
            isbn: request.isbn.unwrap_or_default(),
            published_year: request.published_year.unwrap_or_default(),
            genre: request.genre.unwrap_or_default(),
            created_at: None,
            last_modified_at: None,
        }
    }
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.unwrap_or_default(),
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            published_year: book.published_year,
            genre: book.genre,
        }
    }
}

impl Book {
    /// Apply a patch: non-empty strings and a non-zero year overwrite, anything else is kept.
    ///
    /// Merged values are not re-validated, so a negative year goes through.
    pub fn merge(mut self, patch: &BookRequest) -> Self {
        overwrite(&mut self.title, &patch.title);
        overwrite(&mut self.author, &patch.author);
        overwrite(&mut self.isbn, &patch.isbn);
        if let Some(year) = patch.published_year.filter(|year| *year != 0) {
            self.published_year = year;
        }
        overwrite(&mut self.genre, &patch.genre);
        self
    }
}

fn overwrite(target: &mut String, value: &Option<String>) {
    if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
        *target = value.to_string();
    }
}
