//! Repository layer for book persistence

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::Book};

/// Storage operations on book records.
///
/// No validation or business rules live here; see `CatalogService`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books, in storage order
    async fn find_all(&self) -> AppResult<Vec<Book>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>>;

    /// Insert when `book.id` is `None` (assigning id and `created_at`),
    /// otherwise overwrite the stored row and refresh `last_modified_at`.
    async fn save(&self, book: Book) -> AppResult<Book>;

    /// Remove the stored row. A row that is already gone is not an error.
    async fn delete(&self, book: &Book) -> AppResult<()>;
}

/// Main repository struct holding the storage backends
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookRepository>,
}

impl Repository {
    /// Create a repository backed by PostgreSQL
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(postgres::PgBookRepository::new(pool)),
        }
    }

    /// Create a repository that keeps everything in process memory
    pub fn in_memory() -> Self {
        Self {
            books: Arc::new(memory::InMemoryBookRepository::new()),
        }
    }
}
