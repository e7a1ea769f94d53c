//! Catalog management service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookRequest},
    repository::BookRepository,
};

/// Business rules on top of the book repository.
///
/// Each operation reads then writes without locking; two concurrent updates of the
/// same book race and the last write wins.
#[derive(Clone)]
pub struct CatalogService {
    books: Arc<dyn BookRepository>,
}

impl CatalogService {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }

    /// List every book. An empty catalog is reported as not found.
    pub async fn get_all_books(&self) -> AppResult<Vec<Book>> {
        let books = self.books.find_all().await?;
        if books.is_empty() {
            return Err(AppError::not_found("Books", "All", "All"));
        }
        Ok(books)
    }

    pub async fn get_book_by_id(&self, id: i64) -> AppResult<Book> {
        self.books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Book", "id", id))
    }

    /// Persist an already validated book
    pub async fn create_book(&self, mut book: Book) -> AppResult<Book> {
        book.id = None;
        self.books.save(book).await
    }

    /// Merge `patch` into the stored book and save the result
    pub async fn update_book(&self, id: i64, patch: &BookRequest) -> AppResult<Book> {
        let existing = self.get_book_by_id(id).await?;
        self.books.save(existing.merge(patch)).await
    }

    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        let existing = self.get_book_by_id(id).await?;
        self.books.delete(&existing).await
    }
}
