//! In-process book repository

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::BookRepository;
use crate::{
    error::{AppError, AppResult},
    models::Book,
};

#[derive(Default)]
struct Store {
    last_id: i64,
    books: BTreeMap<i64, Book>,
}

/// Book repository backed by a map keyed by id; ids start at 1.
#[derive(Default)]
pub struct InMemoryBookRepository {
    store: RwLock<Store>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let store = self.store.read().await;
        Ok(store.books.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let store = self.store.read().await;
        Ok(store.books.get(&id).cloned())
    }

    async fn save(&self, mut book: Book) -> AppResult<Book> {
        let mut store = self.store.write().await;
        let id = match book.id {
            None => {
                store.last_id += 1;
                book.id = Some(store.last_id);
                book.created_at = Some(Utc::now());
                book.last_modified_at = None;
                store.last_id
            }
            Some(id) => {
                let existing = store
                    .books
                    .get(&id)
                    .ok_or_else(|| AppError::not_found("Book", "id", id))?;
                book.created_at = existing.created_at;
                book.last_modified_at = Some(Utc::now());
                id
            }
        };

        store.books.insert(id, book.clone());
        Ok(book)
    }

    async fn delete(&self, book: &Book) -> AppResult<()> {
        let id = book
            .id
            .ok_or_else(|| AppError::Internal("Cannot delete a book that was never saved".to_string()))?;
        self.store.write().await.books.remove(&id);
        Ok(())
    }
}
