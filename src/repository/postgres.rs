//! PostgreSQL book repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};

use super::BookRepository;
use crate::{
    error::{AppError, AppResult},
    models::Book,
};

#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn insert(&self, book: &Book) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, published_year, genre, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.published_year)
        .bind(&book.genre)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, book: &Book) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, author = $2, isbn = $3, published_year = $4, genre = $5,
                last_modified_at = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.published_year)
        .bind(&book.genre)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("Book", "id", id))
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, book: Book) -> AppResult<Book> {
        match book.id {
            None => self.insert(&book).await,
            Some(id) => self.update(id, &book).await,
        }
    }

    async fn delete(&self, book: &Book) -> AppResult<()> {
        let id = book
            .id
            .ok_or_else(|| AppError::Internal("Cannot delete a book that was never saved".to_string()))?;

        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            tracing::debug!(id, "Book already removed");
        }
        Ok(())
    }
}
