use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Book {0} not found")]
    NotFound(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
}

impl NewBook {
    pub fn with_id(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            genre: self.genre,
        }
    }
}

#[async_trait]
pub trait BookStore {
    async fn create_book(&self, book: &NewBook) -> Result<Book, StorageError>;
    async fn get_books(&self) -> Result<Vec<Book>, StorageError>;
    async fn get_book(&self, id: i64) -> Result<Option<Book>, StorageError>;
    async fn update_book(&self, book: &Book) -> Result<(), StorageError>;
    async fn delete_book(&self, id: i64) -> Result<(), StorageError>;
    async fn search_books_by_title(&self, title: &str) -> Result<Vec<Book>, StorageError>;
    async fn test_connection(&self) -> Result<(), StorageError>;
}

pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        // An in-memory database lives per connection, so it must not be pooled.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                genre TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_title ON books(title)")
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }
}

fn book_from_row(row: &sqlx::sqlite::SqliteRow) -> Book {
    Book {
        id: row.get("id"),
        title: row.get("title"),
        author: row.get("author"),
        genre: row.get("genre"),
    }
}

#[async_trait]
impl BookStore for SqliteBackend {
    async fn create_book(&self, book: &NewBook) -> Result<Book, StorageError> {
        let result = sqlx::query("INSERT INTO books (title, author, genre) VALUES (?, ?, ?)")
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.genre)
            .execute(&self.pool)
            .await?;

        Ok(book.clone().with_id(result.last_insert_rowid()))
    }

    async fn get_books(&self) -> Result<Vec<Book>, StorageError> {
        let rows = sqlx::query("SELECT id, title, author, genre FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(book_from_row).collect())
    }

    async fn get_book(&self, id: i64) -> Result<Option<Book>, StorageError> {
        let row = sqlx::query("SELECT id, title, author, genre FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(book_from_row))
    }

    async fn update_book(&self, book: &Book) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE books SET title = ?, author = ?, genre = ? WHERE id = ?")
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.genre)
            .bind(book.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(book.id));
        }
        Ok(())
    }

    async fn delete_book(&self, id: i64) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id));
        }
        Ok(())
    }

    async fn search_books_by_title(&self, title: &str) -> Result<Vec<Book>, StorageError> {
        // SQLite LIKE is case-insensitive for ASCII
        let pattern = format!("%{}%", title);
        let rows = sqlx::query(
            "SELECT id, title, author, genre FROM books WHERE title LIKE ? ORDER BY id",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(book_from_row).collect())
    }

    async fn test_connection(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    inner: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    books: BTreeMap<i64, Book>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBackend {
    async fn create_book(&self, book: &NewBook) -> Result<Book, StorageError> {
        let mut state = self.inner.write().await;
        state.next_id += 1;
        let created = book.clone().with_id(state.next_id);
        state.books.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_books(&self) -> Result<Vec<Book>, StorageError> {
        Ok(self.inner.read().await.books.values().cloned().collect())
    }

    async fn get_book(&self, id: i64) -> Result<Option<Book>, StorageError> {
        Ok(self.inner.read().await.books.get(&id).cloned())
    }

    async fn update_book(&self, book: &Book) -> Result<(), StorageError> {
        let mut state = self.inner.write().await;
        match state.books.get_mut(&book.id) {
            Some(existing) => {
                *existing = book.clone();
                Ok(())
            }
            None => Err(StorageError::NotFound(book.id)),
        }
    }

    async fn delete_book(&self, id: i64) -> Result<(), StorageError> {
        self.inner
            .write()
            .await
            .books
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound(id))
    }

    async fn search_books_by_title(&self, title: &str) -> Result<Vec<Book>, StorageError> {
        let needle = title.to_lowercase();
        Ok(self
            .inner
            .read()
            .await
            .books
            .values()
            .filter(|book| book.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn test_connection(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
