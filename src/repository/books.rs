//! Books repository

use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookChanges, NewBook},
};

/// `AUTOINCREMENT` keeps ids of deleted rows from being handed out again
pub const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title VARCHAR(180) NOT NULL,
        author VARCHAR(120) NOT NULL,
        year INTEGER,
        genre VARCHAR(80)
    )
"#;

const COLUMNS: &str = "id, title, author, year, genre";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// All books ordered by title (binary collation, so case-sensitive)
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY title ASC, id ASC",
            COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(AppError::book_not_found)
    }

    pub async fn create(&self, data: &NewBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, author, year, genre) VALUES (?, ?, ?, ?) RETURNING {}",
            COLUMNS
        ))
        .bind(&data.title)
        .bind(&data.author)
        .bind(data.year)
        .bind(&data.genre)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Apply the fields present in `changes` in a single statement
    pub async fn update(&self, id: i64, changes: &BookChanges) -> AppResult<Book> {
        if changes.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE books SET ");
        let mut sets = builder.separated(", ");

        if let Some(title) = &changes.title {
            sets.push("title = ").push_bind_unseparated(title.clone());
        }
        if let Some(author) = &changes.author {
            sets.push("author = ").push_bind_unseparated(author.clone());
        }
        if let Some(year) = changes.year {
            sets.push("year = ").push_bind_unseparated(year);
        }
        if let Some(genre) = &changes.genre {
            sets.push("genre = ").push_bind_unseparated(genre.clone());
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING ").push(COLUMNS);

        builder
            .build_query_as::<Book>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(AppError::book_not_found)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::book_not_found());
        }
        Ok(())
    }
}
