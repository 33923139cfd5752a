//! Repository layer for database operations

pub mod books;

use sqlx::{Pool, Sqlite};

use crate::{error::AppResult, models::NewBook};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Sqlite>,
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create the `books` table if it does not exist yet
    pub async fn ensure_schema(&self) -> AppResult<()> {
        sqlx::query(books::CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Drop and recreate the `books` table, then insert the demo records
    pub async fn reset_with_demo_data(&self) -> AppResult<usize> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DROP TABLE IF EXISTS books").execute(&mut *tx).await?;
        sqlx::query(books::CREATE_TABLE).execute(&mut *tx).await?;

        let demo = demo_books();
        for book in &demo {
            sqlx::query("INSERT INTO books (title, author, year, genre) VALUES (?, ?, ?, ?)")
                .bind(&book.title)
                .bind(&book.author)
                .bind(book.year)
                .bind(&book.genre)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(demo.len())
    }
}

fn demo_books() -> Vec<NewBook> {
    [
        ("Cien años de soledad", "Gabriel García Márquez", 1967, "Realismo mágico"),
        ("El Quijote", "Miguel de Cervantes", 1605, "Novela"),
        ("Rayuela", "Julio Cortázar", 1963, "Novela"),
    ]
    .into_iter()
    .map(|(title, author, year, genre)| NewBook {
        title: title.to_string(),
        author: author.to_string(),
        year: Some(year),
        genre: Some(genre.to_string()),
    })
    .collect()
}
