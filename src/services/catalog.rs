//! Catalog management service

use crate::{
    error::AppResult,
    models::{Book, BookChanges, CreateBookRequest, NewBook, UpdateBookRequest},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Validate and insert a new book
    pub async fn create_book(&self, request: CreateBookRequest) -> AppResult<Book> {
        let new_book = NewBook::try_from(request)?;
        let book = self.repository.books.create(&new_book).await?;
        tracing::info!("Created book id={} title={:?}", book.id, book.title);
        Ok(book)
    }

    /// Apply a partial update. An unknown id is reported before any field error.
    pub async fn update_book(&self, id: i64, request: UpdateBookRequest) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await?;

        let changes = BookChanges::try_from(request)?;
        let book = self.repository.books.update(id, &changes).await?;
        tracing::info!("Updated book id={}", id);
        Ok(book)
    }

    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book id={}", id);
        Ok(())
    }
}
