//! Page templates

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::flash::Flash;
use crate::models::Book;

/// A book prepared for display; missing optional fields render empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookView {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: String,
    pub genre: String,
}

impl From<Book> for BookView {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            year: book.year.map(|y| y.to_string()).unwrap_or_default(),
            genre: book.genre.unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "books/list.html")]
pub struct ListPage {
    pub flashes: Vec<Flash>,
    pub books: Vec<BookView>,
}

#[derive(Template)]
#[template(path = "books/form.html")]
pub struct FormPage {
    pub flashes: Vec<Flash>,
    pub heading: String,
    /// Route the form posts back to
    pub action: String,
    pub submit_label: String,
    pub book: BookView,
}

impl FormPage {
    pub fn create(flashes: Vec<Flash>) -> Self {
        Self {
            flashes,
            heading: "New book".to_string(),
            action: "/books/new".to_string(),
            submit_label: "Add".to_string(),
            book: BookView::default(),
        }
    }

    pub fn edit(flashes: Vec<Flash>, book: BookView) -> Self {
        Self {
            flashes,
            heading: format!("Edit \u{201c}{}\u{201d}", book.title),
            action: format!("/books/{}/edit", book.id),
            submit_label: "Save".to_string(),
            book,
        }
    }
}

#[derive(Template)]
#[template(path = "books/confirm_delete.html")]
pub struct ConfirmDeletePage {
    pub flashes: Vec<Flash>,
    pub book: BookView,
}

/// Render a page, falling back to a bare 500 when the template fails
pub fn render<T: Template>(page: T) -> Response {
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template rendering failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
