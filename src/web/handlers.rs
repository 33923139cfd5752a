//! Page handlers of the web client.
//!
//! None of these fail: service and transport errors end up as banners on
//! the page, an empty list, or a redirect.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Path, State},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Key, SignedCookieJar};
use serde::Deserialize;

use super::{
    client::BookPayload,
    flash::{self, Flash},
    views::{render, BookView, ConfirmDeletePage, FormPage, ListPage},
    WebState,
};

/// Fields of the create/edit form
#[derive(Debug, Default, Deserialize)]
pub struct BookForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub genre: String,
}

impl From<BookForm> for BookPayload {
    fn from(form: BookForm) -> Self {
        let blank_to_none = |s: String| if s.trim().is_empty() { None } else { Some(s) };
        Self {
            title: form.title.trim().to_string(),
            author: form.author.trim().to_string(),
            year: blank_to_none(form.year),
            genre: blank_to_none(form.genre),
        }
    }
}

/// Book id taken from the path. A non-numeric id sends the user back to
/// the list with a "Book not found" banner.
pub struct BookId(pub i64);

#[async_trait]
impl FromRequestParts<WebState> for BookId {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &WebState) -> Result<Self, Response> {
        match Path::<i64>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(BookId(id)),
            Err(rejection) => {
                tracing::debug!("Rejected book id: {}", rejection.body_text());
                let jar = SignedCookieJar::from_headers(&parts.headers, Key::from_ref(state));
                Err((
                    flash::push(jar, Flash::error("Book not found")),
                    Redirect::to("/books"),
                )
                    .into_response())
            }
        }
    }
}

pub async fn home() -> Redirect {
    Redirect::to("/books")
}

pub async fn list_books(State(state): State<WebState>, jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, mut flashes) = flash::take(jar);

    let books = match state.client.list_books().await {
        Ok(books) => books,
        Err(e) => {
            flashes.push(Flash::error(e.to_string()));
            Vec::new()
        }
    };

    let page = ListPage {
        flashes,
        books: books.into_iter().map(BookView::from).collect(),
    };
    (jar, render(page))
}

pub async fn new_book_form(jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, render(FormPage::create(flashes)))
}

pub async fn create_book(
    State(state): State<WebState>,
    jar: SignedCookieJar,
    Form(form): Form<BookForm>,
) -> impl IntoResponse {
    match state.client.create_book(&BookPayload::from(form)).await {
        Ok(_) => (
            flash::push(jar, Flash::success("Book added.")),
            Redirect::to("/books"),
        ),
        Err(e) => (
            flash::push(jar, Flash::error(format!("Could not create the book: {}", e))),
            Redirect::to("/books/new"),
        ),
    }
}

pub async fn edit_book_form(
    State(state): State<WebState>,
    jar: SignedCookieJar,
    BookId(id): BookId,
) -> Response {
    match state.client.get_book(id).await {
        Ok(book) => {
            let (jar, flashes) = flash::take(jar);
            (jar, render(FormPage::edit(flashes, BookView::from(book)))).into_response()
        }
        Err(e) => (
            flash::push(jar, Flash::error(e.to_string())),
            Redirect::to("/books"),
        )
            .into_response(),
    }
}

pub async fn update_book(
    State(state): State<WebState>,
    jar: SignedCookieJar,
    BookId(id): BookId,
    Form(form): Form<BookForm>,
) -> impl IntoResponse {
    match state.client.update_book(id, &BookPayload::from(form)).await {
        Ok(_) => (
            flash::push(jar, Flash::success("Book updated.")),
            Redirect::to("/books"),
        ),
        Err(e) => (
            flash::push(jar, Flash::error(format!("Could not update the book: {}", e))),
            Redirect::to(&format!("/books/{}/edit", id)),
        ),
    }
}

pub async fn confirm_delete(
    State(state): State<WebState>,
    jar: SignedCookieJar,
    BookId(id): BookId,
) -> Response {
    match state.client.get_book(id).await {
        Ok(book) => {
            let (jar, flashes) = flash::take(jar);
            let page = ConfirmDeletePage {
                flashes,
                book: BookView::from(book),
            };
            (jar, render(page)).into_response()
        }
        Err(e) => (
            flash::push(jar, Flash::error(e.to_string())),
            Redirect::to("/books"),
        )
            .into_response(),
    }
}

pub async fn delete_book(
    State(state): State<WebState>,
    jar: SignedCookieJar,
    BookId(id): BookId,
) -> impl IntoResponse {
    match state.client.delete_book(id).await {
        Ok(_) => (
            flash::push(jar, Flash::success("Book deleted.")),
            Redirect::to("/books"),
        ),
        Err(e) => (
            flash::push(jar, Flash::error(format!("Could not delete the book: {}", e))),
            Redirect::to(&format!("/books/{}/delete", id)),
        ),
    }
}
