//! Book model, request payloads and their validation.
//!
//! Request bodies are deserialized loosely (raw JSON values) and then turned
//! into [`NewBook`] or [`BookChanges`], which only hold values that satisfy
//! the catalog invariants.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

pub const TITLE_MAX_LEN: u64 = 180;
pub const AUTHOR_MAX_LEN: u64 = 120;
pub const GENRE_MAX_LEN: u64 = 80;

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Publication year
    pub year: Option<i32>,
    pub genre: Option<String>,
}

/// Create book request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateBookRequest {
    #[schema(value_type = String)]
    pub title: Option<Value>,
    #[schema(value_type = String)]
    pub author: Option<Value>,
    /// Integer, or a string holding one
    #[schema(value_type = Option<i32>)]
    pub year: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub genre: Option<Value>,
}

/// Partial update request.
///
/// Each field is `None` when absent from the body, `Some(None)` when sent as
/// `null` and `Some(Some(value))` otherwise.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBookRequest {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<Value>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub author: Option<Option<Value>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub year: Option<Option<Value>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub genre: Option<Option<Value>>,
}

/// Validated values for a new record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: Option<i32>,
    pub genre: Option<String>,
}

/// Validated partial update. The outer `Option` is `None` for fields to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<Option<i32>>,
    pub genre: Option<Option<String>>,
}

/// Column widths of the `books` table
#[derive(Debug, Validate)]
struct ColumnWidths {
    #[validate(length(max = TITLE_MAX_LEN, message = "title must be at most 180 characters"))]
    title: Option<String>,
    #[validate(length(max = AUTHOR_MAX_LEN, message = "author must be at most 120 characters"))]
    author: Option<String>,
    #[validate(length(max = GENRE_MAX_LEN, message = "genre must be at most 80 characters"))]
    genre: Option<String>,
}

impl ColumnWidths {
    fn check(self) -> AppResult<()> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };
        let field_errors = errors.field_errors();
        let message = ["title", "author", "genre"]
            .iter()
            .filter_map(|field| field_errors.get(*field))
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "invalid value".to_string());
        Err(AppError::Validation(message))
    }
}

impl BookChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.year.is_none() && self.genre.is_none()
    }
}

/// Delete confirmation body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub status: String,
    pub id: i64,
}

impl DeletedResponse {
    pub fn new(id: i64) -> Self {
        Self {
            status: "deleted".to_string(),
            id,
        }
    }
}

impl TryFrom<CreateBookRequest> for NewBook {
    type Error = AppError;

    fn try_from(request: CreateBookRequest) -> AppResult<Self> {
        let title = optional_text(request.title.as_ref())?.unwrap_or_default();
        let author = optional_text(request.author.as_ref())?.unwrap_or_default();
        let (title, author) = (title.trim(), author.trim());
        if title.is_empty() || author.is_empty() {
            return Err(AppError::Validation("title and author are required".to_string()));
        }

        let year = parse_year(request.year.as_ref())?;
        // stored as sent, only an empty genre collapses to null
        let genre = optional_text(request.genre.as_ref())?.filter(|g| !g.is_empty());

        let book = NewBook {
            title: title.to_string(),
            author: author.to_string(),
            year,
            genre,
        };
        ColumnWidths {
            title: Some(book.title.clone()),
            author: Some(book.author.clone()),
            genre: book.genre.clone(),
        }
        .check()?;
        Ok(book)
    }
}

impl TryFrom<UpdateBookRequest> for BookChanges {
    type Error = AppError;

    fn try_from(request: UpdateBookRequest) -> AppResult<Self> {
        let mut changes = BookChanges::default();

        if let Some(title) = request.title {
            changes.title = Some(required_text(title.as_ref(), "title")?);
        }
        if let Some(author) = request.author {
            changes.author = Some(required_text(author.as_ref(), "author")?);
        }
        if let Some(year) = request.year {
            changes.year = Some(parse_year(year.as_ref())?);
        }
        if let Some(genre) = request.genre {
            changes.genre = Some(
                optional_text(genre.as_ref())?
                    .map(|g| g.trim().to_string())
                    .filter(|g| !g.is_empty()),
            );
        }

        ColumnWidths {
            title: changes.title.clone(),
            author: changes.author.clone(),
            genre: changes.genre.clone().flatten(),
        }
        .check()?;
        Ok(changes)
    }
}

/// Text of a string-like field. `null` and absence both give `None`.
fn optional_text(value: Option<&Value>) -> AppResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(AppError::Validation("text fields must be strings".to_string())),
    }
}

fn required_text(value: Option<&Value>, field: &str) -> AppResult<String> {
    let text = optional_text(value)?.unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty", field)));
    }
    Ok(text.to_string())
}

/// `null` and `""` mean no year; anything else must be an integer.
pub fn parse_year(value: Option<&Value>) -> AppResult<Option<i32>> {
    let invalid = || AppError::Validation("year must be integer".to_string());

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse::<i32>().map(Some).map_err(|_| invalid()),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return i32::try_from(i).map(Some).map_err(|_| invalid());
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 => {
                    Ok(Some(f as i32))
                }
                _ => Err(invalid()),
            }
        }
        Some(_) => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create(body: Value) -> AppResult<NewBook> {
        let request: CreateBookRequest = serde_json::from_value(body).unwrap();
        NewBook::try_from(request)
    }

    fn update(body: Value) -> AppResult<BookChanges> {
        let request: UpdateBookRequest = serde_json::from_value(body).unwrap();
        BookChanges::try_from(request)
    }

    fn validation_message(result: AppResult<impl std::fmt::Debug>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn create_trims_title_and_author() {
        let book = create(json!({"title": "  Rayuela ", "author": " Julio Cortázar", "year": "1963"})).unwrap();
        assert_eq!(book.title, "Rayuela");
        assert_eq!(book.author, "Julio Cortázar");
        assert_eq!(book.year, Some(1963));
        assert_eq!(book.genre, None);
    }

    #[test]
    fn create_requires_title_and_author() {
        assert_eq!(
            validation_message(create(json!({"title": "   ", "author": "B"}))),
            "title and author are required"
        );
        assert_eq!(
            validation_message(create(json!({"title": "A"}))),
            "title and author are required"
        );
    }

    #[test]
    fn create_keeps_genre_as_sent() {
        let book = create(json!({"title": "A", "author": "B", "genre": " Novela "})).unwrap();
        assert_eq!(book.genre.as_deref(), Some(" Novela "));
        let book = create(json!({"title": "A", "author": "B", "genre": ""})).unwrap();
        assert_eq!(book.genre, None);
    }

    #[test]
    fn year_coercion() {
        assert_eq!(parse_year(Some(&json!(2000))).unwrap(), Some(2000));
        assert_eq!(parse_year(Some(&json!(" 1605 "))).unwrap(), Some(1605));
        assert_eq!(parse_year(Some(&json!(1999.0))).unwrap(), Some(1999));
        assert_eq!(parse_year(Some(&json!(""))).unwrap(), None);
        assert_eq!(parse_year(Some(&Value::Null)).unwrap(), None);
        assert!(parse_year(Some(&json!("abc"))).is_err());
        assert!(parse_year(Some(&json!(1999.5))).is_err());
        assert!(parse_year(Some(&json!(true))).is_err());
        assert!(parse_year(Some(&json!(10_000_000_000_i64))).is_err());
    }

    #[test]
    fn update_distinguishes_absent_null_and_empty() {
        let changes = update(json!({"title": "New"})).unwrap();
        assert_eq!(changes.title.as_deref(), Some("New"));
        assert_eq!(changes.year, None);
        assert_eq!(changes.genre, None);

        let changes = update(json!({"year": "", "genre": null})).unwrap();
        assert_eq!(changes.year, Some(None));
        assert_eq!(changes.genre, Some(None));

        let changes = update(json!({"year": 1967, "genre": "  Realismo mágico "})).unwrap();
        assert_eq!(changes.year, Some(Some(1967)));
        assert_eq!(changes.genre, Some(Some("Realismo mágico".to_string())));
    }

    #[test]
    fn update_rejects_empty_required_fields() {
        assert_eq!(validation_message(update(json!({"title": " "}))), "title cannot be empty");
        assert_eq!(validation_message(update(json!({"author": null}))), "author cannot be empty");
        assert_eq!(validation_message(update(json!({"year": "abc"}))), "year must be integer");
    }

    #[test]
    fn numbers_are_accepted_as_text() {
        let book = create(json!({"title": 1984, "author": "George Orwell"})).unwrap();
        assert_eq!(book.title, "1984");
        assert!(create(json!({"title": ["x"], "author": "B"})).is_err());
    }

    #[test]
    fn column_widths_are_enforced() {
        let long_title = "x".repeat(TITLE_MAX_LEN as usize + 1);
        assert_eq!(
            validation_message(create(json!({"title": long_title, "author": "B"}))),
            "title must be at most 180 characters"
        );
        let long_genre = "g".repeat(GENRE_MAX_LEN as usize + 1);
        assert_eq!(
            validation_message(update(json!({"genre": long_genre}))),
            "genre must be at most 80 characters"
        );
        let max_author = "a".repeat(AUTHOR_MAX_LEN as usize);
        assert!(update(json!({"author": max_author})).is_ok());
    }

    #[test]
    fn empty_update_has_no_changes() {
        assert!(update(json!({})).unwrap().is_empty());
        assert!(!update(json!({"genre": null})).unwrap().is_empty());
    }
}
