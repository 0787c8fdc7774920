//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery},
        loan::LoanRecord,
    },
};

use super::{PageQuery, PaginatedResponse, ValidatedJson};

/// Book create/update request
#[derive(Deserialize, Validate, ToSchema)]
pub struct BookRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "author must not be empty"))]
    pub author: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "isbn must not be empty"))]
    pub isbn: String,
}

/// List books with filters and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(
        ("title" = Option<String>, Query, description = "Filter by title (substring, case-insensitive)"),
        ("author" = Option<String>, Query, description = "Filter by author (substring, case-insensitive)"),
        ("isbn" = Option<String>, Query, description = "Filter by exact isbn"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<i64>, Query, description = "Books per page (default: 20)")
    ),
    responses(
        (status = 200, description = "Page of books", body = PaginatedResponse<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    let (items, total) = state.services.books.search_books(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page(),
        per_page: query.per_page(),
    }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state
        .services
        .books
        .get_book(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input or duplicate isbn")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    ValidatedJson(request): ValidatedJson<BookRequest>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = Book {
        id: None,
        title: request.title,
        author: request.author,
        isbn: request.isbn,
    };

    let created = state.services.books.create_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing book.
///
/// Replaces the mutable fields (title and author); the isbn stays as
/// registered.
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<BookRequest>,
) -> AppResult<Json<Book>> {
    let mut book = state
        .services
        .books
        .get_book(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

    book.title = request.title;
    book.author = request.author;

    let updated = state.services.books.update_book(book).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let book = state
        .services
        .books
        .get_book(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

    state.services.books.delete_book(&book).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List loans of a book
#[utoipa::path(
    get,
    path = "/books/{id}/loans",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<i64>, Query, description = "Loans per page (default: 20)")
    ),
    responses(
        (status = 200, description = "Page of loans", body = PaginatedResponse<LoanRecord>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_book_loans(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Query(page_query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<LoanRecord>>> {
    let book = state
        .services
        .books
        .get_book(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

    let book_id = book
        .id
        .ok_or_else(|| AppError::Internal("Stored book has no id".to_string()))?;

    let page = page_query.page();
    let per_page = page_query.per_page();
    let (items, total) = state
        .services
        .loans
        .get_book_loans(book_id, page, per_page)
        .await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }))
}
