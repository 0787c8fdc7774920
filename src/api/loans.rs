//! Loan management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanQuery, LoanRecord},
};

use super::{PaginatedResponse, ValidatedJson};

/// Create loan request
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoanRequest {
    /// Isbn of the book being loaned
    #[serde(default)]
    #[validate(length(min = 1, message = "isbn must not be empty"))]
    pub isbn: String,
    /// Customer taking the loan
    #[serde(default)]
    #[validate(length(min = 1, message = "customer must not be empty"))]
    pub customer: String,
}

/// Create loan response
#[derive(Serialize, ToSchema)]
pub struct LoanCreatedResponse {
    /// Loan ID
    pub id: i32,
}

/// Mark-returned request
#[derive(Deserialize, ToSchema)]
pub struct ReturnedLoanRequest {
    pub returned: bool,
}

/// List loans with filters and pagination.
///
/// When both `isbn` and `customer` are given the result is the union of
/// loans matching either.
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    params(
        ("isbn" = Option<String>, Query, description = "Filter by the book's isbn"),
        ("customer" = Option<String>, Query, description = "Filter by customer"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<i64>, Query, description = "Loans per page (default: 20)")
    ),
    responses(
        (status = 200, description = "Page of loans", body = PaginatedResponse<LoanRecord>)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<PaginatedResponse<LoanRecord>>> {
    let (items, total) = state.services.loans.search_loans(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page(),
        per_page: query.per_page(),
    }))
}

/// Create a new loan (lend a book to a customer)
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 201, description = "Loan created", body = LoanCreatedResponse),
        (status = 400, description = "Unknown isbn or book already loaned")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    ValidatedJson(request): ValidatedJson<LoanRequest>,
) -> AppResult<(StatusCode, Json<LoanCreatedResponse>)> {
    let book = state
        .services
        .books
        .get_book_by_isbn(&request.isbn)
        .await?
        .ok_or_else(|| AppError::BadRequest("Book not found for passed isbn".to_string()))?;

    let book_id = book
        .id
        .ok_or_else(|| AppError::Internal("Stored book has no id".to_string()))?;

    let loan = Loan {
        id: None,
        customer: request.customer,
        book_id,
        loan_date: Utc::now().date_naive(),
        returned: Some(false),
    };

    let created = state.services.loans.create_loan(loan).await?;
    let id = created
        .id
        .ok_or_else(|| AppError::Internal("Stored loan has no id".to_string()))?;

    Ok((StatusCode::CREATED, Json(LoanCreatedResponse { id })))
}

/// Mark a loan returned
#[utoipa::path(
    patch,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body = ReturnedLoanRequest,
    responses(
        (status = 200, description = "Loan updated", body = Loan),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<ReturnedLoanRequest>,
) -> AppResult<Json<Loan>> {
    let mut loan = state
        .services
        .loans
        .get_loan(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

    loan.returned = Some(request.returned);

    let updated = state.services.loans.update_loan(loan).await?;
    Ok(Json(updated))
}
