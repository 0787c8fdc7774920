//! Loan model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Loan model from database.
///
/// `returned` is tri-state on purpose: NULL and FALSE both mean the loan
/// is still open; only TRUE closes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: Option<i32>,
    pub customer: String,
    pub book_id: i32,
    pub loan_date: NaiveDate,
    pub returned: Option<bool>,
}

/// Loan row joined with its book's isbn, the shape used by listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanRecord {
    pub id: i32,
    pub customer: String,
    pub book_id: i32,
    pub isbn: String,
    pub loan_date: NaiveDate,
    pub returned: Option<bool>,
}

/// Loan search filter with pagination.
///
/// Unlike the book filter, provided fields are combined with OR: a loan
/// matches when its book's isbn equals `isbn` or its customer equals
/// `customer`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoanQuery {
    pub isbn: Option<String>,
    pub customer: Option<String>,
    /// Page number, 1-based (default: 1)
    pub page: Option<i64>,
    /// Results per page (default: 20)
    pub per_page: Option<i64>,
}

impl LoanQuery {
    /// Effective page number: 1-based, never below 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size: defaults to 20, capped at [`super::MAX_PER_PAGE`]
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(20).clamp(1, super::MAX_PER_PAGE)
    }
}
