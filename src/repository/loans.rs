//! Loans repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanQuery, LoanRecord},
};

const LOAN_RECORD_SELECT: &str = "SELECT l.id, l.customer, l.book_id, b.isbn, l.loan_date, \
     l.returned FROM loans l JOIN books b ON b.id = l.book_id";

const LOAN_RECORD_COUNT: &str =
    "SELECT COUNT(*) FROM loans l JOIN books b ON b.id = l.book_id";

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID. Absence is a normal outcome, not an error.
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            "SELECT id, customer, book_id, loan_date, returned FROM loans WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    /// Check whether the book has a loan that has not been returned.
    /// NULL and FALSE both count as unreturned.
    pub async fn exists_unreturned_for_book(&self, book_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE book_id = $1 \
             AND (returned IS NULL OR returned = FALSE))",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Insert a new loan, returning it with the storage-assigned id
    pub async fn create(&self, loan: &Loan) -> AppResult<Loan> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO loans (customer, book_id, loan_date, returned) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&loan.customer)
        .bind(loan.book_id)
        .bind(loan.loan_date)
        .bind(loan.returned)
        .fetch_one(&self.pool)
        .await?;

        Ok(Loan {
            id: Some(id),
            customer: loan.customer.clone(),
            book_id: loan.book_id,
            loan_date: loan.loan_date,
            returned: loan.returned,
        })
    }

    /// Persist a full replacement of the loan, returning it as read back
    /// from storage
    pub async fn update(&self, id: i32, loan: &Loan) -> AppResult<Loan> {
        sqlx::query(
            "UPDATE loans SET customer = $1, book_id = $2, loan_date = $3, returned = $4 \
             WHERE id = $5",
        )
        .bind(&loan.customer)
        .bind(loan.book_id)
        .bind(loan.loan_date)
        .bind(loan.returned)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Search loans with pagination.
    ///
    /// Provided filter fields are combined with OR: the loan's book isbn
    /// equals the filter isbn, or the customer matches. No fields means
    /// no filtering.
    pub async fn search(&self, query: &LoanQuery) -> AppResult<(Vec<LoanRecord>, i64)> {
        let page = query.page();
        let per_page = query.per_page();
        let offset = (page - 1).saturating_mul(per_page);

        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new(LOAN_RECORD_COUNT);
        push_filters(&mut count_qb, query);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(LOAN_RECORD_SELECT);
        push_filters(&mut qb, query);
        qb.push(" ORDER BY l.id LIMIT ");
        qb.push_bind(per_page);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let loans = qb
            .build_query_as::<LoanRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok((loans, total))
    }

    /// List loans of one book with pagination
    pub async fn find_by_book(
        &self,
        book_id: i32,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<LoanRecord>, i64)> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, crate::models::MAX_PER_PAGE);
        let offset = (page - 1).saturating_mul(per_page);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE book_id = $1")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await?;

        let loans = sqlx::query_as::<_, LoanRecord>(&format!(
            "{} WHERE l.book_id = $1 ORDER BY l.id LIMIT $2 OFFSET $3",
            LOAN_RECORD_SELECT
        ))
        .bind(book_id)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((loans, total))
    }
}

/// Append the OR-combined predicates for populated filter fields
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &LoanQuery) {
    match (&query.isbn, &query.customer) {
        (Some(isbn), Some(customer)) => {
            qb.push(" WHERE (b.isbn = ");
            qb.push_bind(isbn.clone());
            qb.push(" OR l.customer = ");
            qb.push_bind(customer.clone());
            qb.push(")");
        }
        (Some(isbn), None) => {
            qb.push(" WHERE b.isbn = ");
            qb.push_bind(isbn.clone());
        }
        (None, Some(customer)) => {
            qb.push(" WHERE l.customer = ");
            qb.push_bind(customer.clone());
        }
        (None, None) => {}
    }
}
