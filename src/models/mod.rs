//! Data models for the library API

pub mod book;
pub mod loan;

/// Upper bound on the page size accepted from query parameters
pub const MAX_PER_PAGE: i64 = 100;

// Re-export commonly used types
pub use book::{Book, BookQuery};
pub use loan::{Loan, LoanQuery, LoanRecord};
