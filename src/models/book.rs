//! Book model and catalog query types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book model from database.
///
/// `id` is `None` until the book is first persisted; the store assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Option<i32>,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// Catalog search filter with pagination.
///
/// Every provided field narrows the result set: title and author match by
/// case-insensitive substring, isbn by equality.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    /// Page number, 1-based (default: 1)
    pub page: Option<i64>,
    /// Results per page (default: 20)
    pub per_page: Option<i64>,
}

impl BookQuery {
    /// Effective page number: 1-based, never below 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size: defaults to 20, capped at [`super::MAX_PER_PAGE`]
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(20).clamp(1, super::MAX_PER_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_and_clamps() {
        assert_eq!(BookQuery::default().page(), 1);
        assert_eq!(
            BookQuery {
                page: Some(0),
                ..Default::default()
            }
            .page(),
            1
        );
        assert_eq!(
            BookQuery {
                page: Some(3),
                ..Default::default()
            }
            .page(),
            3
        );
    }

    #[test]
    fn per_page_defaults_and_clamps() {
        assert_eq!(BookQuery::default().per_page(), 20);
        assert_eq!(
            BookQuery {
                per_page: Some(0),
                ..Default::default()
            }
            .per_page(),
            1
        );
        assert_eq!(
            BookQuery {
                per_page: Some(i64::MAX),
                ..Default::default()
            }
            .per_page(),
            crate::models::MAX_PER_PAGE
        );
    }
}
