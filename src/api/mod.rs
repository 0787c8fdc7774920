//! API handlers for the library REST endpoints

pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{error::AppError, AppState};

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// List of items
    pub items: Vec<T>,
    /// Total number of matching items
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
}

/// Pagination query parameters
#[derive(Deserialize, ToSchema)]
pub struct PageQuery {
    /// Page number, 1-based (default: 1)
    pub page: Option<i64>,
    /// Results per page (default: 20)
    pub per_page: Option<i64>,
}

impl PageQuery {
    /// Effective page number: 1-based, never below 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size: defaults to 20, capped at [`crate::models::MAX_PER_PAGE`]
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(20).clamp(1, crate::models::MAX_PER_PAGE)
    }
}

/// JSON extractor that runs request validation before the handler.
///
/// Rejections carry the field errors in the standard error payload, one
/// entry per invalid field.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: serde::de::DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::Validation(flatten_validation_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten validator output into one message per invalid field, sorted by
/// field name so the list is deterministic
pub fn flatten_validation_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect()
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books (catalog)
        .route("/books", get(books::list_books))
        .route("/books", post(books::create_book))
        .route("/books/:id", get(books::get_book))
        .route("/books/:id", put(books::update_book))
        .route("/books/:id", delete(books::delete_book))
        .route("/books/:id/loans", get(books::list_book_loans))
        // Loans
        .route("/loans", get(loans::list_loans))
        .route("/loans", post(loans::create_loan))
        .route("/loans/:id", patch(loans::return_loan))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api", api)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "title must not be empty"))]
        title: String,
        #[validate(length(min = 1, message = "author must not be empty"))]
        author: String,
    }

    #[test]
    fn flattened_errors_are_sorted_by_field() {
        let sample = Sample {
            title: String::new(),
            author: String::new(),
        };
        let errors = sample.validate().unwrap_err();

        let messages = flatten_validation_errors(&errors);
        assert_eq!(
            messages,
            vec!["author must not be empty", "title must not be empty"]
        );
    }

    #[test]
    fn valid_input_produces_no_errors() {
        let sample = Sample {
            title: "As Aventuras".to_string(),
            author: "Artur".to_string(),
        };
        assert!(sample.validate().is_ok());
    }
}
