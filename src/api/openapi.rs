//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "1.0.0",
        description = "Library catalog and loans REST API"
    ),
    servers(
        (url = "/api", description = "API root")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::list_book_loans,
        // Loans
        loans::list_loans,
        loans::create_loan,
        loans::return_loan,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookQuery,
            books::BookRequest,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::LoanRecord,
            crate::models::loan::LoanQuery,
            loans::LoanRequest,
            loans::LoanCreatedResponse,
            loans::ReturnedLoanRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "loans", description = "Loan management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
