//! HTTP surface of the sales order API.

mod error;
mod middleware;
mod routes;
mod server;
mod state;

use axum::{middleware::from_fn_with_state, routing::get, Router};

pub use error::{
    ApiError, ApiErrorResponse, CODE_BUSINESS, CODE_INTERNAL, CODE_NOT_FOUND, CODE_RATE_LIMITED,
    CODE_UNAUTHENTICATED, CODE_UNAUTHORIZED, CODE_VALIDATION,
};
pub use middleware::{
    client_identity, API_KEY_HEADER, RATE_LIMIT_LIMIT, RATE_LIMIT_REMAINING, RATE_LIMIT_RESET,
};
pub use server::HttpServer;
pub use state::{starts_with_segments, AppState};

/// Build the application router with its middleware stack.
///
/// Layers run outermost first: error envelope, admission control, API key
/// authentication, then the handlers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/api/sap/salesorders",
            get(routes::list_sales_orders).post(routes::create_sales_order),
        )
        .route(
            "/api/sap/salesorders/{sales_order_number}",
            get(routes::get_sales_order),
        )
        .route(
            "/api/sap/salesorders/customer/{customer_code}",
            get(routes::get_sales_orders_by_customer),
        )
        .fallback(routes::not_found)
        .layer(from_fn_with_state(state.clone(), middleware::require_api_key))
        .layer(from_fn_with_state(state.clone(), middleware::admission_control))
        .layer(from_fn_with_state(state.clone(), middleware::error_envelope))
        .with_state(state)
}
