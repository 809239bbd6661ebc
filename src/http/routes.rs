//! Sales order endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use super::error::ApiError;
use super::state::AppState;
use crate::error::FieldError;
use crate::orders::{CreateSalesOrderRequest, SalesOrder};

const DEFAULT_PAGE_SIZE: usize = 10;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    page: Option<usize>,
    page_size: Option<usize>,
}

pub async fn list_sales_orders(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Vec<SalesOrder>>, ApiError> {
    let Query(params) = params.map_err(query_error)?;
    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    info!(page, page_size, "GET sales orders");

    let orders = state.orders.list_sales_orders(page, page_size).await?;
    Ok(Json(orders))
}

pub async fn get_sales_order(
    State(state): State<AppState>,
    sales_order_number: Result<Path<String>, PathRejection>,
) -> Result<Json<SalesOrder>, ApiError> {
    let Path(sales_order_number) = sales_order_number.map_err(path_error)?;
    info!(sales_order_number = %sales_order_number, "GET sales order");

    match state.orders.get_sales_order(&sales_order_number).await? {
        Some(order) => Ok(Json(order)),
        None => Err(ApiError::not_found(format!(
            "Sales order '{}' not found",
            sales_order_number
        ))),
    }
}

pub async fn get_sales_orders_by_customer(
    State(state): State<AppState>,
    customer_code: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<SalesOrder>>, ApiError> {
    let Path(customer_code) = customer_code.map_err(path_error)?;
    info!(customer_code = %customer_code, "GET sales orders by customer");

    let orders = state
        .orders
        .get_sales_orders_by_customer(&customer_code)
        .await?;
    Ok(Json(orders))
}

pub async fn create_sales_order(
    State(state): State<AppState>,
    uri: Uri,
    payload: Result<Json<CreateSalesOrderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(body_error)?;

    info!(
        customer_code = %request.customer_code,
        items = request.items.len(),
        "POST sales order"
    );

    let created = state.orders.create_sales_order(request).await?;
    let location = format!(
        "{}/{}",
        uri.path().trim_end_matches('/'),
        created.sales_order_number
    );

    let headers = [(header::LOCATION, location)];
    Ok((StatusCode::CREATED, headers, Json(created)))
}

fn query_error(rejection: QueryRejection) -> ApiError {
    ApiError::validation(vec![FieldError::new("query", rejection.body_text())])
}

fn body_error(rejection: JsonRejection) -> ApiError {
    ApiError::validation(vec![FieldError::new("body", rejection.body_text())])
}

fn path_error(rejection: PathRejection) -> ApiError {
    ApiError::validation(vec![FieldError::new("path", rejection.body_text())])
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}
