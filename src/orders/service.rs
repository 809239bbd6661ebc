//! Sales order business logic.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use super::dto::CreateSalesOrderRequest;
use super::model::SalesOrder;
use super::repository::SalesOrderRepository;
use super::validation::validate_order;
use crate::error::{OrdergateError, Result};

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Validates requests, applies business rules and delegates storage to a
/// [`SalesOrderRepository`].
pub struct SalesOrderService {
    repository: Arc<dyn SalesOrderRepository>,
}

impl SalesOrderService {
    pub fn new(repository: Arc<dyn SalesOrderRepository>) -> Self {
        Self { repository }
    }

    /// Fetch an order by number. A blank number never matches.
    pub async fn get_sales_order(&self, sales_order_number: &str) -> Result<Option<SalesOrder>> {
        if sales_order_number.trim().is_empty() {
            warn!("Lookup with empty sales order number");
            return Ok(None);
        }

        let order = self.repository.get_by_number(sales_order_number).await?;
        if order.is_none() {
            info!(sales_order_number, "Sales order not found");
        }
        Ok(order)
    }

    /// Orders of one customer, newest first. A blank code yields no orders.
    pub async fn get_sales_orders_by_customer(
        &self,
        customer_code: &str,
    ) -> Result<Vec<SalesOrder>> {
        if customer_code.trim().is_empty() {
            warn!("Lookup with empty customer code");
            return Ok(Vec::new());
        }

        self.repository.get_by_customer(customer_code).await
    }

    /// One page of all orders, newest first.
    pub async fn list_sales_orders(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<SalesOrder>> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self.repository.get_all(page.max(1), page_size).await
    }

    /// Validate and create a new order.
    pub async fn create_sales_order(&self, request: CreateSalesOrderRequest) -> Result<SalesOrder> {
        info!(
            customer_code = %request.customer_code,
            items = request.items.len(),
            "Creating sales order"
        );

        let now = Utc::now();
        let errors = validate_order(&request, now.date_naive());
        if !errors.is_empty() {
            let summary: Vec<&str> = errors.iter().map(|e| e.error.as_str()).collect();
            warn!(errors = %summary.join("; "), "Sales order validation failed");
            return Err(OrdergateError::Validation(errors));
        }

        self.check_business_rules(&request).await?;

        let created = self.repository.create(request.into_new_order(now)).await?;
        info!(
            sales_order_number = %created.sales_order_number,
            "Sales order created"
        );
        Ok(created)
    }

    async fn check_business_rules(&self, request: &CreateSalesOrderRequest) -> Result<()> {
        let customer = &request.customer_code;
        if !self.repository.customer_exists(customer).await? {
            warn!(customer_code = %customer, "Customer not found");
            return Err(OrdergateError::Business(format!("Customer '{}' not found", customer)));
        }

        for item in &request.items {
            if !self.repository.material_exists(&item.material_code).await? {
                warn!(material_code = %item.material_code, "Material not found");
                return Err(OrdergateError::Business(format!(
                    "Material '{}' not found",
                    item.material_code
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::repository::InMemorySalesOrderRepository;
    use chrono::Duration;

    fn service() -> SalesOrderService {
        SalesOrderService::new(Arc::new(InMemorySalesOrderRepository::new()))
    }

    fn request(customer: &str, material: &str) -> CreateSalesOrderRequest {
        let delivery = (Utc::now() + Duration::days(7)).to_rfc3339();
        serde_json::from_value(serde_json::json!({
            "documentType": "OR",
            "salesOrganization": "1000",
            "distributionChannel": "10",
            "division": "00",
            "customerCode": customer,
            "requestedDeliveryDate": delivery,
            "items": [
                { "materialCode": material, "quantity": 4, "unitOfMeasure": "UN", "plant": "1000" }
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_existing_order() {
        let order = service().get_sales_order("SO0000001000").await.unwrap();
        assert!(order.is_some());
    }

    #[tokio::test]
    async fn test_blank_lookups() {
        let service = service();
        assert!(service.get_sales_order("  ").await.unwrap().is_none());
        let orders = service.get_sales_orders_by_customer("").await.unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let service = service();
        let created = service
            .create_sales_order(request("C004", "M005"))
            .await
            .unwrap();

        assert_eq!(created.customer_name, "Raia Drogasil S.A.");
        let fetched = service
            .get_sales_order(&created.sales_order_number)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched, created);

        let by_customer = service.get_sales_orders_by_customer("C004").await.unwrap();
        assert_eq!(by_customer.len(), 1);
    }

    #[tokio::test]
    async fn test_validation_error() {
        let mut bad = request("C001", "M001");
        bad.division = String::new();

        let err = service().create_sales_order(bad).await.unwrap_err();
        match err {
            OrdergateError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].property, "division");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_customer_is_business_error() {
        let err = service()
            .create_sales_order(request("C999", "M001"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrdergateError::Business(_)));
        assert_eq!(err.to_string(), "Customer 'C999' not found");
    }

    #[tokio::test]
    async fn test_unknown_material_is_business_error() {
        let err = service()
            .create_sales_order(request("C001", "M999"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrdergateError::Business(_)));
        assert_eq!(err.to_string(), "Material 'M999' not found");
    }

    #[tokio::test]
    async fn test_list_clamps_page_size() {
        let service = service();
        for _ in 0..3 {
            service
                .create_sales_order(request("C002", "M002"))
                .await
                .unwrap();
        }

        assert_eq!(service.list_sales_orders(1, 0).await.unwrap().len(), 1);
        assert_eq!(service.list_sales_orders(1, 1000).await.unwrap().len(), 4);
        assert_eq!(service.list_sales_orders(2, 3).await.unwrap().len(), 1);
    }
}
