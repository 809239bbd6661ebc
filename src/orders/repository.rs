//! Sales order storage.
//!
//! The only implementation is an in-memory mock of the ERP sales document
//! API, seeded with one order at startup.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Months, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::debug;

use super::catalog;
use super::model::{NewSalesOrder, NewSalesOrderItem, OrderStatus, SalesOrder, SalesOrderItem};
use crate::error::{OrdergateError, Result};

/// Last number handed out before any order is created.
const FIRST_ORDER_NUMBER: u64 = 1000;
/// Highest number that fits the ten-digit document number.
const LAST_ORDER_NUMBER: u64 = 9_999_999_999;
/// Shelf life stamped on newly created items.
const SHELF_LIFE_MONTHS: u32 = 24;

/// Storage for sales orders and the master data they reference.
#[async_trait]
pub trait SalesOrderRepository: Send + Sync {
    /// Fetch an order by its document number.
    async fn get_by_number(&self, sales_order_number: &str) -> Result<Option<SalesOrder>>;

    /// All orders of a customer, newest first.
    async fn get_by_customer(&self, customer_code: &str) -> Result<Vec<SalesOrder>>;

    /// One page of all orders, newest first. `page` starts at 1.
    async fn get_all(&self, page: usize, page_size: usize) -> Result<Vec<SalesOrder>>;

    /// Number, price and store a new order.
    async fn create(&self, order: NewSalesOrder) -> Result<SalesOrder>;

    /// Whether the customer exists in master data.
    async fn customer_exists(&self, customer_code: &str) -> Result<bool>;

    /// Whether the material exists in master data.
    async fn material_exists(&self, material_code: &str) -> Result<bool>;
}

struct Store {
    orders: Vec<SalesOrder>,
    last_number: u64,
}

/// In-memory repository simulating the ERP backend.
pub struct InMemorySalesOrderRepository {
    store: RwLock<Store>,
}

impl InMemorySalesOrderRepository {
    /// Create a repository holding the demonstration order.
    pub fn new() -> Self {
        Self::with_orders(vec![seed_order(Utc::now())])
    }

    /// Create a repository holding exactly `orders`.
    pub fn with_orders(orders: Vec<SalesOrder>) -> Self {
        Self {
            store: RwLock::new(Store {
                orders,
                last_number: FIRST_ORDER_NUMBER,
            }),
        }
    }

    /// Number of stored orders.
    pub fn len(&self) -> usize {
        self.store.read().orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySalesOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SalesOrderRepository for InMemorySalesOrderRepository {
    async fn get_by_number(&self, sales_order_number: &str) -> Result<Option<SalesOrder>> {
        let store = self.store.read();
        Ok(store
            .orders
            .iter()
            .find(|o| o.sales_order_number == sales_order_number)
            .cloned())
    }

    async fn get_by_customer(&self, customer_code: &str) -> Result<Vec<SalesOrder>> {
        let store = self.store.read();
        let mut orders: Vec<SalesOrder> = store
            .orders
            .iter()
            .filter(|o| o.customer_code == customer_code)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    async fn get_all(&self, page: usize, page_size: usize) -> Result<Vec<SalesOrder>> {
        let skip = page.max(1).saturating_sub(1).saturating_mul(page_size);
        let store = self.store.read();
        let mut orders: Vec<&SalesOrder> = store.orders.iter().collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders
            .into_iter()
            .skip(skip)
            .take(page_size)
            .cloned()
            .collect())
    }

    async fn create(&self, order: NewSalesOrder) -> Result<SalesOrder> {
        let now = Utc::now();
        let items = order
            .items
            .into_iter()
            .enumerate()
            .map(|(index, item)| price_item(index, item, now))
            .collect::<Result<Vec<_>>>()?;
        let total_amount = sum_totals(&items)?;
        let customer_name = catalog::customer_name(&order.customer_code)
            .unwrap_or(catalog::UNKNOWN_CUSTOMER)
            .to_string();

        let mut store = self.store.write();
        if store.last_number >= LAST_ORDER_NUMBER {
            return Err(OrdergateError::Internal(
                "sales order number range exhausted".to_string(),
            ));
        }
        store.last_number += 1;

        let created = SalesOrder {
            sales_order_number: format_order_number(store.last_number),
            document_type: order.document_type,
            sales_organization: order.sales_organization,
            distribution_channel: order.distribution_channel,
            division: order.division,
            customer_code: order.customer_code,
            customer_name,
            order_date: now,
            requested_delivery_date: order.requested_delivery_date,
            purchase_order_number: order.purchase_order_number,
            currency: order.currency,
            total_amount,
            status: OrderStatus::Open,
            items,
            created_at: now,
            updated_at: None,
        };
        store.orders.push(created.clone());

        debug!(
            sales_order_number = %created.sales_order_number,
            items = created.items.len(),
            "Stored sales order"
        );

        Ok(created)
    }

    async fn customer_exists(&self, customer_code: &str) -> Result<bool> {
        Ok(catalog::customer_name(customer_code).is_some())
    }

    async fn material_exists(&self, material_code: &str) -> Result<bool> {
        Ok(catalog::material(material_code).is_some())
    }
}

fn format_order_number(number: u64) -> String {
    format!("SO{:010}", number)
}

fn format_item_number(index: usize) -> String {
    format!("{:06}", (index + 1) * 10)
}

fn price_item(index: usize, item: NewSalesOrderItem, now: DateTime<Utc>) -> Result<SalesOrderItem> {
    let (description, unit_price, expiration_date) = match catalog::material(&item.material_code) {
        Some(material) => (
            material.description.to_string(),
            material.unit_price(),
            now.checked_add_months(Months::new(SHELF_LIFE_MONTHS)),
        ),
        None => (String::new(), Decimal::ZERO, None),
    };

    let total_price = item.quantity.checked_mul(unit_price).ok_or_else(|| {
        OrdergateError::Internal(format!("price overflow on material {}", item.material_code))
    })?;

    Ok(SalesOrderItem {
        item_number: format_item_number(index),
        material_code: item.material_code,
        material_description: description,
        quantity: item.quantity,
        unit_of_measure: item.unit_of_measure,
        unit_price,
        total_price,
        plant: item.plant,
        storage_location: item.storage_location,
        batch_number: item.batch_number,
        expiration_date,
    })
}

fn sum_totals(items: &[SalesOrderItem]) -> Result<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |acc, item| {
        acc.checked_add(item.total_price)
            .ok_or_else(|| OrdergateError::Internal("order total overflow".to_string()))
    })
}

/// The demonstration order present at startup.
fn seed_order(now: DateTime<Utc>) -> SalesOrder {
    let expiration = now.checked_add_months(Months::new(SHELF_LIFE_MONTHS));
    let line = |index: usize, code: &str, quantity: i64, batch: &str| {
        let material = catalog::material(code);
        let unit_price = material.map(|m| m.unit_price()).unwrap_or_default();
        let quantity = Decimal::from(quantity);
        SalesOrderItem {
            item_number: format_item_number(index),
            material_code: code.to_string(),
            material_description: material.map_or("", |m| m.description).to_string(),
            quantity,
            unit_of_measure: "UN".to_string(),
            unit_price,
            total_price: quantity * unit_price,
            plant: "1000".to_string(),
            storage_location: Some("0001".to_string()),
            batch_number: Some(batch.to_string()),
            expiration_date: expiration,
        }
    };

    let items = vec![line(0, "M001", 10, "LOTE2024001"), line(1, "M003", 15, "LOTE2024002")];
    let total_amount: Decimal = items.iter().map(|i| i.total_price).sum();
    let order_date = now - Duration::days(5);

    SalesOrder {
        sales_order_number: format_order_number(FIRST_ORDER_NUMBER),
        document_type: "OR".to_string(),
        sales_organization: "1000".to_string(),
        distribution_channel: "10".to_string(),
        division: "00".to_string(),
        customer_code: "C001".to_string(),
        customer_name: catalog::customer_name("C001")
            .unwrap_or(catalog::UNKNOWN_CUSTOMER)
            .to_string(),
        order_date,
        requested_delivery_date: now + Duration::days(2),
        purchase_order_number: Some("PO-2024-001".to_string()),
        currency: "BRL".to_string(),
        total_amount,
        status: OrderStatus::Open,
        items,
        created_at: order_date,
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_order(customer: &str, items: &[(&str, i64)]) -> NewSalesOrder {
        NewSalesOrder {
            document_type: "OR".to_string(),
            sales_organization: "1000".to_string(),
            distribution_channel: "10".to_string(),
            division: "00".to_string(),
            customer_code: customer.to_string(),
            requested_delivery_date: Utc::now() + Duration::days(3),
            purchase_order_number: None,
            currency: "BRL".to_string(),
            items: items
                .iter()
                .map(|(code, qty)| NewSalesOrderItem {
                    material_code: code.to_string(),
                    quantity: Decimal::from(*qty),
                    unit_of_measure: "UN".to_string(),
                    plant: "1000".to_string(),
                    storage_location: None,
                    batch_number: None,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_seed_order_present() {
        let repo = InMemorySalesOrderRepository::new();
        let order = repo.get_by_number("SO0000001000").await.unwrap().unwrap();

        assert_eq!(order.customer_code, "C001");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].item_number, "000010");
        assert_eq!(order.items[1].item_number, "000020");
        assert_eq!(order.items[0].total_price, Decimal::new(15500, 2));
        assert_eq!(order.items[1].total_price, Decimal::new(28350, 2));
        assert_eq!(order.total_amount, Decimal::new(43850, 2));
        assert_eq!(order.status, OrderStatus::Open);
    }

    #[tokio::test]
    async fn test_get_by_number_missing() {
        let repo = InMemorySalesOrderRepository::new();
        assert!(repo.get_by_number("SO9999999999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_numbers_and_prices_order() {
        let repo = InMemorySalesOrderRepository::new();

        let created = repo
            .create(new_order("C002", &[("M002", 3), ("M004", 2)]))
            .await
            .unwrap();

        assert_eq!(created.sales_order_number, "SO0000001001");
        assert_eq!(created.customer_name, "Farmacia Pague Menos S.A.");
        assert_eq!(created.status, OrderStatus::Open);
        assert_eq!(created.items[0].item_number, "000010");
        assert_eq!(created.items[0].unit_price, Decimal::new(2280, 2));
        assert_eq!(created.items[0].total_price, Decimal::new(6840, 2));
        assert_eq!(created.items[1].item_number, "000020");
        assert_eq!(created.items[1].total_price, Decimal::new(7120, 2));
        assert_eq!(created.total_amount, Decimal::new(13960, 2));
        assert!(created.items.iter().all(|i| i.expiration_date.is_some()));
        assert_eq!(repo.len(), 2);

        let second = repo
            .create(new_order("C002", &[("M001", 1)]))
            .await
            .unwrap();
        assert_eq!(second.sales_order_number, "SO0000001002");
    }

    #[tokio::test]
    async fn test_get_by_customer_newest_first() {
        let repo = InMemorySalesOrderRepository::new();
        let created = repo
            .create(new_order("C001", &[("M001", 1)]))
            .await
            .unwrap();
        repo.create(new_order("C003", &[("M001", 1)]))
            .await
            .unwrap();

        let orders = repo.get_by_customer("C001").await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].sales_order_number, created.sales_order_number);
        assert_eq!(orders[1].sales_order_number, "SO0000001000");

        assert!(repo.get_by_customer("C005").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_all_paging() {
        let repo = InMemorySalesOrderRepository::with_orders(Vec::new());
        assert!(repo.is_empty());
        for _ in 0..5 {
            repo.create(new_order("C001", &[("M001", 1)]))
                .await
                .unwrap();
        }

        assert_eq!(repo.get_all(1, 2).await.unwrap().len(), 2);
        assert_eq!(repo.get_all(3, 2).await.unwrap().len(), 1);
        assert!(repo.get_all(4, 2).await.unwrap().is_empty());
        // Page 0 is treated as the first page
        assert_eq!(repo.get_all(0, 10).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_master_data_lookups() {
        let repo = InMemorySalesOrderRepository::new();
        assert!(repo.customer_exists("C005").await.unwrap());
        assert!(!repo.customer_exists("C999").await.unwrap());
        assert!(repo.material_exists("M003").await.unwrap());
        assert!(!repo.material_exists("M999").await.unwrap());
    }

    #[test]
    fn test_number_formats() {
        assert_eq!(format_order_number(1001), "SO0000001001");
        assert_eq!(format_item_number(0), "000010");
        assert_eq!(format_item_number(11), "000120");
    }
}
