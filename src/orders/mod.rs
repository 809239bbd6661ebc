//! Simulated ERP sales order module.

mod catalog;
mod dto;
mod model;
mod repository;
mod service;
mod validation;

pub use dto::{CreateSalesOrderItemRequest, CreateSalesOrderRequest};
pub use model::{NewSalesOrder, NewSalesOrderItem, OrderStatus, SalesOrder, SalesOrderItem};
pub use repository::{InMemorySalesOrderRepository, SalesOrderRepository};
pub use service::{SalesOrderService, MAX_PAGE_SIZE};
pub use validation::validate_order;
