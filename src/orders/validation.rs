//! Field rules for sales order requests.
//!
//! Each property reports at most one error: the first rule it fails.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::dto::{CreateSalesOrderItemRequest, CreateSalesOrderRequest};
use crate::error::FieldError;

const DOCUMENT_TYPES: &[&str] = &["OR", "RE", "CR", "DR"];
const CURRENCIES: &[&str] = &["BRL", "USD", "EUR"];
const UNITS_OF_MEASURE: &[&str] = &["UN", "KG", "L", "M", "CX", "PC"];
const MAX_QUANTITY: i64 = 999_999;
const DELIVERY_DATE: &str = "requestedDeliveryDate";
const DOCUMENT_TYPE_HINT: &str = "Invalid document type. Use: OR, RE, CR, DR";

/// Collects field errors for one request.
#[derive(Default)]
struct Errors(Vec<FieldError>);

impl Errors {
    fn push(&mut self, property: impl Into<String>, error: impl Into<String>) {
        self.0.push(FieldError::new(property, error));
    }

    /// Check a required string against its length bounds and allowed values.
    fn text(
        &mut self,
        property: &str,
        value: &str,
        label: &str,
        length: Length,
        allowed: Option<(&[&str], &str)>,
    ) {
        if value.trim().is_empty() {
            self.push(property, format!("{} is required", label));
            return;
        }
        if let Some(message) = length.check(value, label) {
            self.push(property, message);
            return;
        }
        if let Some((allowed, message)) = allowed {
            let upper = value.to_uppercase();
            if !allowed.contains(&upper.as_str()) {
                self.push(property, message);
            }
        }
    }
}

/// Character-count constraint on a string field.
#[derive(Clone, Copy)]
enum Length {
    Exact(usize),
    Between(usize, usize),
    AtMost(usize),
}

impl Length {
    fn check(self, value: &str, label: &str) -> Option<String> {
        let len = value.chars().count();
        match self {
            Length::Exact(n) if len != n => Some(format!("{} must be {} characters", label, n)),
            Length::Between(min, max) if len < min || len > max => Some(format!(
                "{} must be between {} and {} characters",
                label, min, max
            )),
            Length::AtMost(max) if len > max => {
                Some(format!("{} must be at most {} characters", label, max))
            }
            _ => None,
        }
    }
}

/// Validate an order request against the field rules.
///
/// `today` is the current UTC date; delivery dates before it are rejected.
pub fn validate_order(request: &CreateSalesOrderRequest, today: NaiveDate) -> Vec<FieldError> {
    let mut errors = Errors::default();

    errors.text(
        "documentType",
        &request.document_type,
        "Document type",
        Length::Between(2, 4),
        Some((DOCUMENT_TYPES, DOCUMENT_TYPE_HINT)),
    );
    errors.text(
        "salesOrganization",
        &request.sales_organization,
        "Sales organization",
        Length::Exact(4),
        None,
    );
    errors.text(
        "distributionChannel",
        &request.distribution_channel,
        "Distribution channel",
        Length::Exact(2),
        None,
    );
    errors.text(
        "division",
        &request.division,
        "Division",
        Length::Exact(2),
        None,
    );
    errors.text(
        "customerCode",
        &request.customer_code,
        "Customer code",
        Length::AtMost(10),
        None,
    );

    match request.requested_delivery_date {
        None => errors.push(DELIVERY_DATE, "Requested delivery date is required"),
        Some(date) if date.date_naive() < today => {
            errors.push(DELIVERY_DATE, "Delivery date must be in the future")
        }
        Some(_) => {}
    }

    errors.text(
        "currency",
        &request.currency,
        "Currency",
        Length::Exact(3),
        Some((CURRENCIES, "Invalid currency")),
    );

    if request.items.is_empty() {
        errors.push("items", "The order must contain at least one item");
    }
    for (index, item) in request.items.iter().enumerate() {
        validate_item(&mut errors, index, item);
    }

    errors.0
}

fn validate_item(errors: &mut Errors, index: usize, item: &CreateSalesOrderItemRequest) {
    let prop = |name: &str| format!("items[{}].{}", index, name);

    errors.text(
        &prop("materialCode"),
        &item.material_code,
        "Material code",
        Length::AtMost(18),
        None,
    );

    if item.quantity <= Decimal::ZERO {
        errors.push(prop("quantity"), "Quantity must be greater than zero");
    } else if item.quantity > Decimal::from(MAX_QUANTITY) {
        errors.push(
            prop("quantity"),
            format!("Quantity cannot exceed {}", MAX_QUANTITY),
        );
    }

    errors.text(
        &prop("unitOfMeasure"),
        &item.unit_of_measure,
        "Unit of measure",
        Length::Between(2, 3),
        Some((UNITS_OF_MEASURE, "Invalid unit of measure")),
    );
    errors.text(&prop("plant"), &item.plant, "Plant", Length::Exact(4), None);

    if let Some(batch) = item.batch_number.as_deref().filter(|b| !b.is_empty()) {
        if let Some(message) = Length::AtMost(10).check(batch, "Batch number") {
            errors.push(prop("batchNumber"), message);
        }
    }
}
