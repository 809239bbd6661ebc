//! Request payloads accepted by the sales order endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::model::{NewSalesOrder, NewSalesOrderItem};

/// Body of `POST /api/sap/salesorders`.
///
/// Missing fields deserialize to empty values so that the validator can
/// report every problem at once instead of failing on the first one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalesOrderRequest {
    #[serde(default)]
    pub document_type: String,
    #[serde(default)]
    pub sales_organization: String,
    #[serde(default)]
    pub distribution_channel: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub customer_code: String,
    #[serde(default)]
    pub requested_delivery_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub purchase_order_number: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub items: Vec<CreateSalesOrderItemRequest>,
}

/// One line of [`CreateSalesOrderRequest`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalesOrderItemRequest {
    #[serde(default)]
    pub material_code: String,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub unit_of_measure: String,
    #[serde(default)]
    pub plant: String,
    #[serde(default)]
    pub storage_location: Option<String>,
    #[serde(default)]
    pub batch_number: Option<String>,
}

fn default_currency() -> String {
    "BRL".to_string()
}

impl CreateSalesOrderRequest {
    /// Convert a validated request into a domain draft.
    ///
    /// `now` is used only when the delivery date is absent, which validation
    /// already rejects.
    pub fn into_new_order(self, now: DateTime<Utc>) -> NewSalesOrder {
        NewSalesOrder {
            document_type: self.document_type.to_uppercase(),
            sales_organization: self.sales_organization,
            distribution_channel: self.distribution_channel,
            division: self.division,
            customer_code: self.customer_code,
            requested_delivery_date: self.requested_delivery_date.unwrap_or(now),
            purchase_order_number: self.purchase_order_number,
            currency: self.currency.to_uppercase(),
            items: self.items.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<CreateSalesOrderItemRequest> for NewSalesOrderItem {
    fn from(item: CreateSalesOrderItemRequest) -> Self {
        NewSalesOrderItem {
            material_code: item.material_code,
            quantity: item.quantity,
            unit_of_measure: item.unit_of_measure.to_uppercase(),
            plant: item.plant,
            storage_location: item.storage_location,
            batch_number: item.batch_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_request() {
        let json = r#"{
            "documentType": "OR",
            "salesOrganization": "1000",
            "distributionChannel": "10",
            "division": "00",
            "customerCode": "C001",
            "requestedDeliveryDate": "2030-06-01T00:00:00Z",
            "purchaseOrderNumber": "PO-2024-001",
            "currency": "BRL",
            "items": [
                {
                    "materialCode": "M001",
                    "quantity": 10,
                    "unitOfMeasure": "UN",
                    "plant": "1000",
                    "storageLocation": "0001",
                    "batchNumber": "LOTE2024001"
                }
            ]
        }"#;

        let request: CreateSalesOrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.customer_code, "C001");
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].quantity, Decimal::from(10));
        assert!(request.requested_delivery_date.is_some());
    }

    #[test]
    fn test_missing_fields_default() {
        let request: CreateSalesOrderRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.document_type, "");
        assert_eq!(request.currency, "BRL");
        assert!(request.requested_delivery_date.is_none());
        assert!(request.items.is_empty());
    }

    #[test]
    fn test_into_new_order_normalizes_codes() {
        let request: CreateSalesOrderRequest = serde_json::from_str(
            r#"{"documentType": "or", "currency": "usd",
                "items": [{"materialCode": "M001", "quantity": "2.5",
                           "unitOfMeasure": "kg", "plant": "1000"}]}"#,
        )
        .unwrap();

        let order = request.into_new_order(Utc::now());
        assert_eq!(order.document_type, "OR");
        assert_eq!(order.currency, "USD");
        assert_eq!(order.items[0].unit_of_measure, "KG");
        assert_eq!(order.items[0].quantity, Decimal::new(25, 1));
    }
}
