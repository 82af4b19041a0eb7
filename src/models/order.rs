//! Order shapes for checkout submission and the local order history.

use serde::{Deserialize, Serialize};

/// Payment method recorded on the order.
///
/// `Bank` only means "show the static bank transfer details" on the
/// confirmation page; no gateway is involved.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "COD")]
    Cod,
    #[serde(rename = "BANK")]
    Bank,
}

/// One order line: the backend re-resolves prices from the product id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: u64,
    pub quantity: u32,
}

/// Payload POSTed to the order API at checkout submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub note: String,
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderItem>,
}

/// Order API response. Only the id matters to the client; everything else
/// the confirmation page refetches on its own.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderResponse {
    #[serde(default)]
    pub id: Option<u64>,
}

/// Locally remembered order, newest-first in the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: u64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_request_wire_format() {
        let request = OrderRequest {
            full_name: "Nguyễn Văn A".to_string(),
            phone: "0901234567".to_string(),
            address: "12 Lý Thường Kiệt".to_string(),
            email: "a@example.com".to_string(),
            note: String::new(),
            payment_method: PaymentMethod::Cod,
            items: vec![OrderItem {
                product_id: 42,
                quantity: 2,
            }],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"fullName\""));
        assert!(json.contains("\"paymentMethod\":\"COD\""));
        assert!(json.contains("\"items\":[{\"productId\":42,\"quantity\":2}]"));
    }

    #[test]
    fn test_payment_method_round_trip() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Bank).unwrap(), "\"BANK\"");
        let parsed: PaymentMethod = serde_json::from_str("\"COD\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Cod);
    }

    #[test]
    fn test_order_response_tolerates_extra_fields() {
        let parsed: OrderResponse =
            serde_json::from_str(r#"{"id":7,"status":"PENDING","total":99000}"#).unwrap();
        assert_eq!(parsed.id, Some(7));
        let missing: OrderResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.id, None);
    }
}
