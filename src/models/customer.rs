//! Checkout contact shape.

use serde::{Deserialize, Serialize};

/// Shipping contact remembered after a successful checkout.
///
/// Stored wholesale and used only to prefill the next checkout form;
/// validation happens in the form, never here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutCustomer {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
}

impl CheckoutCustomer {
    /// Copy with surrounding whitespace stripped from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_strips_whitespace() {
        let customer = CheckoutCustomer {
            full_name: "  Nguyễn Văn A ".to_string(),
            phone: "0901234567 ".to_string(),
            address: " 12 Lý Thường Kiệt".to_string(),
            email: "a@example.com".to_string(),
        };
        let trimmed = customer.trimmed();
        assert_eq!(trimmed.full_name, "Nguyễn Văn A");
        assert_eq!(trimmed.phone, "0901234567");
        assert_eq!(trimmed.address, "12 Lý Thường Kiệt");
        assert_eq!(trimmed.email, "a@example.com");
    }

    #[test]
    fn test_json_uses_camel_case() {
        let customer = CheckoutCustomer {
            full_name: "A".to_string(),
            ..CheckoutCustomer::default()
        };
        let json = serde_json::to_string(&customer).unwrap();
        assert!(json.contains("\"fullName\":\"A\""));
    }
}
