// Register Configuration
//
// Presentation-side defaults loaded from JSON: store identity plus the
// percentages applied when a sale does not specify its own.

use serde::{Deserialize, Serialize};

/// Register configuration loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterConfig {
    pub store_name: String,
    pub tax_pct: f64,
    pub discount_pct: f64,
    /// Symbol prefixed to rendered amounts.
    pub currency: String,
}

impl RegisterConfig {
    /// Default built-in register.
    pub fn default_register() -> Self {
        Self {
            store_name: "Corner Cafe".into(),
            tax_pct: 5.0,
            discount_pct: 0.0,
            currency: "₹".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_from_json() {
        let json = r#"
        {
          "storeName": "Depot",
          "taxPct": 12.0,
          "discountPct": 2.5,
          "currency": "$"
        }
        "#;

        let config: RegisterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.store_name, "Depot");
        assert_eq!(config.tax_pct, 12.0);
        assert_eq!(config.discount_pct, 2.5);
        assert_eq!(config.currency, "$");
    }

    #[test]
    fn default_register_charges_five_percent_tax() {
        let config = RegisterConfig::default_register();
        assert_eq!(config.tax_pct, 5.0);
        assert_eq!(config.discount_pct, 0.0);
    }
}
