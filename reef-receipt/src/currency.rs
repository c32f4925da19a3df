//! Default currency formatting
//!
//! The encoder and HTML renderer accept any `CurrencyFormatter`; the POS UI
//! normally injects its locale-aware formatter. This default covers the
//! common currencies without pulling in locale data.

use crate::types::RestaurantPrintSettings;

/// Formats an amount for display on a receipt
pub type CurrencyFormatter = fn(f64, &RestaurantPrintSettings) -> String;

/// Default formatter keyed off the restaurant's currency code
pub fn format_amount(amount: f64, settings: &RestaurantPrintSettings) -> String {
    match settings.currency.as_str() {
        "EUR" => format!("{:.2}€", amount),
        "GBP" => format!("£{:.2}", amount),
        "" | "USD" => format!("${:.2}", amount),
        other => format!("{} {:.2}", other, amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BillSize;

    fn settings(currency: &str) -> RestaurantPrintSettings {
        RestaurantPrintSettings {
            name: "Cafe X".to_string(),
            bill_size: BillSize::default(),
            currency: currency.to_string(),
            network_printer: None,
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(10.0, &settings("USD")), "$10.00");
        assert_eq!(format_amount(10.0, &settings("")), "$10.00");
        assert_eq!(format_amount(12.5, &settings("EUR")), "12.50€");
        assert_eq!(format_amount(3.0, &settings("GBP")), "£3.00");
        assert_eq!(format_amount(3.0, &settings("JPY")), "JPY 3.00");
    }
}
