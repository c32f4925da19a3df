//! Receipt domain data model
//!
//! Immutable snapshots handed over by the ordering layer. Nothing here is
//! owned or persisted by this subsystem except the printer descriptor
//! (see `store`).

use chrono::{DateTime, Utc};
use reef_printer::PrinterDeviceDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Paper roll width of the receipt printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BillSize {
    #[serde(rename = "58mm")]
    Mm58,
    #[default]
    #[serde(rename = "80mm")]
    Mm80,
}

impl BillSize {
    /// Character columns available at this paper width
    pub fn columns(&self) -> usize {
        match self {
            Self::Mm58 => 32,
            Self::Mm80 => 48,
        }
    }
}

/// Remote network printer configuration (used by the backend proxy)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPrinterConfig {
    pub host: String,
    pub port: u16,
}

/// Restaurant settings relevant to receipt printing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantPrintSettings {
    pub name: String,
    #[serde(default)]
    pub bill_size: BillSize,
    #[serde(default)]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_printer: Option<NetworkPrinterConfig>,
}

/// Single line item of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub menu_item_id: String,
    pub quantity: u32,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl OrderItem {
    /// Line total (quantity x unit price)
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

/// Order snapshot passed in by the ordering layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<u32>,
    pub order_type: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Last 8 characters of the order id, the short ticket reference
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().rev().nth(7) {
            Some((idx, _)) => &self.id[idx..],
            None => &self.id,
        }
    }

    /// Location label for the receipt header
    ///
    /// Dine-in orders with a table show "Table: N"; everything else shows
    /// the capitalized order type.
    pub fn location_label(&self) -> String {
        match (self.order_type.as_str(), self.table_number) {
            ("dine-in", Some(n)) => format!("Table: {}", n),
            _ => capitalize(&self.order_type),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Menu item id to display name mapping
pub type MenuNameLookup = HashMap<String, String>;

/// Resolve a menu item name, falling back to an id-derived label
pub fn resolve_menu_name(lookup: &MenuNameLookup, menu_item_id: &str) -> String {
    if let Some(name) = lookup.get(menu_item_id) {
        return name.clone();
    }
    let prefix: String = menu_item_id.chars().take(8).collect();
    format!("Item {}", prefix)
}

/// Snapshot of the hardware connection state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConnectionState {
    pub is_connected: bool,
    pub last_device: Option<PrinterDeviceDescriptor>,
    pub printer_display_name: Option<String>,
}

impl ConnectionState {
    /// Fully disconnected state (process start, after disconnect)
    pub fn disconnected() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(order_type: &str, table: Option<u32>) -> Order {
        Order {
            id: "abc123456789".to_string(),
            table_number: table,
            order_type: order_type.to_string(),
            items: Vec::new(),
            total_amount: 0.0,
            customer_name: None,
            customer_phone: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_short_id() {
        assert_eq!(order("dine-in", None).short_id(), "23456789");
        let mut short = order("dine-in", None);
        short.id = "ab12".to_string();
        assert_eq!(short.short_id(), "ab12");
    }

    #[test]
    fn test_location_label() {
        assert_eq!(order("dine-in", Some(7)).location_label(), "Table: 7");
        assert_eq!(order("takeout", None).location_label(), "Takeout");
        // A dine-in order without a table falls back to the order type
        assert_eq!(order("dine-in", None).location_label(), "Dine-in");
    }

    #[test]
    fn test_resolve_menu_name() {
        let mut lookup = MenuNameLookup::new();
        lookup.insert("m1".to_string(), "Coffee".to_string());
        assert_eq!(resolve_menu_name(&lookup, "m1"), "Coffee");
        assert_eq!(
            resolve_menu_name(&lookup, "deadbeef-cafe"),
            "Item deadbeef"
        );
    }

    #[test]
    fn test_bill_size() {
        assert_eq!(BillSize::Mm58.columns(), 32);
        assert_eq!(BillSize::Mm80.columns(), 48);
        assert_eq!(BillSize::default(), BillSize::Mm80);
        let parsed: BillSize = serde_json::from_str("\"58mm\"").unwrap();
        assert_eq!(parsed, BillSize::Mm58);
    }

    #[test]
    fn test_connection_state_default() {
        let state = ConnectionState::disconnected();
        assert!(!state.is_connected);
        assert!(state.last_device.is_none());
        assert!(state.printer_display_name.is_none());
    }
}
