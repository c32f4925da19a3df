//! Receipt encoder
//!
//! Renders an order snapshot into ESC/POS bytes for thermal printers.

use crate::currency::{format_amount, CurrencyFormatter};
use crate::types::{resolve_menu_name, MenuNameLookup, Order, RestaurantPrintSettings};
use reef_printer::{Alignment, CodepageMapping, EscPosBuilder};

/// Receipt encoder
///
/// Pure: encoding never fails, missing optional fields simply render
/// nothing. The column width follows the configured bill size (58mm -> 32
/// columns, 80mm -> 48).
pub struct ReceiptEncoder<'a> {
    settings: &'a RestaurantPrintSettings,
    width: usize,
    codepage: CodepageMapping,
    format_currency: CurrencyFormatter,
}

impl<'a> ReceiptEncoder<'a> {
    pub fn new(settings: &'a RestaurantPrintSettings) -> Self {
        Self {
            settings,
            width: settings.bill_size.columns(),
            codepage: CodepageMapping::default(),
            format_currency: format_amount,
        }
    }

    /// Use the printer's negotiated codepage instead of the default
    pub fn with_codepage(mut self, codepage: CodepageMapping) -> Self {
        self.codepage = codepage;
        self
    }

    /// Replace the default currency formatter
    pub fn with_currency_formatter(mut self, format_currency: CurrencyFormatter) -> Self {
        self.format_currency = format_currency;
        self
    }

    /// Encode the order to printer bytes
    pub fn encode(&self, order: &Order, menu_names: &MenuNameLookup) -> Vec<u8> {
        let mut b = EscPosBuilder::new(self.width);
        self.render_header(&mut b, order);
        self.render_items(&mut b, order, menu_names);
        self.render_footer(&mut b, order);
        b.build(self.codepage)
    }

    fn render_header(&self, b: &mut EscPosBuilder, order: &Order) {
        b.align(Alignment::Center);
        b.bold(true);
        b.line(&self.settings.name);
        b.bold(false);
        b.blank_line();

        b.align(Alignment::Left);
        b.line(&format!(
            "Order #{}  {}",
            order.short_id(),
            order.location_label()
        ));
        b.line(&order.created_at.format("%Y-%m-%d %H:%M").to_string());
        if let Some(name) = &order.customer_name {
            b.line(&format!("Customer: {}", name));
        }
        if let Some(phone) = &order.customer_phone {
            b.line(&format!("Phone: {}", phone));
        }
        b.blank_line();
    }

    fn render_items(&self, b: &mut EscPosBuilder, order: &Order, menu_names: &MenuNameLookup) {
        for item in &order.items {
            let name = resolve_menu_name(menu_names, &item.menu_item_id);
            let total = (self.format_currency)(item.line_total(), self.settings);
            let prefix = format!("{} x ", item.quantity);
            let suffix = format!(" - {}", total);

            // Quantity and amount stay visible; the name absorbs overflow
            let room = self
                .width
                .saturating_sub(self.codepage.width(&prefix) + self.codepage.width(&suffix));
            b.line(&format!(
                "{}{}{}",
                prefix,
                self.codepage.truncate(&name, room),
                suffix
            ));

            if let Some(instructions) = &item.special_instructions {
                b.line(&format!("   ({})", instructions));
            }
        }
    }

    fn render_footer(&self, b: &mut EscPosBuilder, order: &Order) {
        b.blank_line();
        b.bold(true);
        b.line(&format!(
            "Total: {}",
            (self.format_currency)(order.total_amount, self.settings)
        ));
        b.bold(false);
        b.blank_line();
        b.align(Alignment::Center);
        b.line("Thank you!");
        b.feed(2);
    }
}
