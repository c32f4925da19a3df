//! HTML receipt renderer
//!
//! Browser-dialog fallback: renders the same content as the ESC/POS encoder
//! into a self-contained printable document. The physical width follows the
//! bill size (58mm / 80mm) with a matching pixel cap at 96 dpi.

use crate::currency::{format_amount, CurrencyFormatter};
use crate::types::{resolve_menu_name, BillSize, MenuNameLookup, Order, RestaurantPrintSettings};

/// HTML receipt renderer
pub struct HtmlReceiptRenderer<'a> {
    settings: &'a RestaurantPrintSettings,
    format_currency: CurrencyFormatter,
}

impl<'a> HtmlReceiptRenderer<'a> {
    pub fn new(settings: &'a RestaurantPrintSettings) -> Self {
        Self {
            settings,
            format_currency: format_amount,
        }
    }

    /// Replace the default currency formatter
    pub fn with_currency_formatter(mut self, format_currency: CurrencyFormatter) -> Self {
        self.format_currency = format_currency;
        self
    }

    /// Render the order as a printable document string
    pub fn render(&self, order: &Order, menu_names: &MenuNameLookup) -> String {
        let (mm, px) = match self.settings.bill_size {
            BillSize::Mm58 => ("58mm", 219),
            BillSize::Mm80 => ("80mm", 302),
        };

        let mut header = String::new();
        header.push_str(&format!(
            "<div>Order #{}  {}</div>\n",
            escape_html(order.short_id()),
            escape_html(&order.location_label())
        ));
        header.push_str(&format!(
            "<div>{}</div>\n",
            order.created_at.format("%Y-%m-%d %H:%M")
        ));
        if let Some(name) = &order.customer_name {
            header.push_str(&format!("<div>Customer: {}</div>\n", escape_html(name)));
        }
        if let Some(phone) = &order.customer_phone {
            header.push_str(&format!("<div>Phone: {}</div>\n", escape_html(phone)));
        }

        let items = order
            .items
            .iter()
            .map(|item| {
                let name = resolve_menu_name(menu_names, &item.menu_item_id);
                let total = (self.format_currency)(item.line_total(), self.settings);
                let mut line = format!(
                    "{} x {} - {}",
                    item.quantity,
                    escape_html(&name),
                    escape_html(&total)
                );
                if let Some(instructions) = &item.special_instructions {
                    line.push_str(&format!("<br>&nbsp;&nbsp;&nbsp;({})", escape_html(instructions)));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("<br>\n");

        let total = (self.format_currency)(order.total_amount, self.settings);

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Receipt</title>
<style>
  body {{ margin: 0; }}
  .receipt {{
    width: {mm};
    max-width: {px}px;
    font-family: "Courier New", monospace;
    font-size: 12px;
    white-space: pre-wrap;
    padding: 8px 4px;
  }}
  .center {{ text-align: center; }}
  .bold {{ font-weight: bold; }}
</style>
</head>
<body>
<div class="receipt">
<div class="center bold">{name}</div>
<br>
{header}<br>
<div class="items">{items}</div>
<br>
<div class="bold">Total: {total}</div>
<br>
<div class="center">Thank you!</div>
</div>
</body>
</html>
"#,
            mm = mm,
            px = px,
            name = escape_html(&self.settings.name),
            header = header,
            items = items,
            total = escape_html(&total),
        )
    }
}

/// Escape text for safe interpolation into HTML
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderItem;
    use chrono::{TimeZone, Utc};

    fn settings(bill_size: BillSize) -> RestaurantPrintSettings {
        RestaurantPrintSettings {
            name: "Cafe X".to_string(),
            bill_size,
            currency: "USD".to_string(),
            network_printer: None,
        }
    }

    fn sample_order() -> Order {
        Order {
            id: "abc123456789".to_string(),
            table_number: Some(4),
            order_type: "dine-in".to_string(),
            items: vec![OrderItem {
                menu_item_id: "m1".to_string(),
                quantity: 2,
                price: 5.0,
                special_instructions: Some("extra hot".to_string()),
            }],
            total_amount: 10.0,
            customer_name: None,
            customer_phone: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, 14, 12, 30, 0).unwrap(),
        }
    }

    fn menu() -> MenuNameLookup {
        let mut lookup = MenuNameLookup::new();
        lookup.insert("m1".to_string(), "Coffee".to_string());
        lookup
    }

    #[test]
    fn test_render_content() {
        let settings = settings(BillSize::Mm58);
        let html = HtmlReceiptRenderer::new(&settings).render(&sample_order(), &menu());

        assert!(html.contains("width: 58mm"));
        assert!(html.contains("max-width: 219px"));
        assert!(html.contains("Cafe X"));
        assert!(html.contains("Order #23456789  Table: 4"));
        assert!(html.contains("2 x Coffee - $10.00"));
        assert!(html.contains("(extra hot)"));
        assert!(html.contains("Total: $10.00"));
        assert!(html.contains("Thank you!"));
    }

    #[test]
    fn test_default_width_is_80mm() {
        let settings = settings(BillSize::Mm80);
        let html = HtmlReceiptRenderer::new(&settings).render(&sample_order(), &menu());
        assert!(html.contains("width: 80mm"));
        assert!(html.contains("max-width: 302px"));
    }

    #[test]
    fn test_interpolated_text_is_escaped() {
        let mut settings = settings(BillSize::Mm80);
        settings.name = "Joe's <Grill>".to_string();
        let mut order = sample_order();
        order.customer_name = Some("<script>alert(1)</script>".to_string());
        order.items[0].special_instructions = Some("no \"foam\" & <b>hot</b>".to_string());

        let html = HtmlReceiptRenderer::new(&settings).render(&order, &menu());

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Joe&#39;s &lt;Grill&gt;"));
        assert!(html.contains("no &quot;foam&quot; &amp; &lt;b&gt;hot&lt;/b&gt;"));
    }
}
