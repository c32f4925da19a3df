//! # reef-receipt
//!
//! Customer receipt printing - business logic over `reef-printer`.
//!
//! ## Scope
//!
//! This crate handles WHAT to print and WHERE it goes:
//! - Receipt rendering (ESC/POS bytes and printable HTML)
//! - Printer device connection lifecycle with persisted re-pairing
//! - Print dispatch across network proxy, direct device, browser dialog
//!
//! Protocol mechanics (ESC/POS commands, codepage conversion, hardware
//! transports) live in `reef-printer`.
//!
//! ## Example
//!
//! ```ignore
//! use reef_receipt::{
//!     DeviceConnectionManager, JsonFileStore, PrintDispatcher,
//! };
//! use reef_printer::PlatformHint;
//! use std::sync::Arc;
//!
//! let device = Arc::new(DeviceConnectionManager::new(
//!     transports,
//!     PlatformHint::detect(),
//!     Box::new(JsonFileStore::new("printer.json")),
//! ));
//! let dispatcher = PrintDispatcher::new(device.clone(), surface);
//! dispatcher.print_bill(&order, &settings, &menu_names, true, None).await?;
//! ```

mod currency;
mod device;
mod dispatch;
mod encoder;
mod html;
mod store;
#[cfg(test)]
mod testutil;
mod types;

// Re-exports
pub use currency::{format_amount, CurrencyFormatter};
pub use device::{DeviceConnectionManager, Subscription};
pub use dispatch::{DispatchError, NetworkPrintFn, PrintDispatcher, PrintSurface, SurfaceError};
pub use encoder::ReceiptEncoder;
pub use html::HtmlReceiptRenderer;
pub use store::{DescriptorStore, JsonFileStore, MemoryStore};
pub use types::{
    resolve_menu_name, BillSize, ConnectionState, MenuNameLookup, NetworkPrinterConfig, Order,
    OrderItem, RestaurantPrintSettings,
};
