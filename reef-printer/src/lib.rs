//! # reef-printer
//!
//! Thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - Codepage conversion (Epson western table, GBK for CJK printers)
//! - Hardware transport contract (USB / serial backends, platform policy)
//!
//! Business logic (WHAT to print) stays in application code; receipt
//! rendering lives in `reef-receipt`.
//!
//! ## Example
//!
//! ```
//! use reef_printer::{Alignment, CodepageMapping, EscPosBuilder};
//!
//! let mut builder = EscPosBuilder::new(32);
//! builder.align(Alignment::Center);
//! builder.bold(true);
//! builder.line("Cafe X");
//! builder.bold(false);
//! builder.align(Alignment::Left);
//! builder.line("2 x Coffee - $10.00");
//! builder.feed(2);
//! let bytes = builder.build(CodepageMapping::Epson);
//! assert_eq!(&bytes[..2], &[0x1B, 0x40]);
//! ```

mod codepage;
mod error;
mod escpos;
mod transport;

// Re-exports
pub use codepage::CodepageMapping;
pub use error::{PrintError, PrintResult};
pub use escpos::{Alignment, EscPosBuilder};
pub use transport::{
    HardwareTransport, OpenedDevice, PlatformHint, PrinterDeviceDescriptor, TransportChannel,
    TransportKind,
};
