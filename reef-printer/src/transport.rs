//! Hardware transport abstraction
//!
//! The privileged device chooser (USB/serial pairing dialog) lives in the
//! host shell; this module owns the contract those backends implement and
//! the platform policy for picking between them. Backends are selected at
//! runtime from a `PlatformHint` supplied by the host instead of sniffing
//! environment strings.

use crate::error::PrintResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of hardware transport a printer is attached through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Usb,
    Serial,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usb => write!(f, "usb"),
            Self::Serial => write!(f, "serial"),
        }
    }
}

/// Host platform class, supplied by the embedding shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformHint {
    Windows,
    MacOs,
    Linux,
    #[default]
    Unknown,
}

impl PlatformHint {
    /// Detect the platform for native hosts
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            "linux" => Self::Linux,
            _ => Self::Unknown,
        }
    }

    /// Transport preference order for this platform
    ///
    /// On Windows the USB interface of a thermal printer is usually claimed
    /// by an OS printer driver, so a serial bridge is the reliable path
    /// there. Everywhere else raw USB is preferred.
    pub fn preferred_transports(&self) -> [TransportKind; 2] {
        match self {
            Self::Windows => [TransportKind::Serial, TransportKind::Usb],
            _ => [TransportKind::Usb, TransportKind::Serial],
        }
    }
}

/// Identity of a paired physical printer
///
/// Persisted across sessions so the printer can be re-opened without a new
/// user gesture. Never mutated, only replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterDeviceDescriptor {
    #[serde(rename = "type")]
    pub kind: TransportKind,
    pub vendor_id: u16,
    pub product_id: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Printer command language negotiated for this device ("esc-pos")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_language: Option<String>,
    /// Codepage table the printer is configured with ("epson", "gbk")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codepage_mapping: Option<String>,
}

impl PrinterDeviceDescriptor {
    /// Human-readable name for status displays
    pub fn display_name(&self) -> String {
        match (&self.manufacturer_name, &self.product_name) {
            (Some(m), Some(p)) => format!("{} {}", m, p),
            (None, Some(p)) => p.clone(),
            (Some(m), None) => m.clone(),
            (None, None) => format!("{} {:04x}:{:04x}", self.kind, self.vendor_id, self.product_id),
        }
    }
}

/// A negotiated device: its identity plus an open write channel
pub struct OpenedDevice {
    pub descriptor: PrinterDeviceDescriptor,
    pub channel: Box<dyn TransportChannel>,
}

/// Open transmission channel to a printer
#[async_trait]
pub trait TransportChannel: Send {
    /// Write the full byte stream to the device
    async fn write_all(&mut self, bytes: &[u8]) -> PrintResult<()>;

    /// Close the channel and release the device
    async fn close(&mut self) -> PrintResult<()>;
}

/// Hardware transport capability (USB or serial backend)
#[async_trait]
pub trait HardwareTransport: Send + Sync {
    /// Which transport this backend drives
    fn kind(&self) -> TransportKind;

    /// Whether this capability exists in the current runtime
    fn is_available(&self) -> bool;

    /// Open the device chooser and negotiate the selected printer.
    ///
    /// Requires an interactive user gesture. `Ok(None)` means the user
    /// dismissed the chooser.
    async fn request_device(&self) -> PrintResult<Option<OpenedDevice>>;

    /// Silently re-open a previously paired printer by its identity.
    ///
    /// `Ok(None)` means no matching device is present (unplugged or
    /// permission revoked).
    async fn reopen(&self, descriptor: &PrinterDeviceDescriptor)
    -> PrintResult<Option<OpenedDevice>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_preference() {
        assert_eq!(
            PlatformHint::Windows.preferred_transports(),
            [TransportKind::Serial, TransportKind::Usb]
        );
        assert_eq!(
            PlatformHint::Linux.preferred_transports(),
            [TransportKind::Usb, TransportKind::Serial]
        );
        assert_eq!(
            PlatformHint::Unknown.preferred_transports(),
            [TransportKind::Usb, TransportKind::Serial]
        );
    }

    #[test]
    fn test_descriptor_roundtrip() {
        let descriptor = PrinterDeviceDescriptor {
            kind: TransportKind::Usb,
            vendor_id: 0x04b8,
            product_id: 0x0202,
            serial_number: Some("A1B2".to_string()),
            manufacturer_name: Some("Epson".to_string()),
            product_name: Some("TM-T20".to_string()),
            protocol_language: Some("esc-pos".to_string()),
            codepage_mapping: Some("epson".to_string()),
        };

        let json = serde_json::to_string(&descriptor).unwrap();
        assert!(json.contains("\"type\":\"usb\""));
        let back: PrinterDeviceDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }

    #[test]
    fn test_display_name_fallback() {
        let descriptor = PrinterDeviceDescriptor {
            kind: TransportKind::Serial,
            vendor_id: 0x0416,
            product_id: 0x5011,
            serial_number: None,
            manufacturer_name: None,
            product_name: None,
            protocol_language: None,
            codepage_mapping: None,
        };
        assert_eq!(descriptor.display_name(), "serial 0416:5011");

        let named = PrinterDeviceDescriptor {
            manufacturer_name: Some("Epson".to_string()),
            product_name: Some("TM-T20".to_string()),
            ..descriptor
        };
        assert_eq!(named.display_name(), "Epson TM-T20");
    }
}
