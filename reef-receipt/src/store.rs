//! Persisted printer descriptor storage
//!
//! A single record holding the JSON-serialized identity of the last paired
//! printer. Absence or a corrupt record means "no descriptor", never an
//! error, so a stale or damaged file can only cost one silent reconnect.

use reef_printer::{PrintError, PrintResult, PrinterDeviceDescriptor};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Durable storage for the paired printer descriptor
pub trait DescriptorStore: Send + Sync {
    /// Load the stored descriptor, `None` if absent or unreadable
    fn load(&self) -> Option<PrinterDeviceDescriptor>;

    /// Persist the descriptor, replacing any previous one
    fn save(&self, descriptor: &PrinterDeviceDescriptor) -> PrintResult<()>;

    /// Remove the stored descriptor (no-op when absent)
    fn clear(&self);
}

/// File-backed store (one JSON file)
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DescriptorStore for JsonFileStore {
    fn load(&self) -> Option<PrinterDeviceDescriptor> {
        let bytes = std::fs::read(&self.path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(descriptor) => Some(descriptor),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "stored printer descriptor unreadable, ignoring");
                None
            }
        }
    }

    fn save(&self, descriptor: &PrinterDeviceDescriptor) -> PrintResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(descriptor)
            .map_err(|e| PrintError::InvalidConfig(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "failed to clear printer descriptor");
            }
        }
    }
}

/// In-memory store for hosts with their own persistence, and for tests
///
/// Clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<PrinterDeviceDescriptor>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DescriptorStore for MemoryStore {
    fn load(&self) -> Option<PrinterDeviceDescriptor> {
        self.slot.lock().ok()?.clone()
    }

    fn save(&self, descriptor: &PrinterDeviceDescriptor) -> PrintResult<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(descriptor.clone());
        }
        Ok(())
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reef_printer::TransportKind;

    fn descriptor() -> PrinterDeviceDescriptor {
        PrinterDeviceDescriptor {
            kind: TransportKind::Usb,
            vendor_id: 0x04b8,
            product_id: 0x0202,
            serial_number: None,
            manufacturer_name: Some("Epson".to_string()),
            product_name: Some("TM-T20".to_string()),
            protocol_language: Some("esc-pos".to_string()),
            codepage_mapping: Some("epson".to_string()),
        }
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("printer.json"));

        assert!(store.load().is_none());
        store.save(&descriptor()).unwrap();
        assert_eq!(store.load(), Some(descriptor()));

        store.clear();
        assert!(store.load().is_none());
        // Clearing twice is a no-op
        store.clear();
    }

    #[test]
    fn test_file_store_corrupt_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("printer.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = JsonFileStore::new(path);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_memory_store_shares_slot_across_clones() {
        let store = MemoryStore::new();
        let view = store.clone();

        store.save(&descriptor()).unwrap();
        assert_eq!(view.load(), Some(descriptor()));
        view.clear();
        assert!(store.load().is_none());
    }
}
