//! Test doubles for hardware transports and channels

use async_trait::async_trait;
use reef_printer::{
    HardwareTransport, OpenedDevice, PrintError, PrintResult, PrinterDeviceDescriptor,
    TransportChannel, TransportKind,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub(crate) fn descriptor(kind: TransportKind) -> PrinterDeviceDescriptor {
    PrinterDeviceDescriptor {
        kind,
        vendor_id: 0x04b8,
        product_id: 0x0202,
        serial_number: Some("S123".to_string()),
        manufacturer_name: Some("Epson".to_string()),
        product_name: Some("TM-T20".to_string()),
        protocol_language: Some("esc-pos".to_string()),
        codepage_mapping: Some("epson".to_string()),
    }
}

/// Channel that records everything written to it
pub(crate) struct RecordingChannel {
    written: Arc<Mutex<Vec<Vec<u8>>>>,
    fail_writes: bool,
}

#[async_trait]
impl TransportChannel for RecordingChannel {
    async fn write_all(&mut self, bytes: &[u8]) -> PrintResult<()> {
        if self.fail_writes {
            return Err(PrintError::Connection("write refused".to_string()));
        }
        if let Ok(mut written) = self.written.lock() {
            written.push(bytes.to_vec());
        }
        Ok(())
    }

    async fn close(&mut self) -> PrintResult<()> {
        Ok(())
    }
}

/// Scriptable transport: hands out recording channels and counts calls
pub(crate) struct MockTransport {
    kind: TransportKind,
    available: bool,
    /// Device the chooser returns; `None` means the user cancels
    device: Option<PrinterDeviceDescriptor>,
    reopen_ok: bool,
    fail_writes: bool,
    pub written: Arc<Mutex<Vec<Vec<u8>>>>,
    pub request_calls: AtomicUsize,
    pub reopen_calls: AtomicUsize,
}

impl MockTransport {
    pub fn new(kind: TransportKind) -> Self {
        Self {
            kind,
            available: true,
            device: Some(descriptor(kind)),
            reopen_ok: true,
            fail_writes: false,
            written: Arc::new(Mutex::new(Vec::new())),
            request_calls: AtomicUsize::new(0),
            reopen_calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn with_cancelled_chooser(mut self) -> Self {
        self.device = None;
        self
    }

    pub fn with_reopen_failure(mut self) -> Self {
        self.reopen_ok = false;
        self
    }

    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    fn channel(&self) -> Box<dyn TransportChannel> {
        Box::new(RecordingChannel {
            written: self.written.clone(),
            fail_writes: self.fail_writes,
        })
    }
}

#[async_trait]
impl HardwareTransport for MockTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn request_device(&self) -> PrintResult<Option<OpenedDevice>> {
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.device.clone().map(|descriptor| OpenedDevice {
            descriptor,
            channel: self.channel(),
        }))
    }

    async fn reopen(
        &self,
        descriptor: &PrinterDeviceDescriptor,
    ) -> PrintResult<Option<OpenedDevice>> {
        self.reopen_calls.fetch_add(1, Ordering::SeqCst);
        if !self.reopen_ok {
            return Ok(None);
        }
        Ok(Some(OpenedDevice {
            descriptor: descriptor.clone(),
            channel: self.channel(),
        }))
    }
}
