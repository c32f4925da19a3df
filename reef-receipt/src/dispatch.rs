//! Print dispatcher
//!
//! Orchestrates the three delivery channels for a receipt, in strict
//! fallback order: backend-proxied network printer, locally attached
//! thermal printer, browser print dialog. Failures between channels are
//! logged and swallowed; only a blocked print surface - the last resort -
//! reaches the caller.

use crate::device::DeviceConnectionManager;
use crate::encoder::ReceiptEncoder;
use crate::html::HtmlReceiptRenderer;
use crate::types::{MenuNameLookup, Order, RestaurantPrintSettings};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Capability supplied by the backend-aware caller: asks the server-side
/// proxy to print the order on the restaurant's network printer. Resolves
/// `true` on success; the callback maps its own errors to `false`.
pub type NetworkPrintFn = Arc<dyn Fn(String) -> BoxFuture<'static, bool> + Send + Sync>;

/// The print surface could not be opened (popup blocked or equivalent)
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SurfaceError(pub String);

/// Surface able to display and print an HTML document
///
/// Implemented by the host shell over its browser window or webview.
#[async_trait]
pub trait PrintSurface: Send + Sync {
    /// Present the document. When `auto_print` is set, trigger the platform
    /// print action once the document has loaded and close the surface
    /// after printing completes or is dismissed.
    async fn present(&self, html: &str, auto_print: bool) -> Result<(), SurfaceError>;
}

/// Dispatch errors visible to the calling UI layer
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The last-resort surface could not be opened; nothing else to try
    #[error("browser print surface blocked: {0}")]
    SurfaceBlocked(String),
}

/// Receipt print dispatcher
pub struct PrintDispatcher {
    device: Arc<DeviceConnectionManager>,
    surface: Arc<dyn PrintSurface>,
}

impl PrintDispatcher {
    pub fn new(device: Arc<DeviceConnectionManager>, surface: Arc<dyn PrintSurface>) -> Self {
        Self { device, surface }
    }

    /// Print a bill through the first channel that takes it
    ///
    /// Channel order: network proxy (when the caller supplied the
    /// capability), direct device, browser dialog. Intermediate failures
    /// fall through silently; `Err` means every channel was exhausted and
    /// the browser surface could not even open.
    #[instrument(skip_all, fields(order_id = %order.id))]
    pub async fn print_bill(
        &self,
        order: &Order,
        settings: &RestaurantPrintSettings,
        menu_names: &MenuNameLookup,
        auto_print: bool,
        network_print: Option<NetworkPrintFn>,
    ) -> Result<(), DispatchError> {
        let bytes = ReceiptEncoder::new(settings).encode(order, menu_names);

        // Channel 1: backend proxy. The callback owns the knowledge of
        // whether a network printer is configured and reachable.
        if let Some(request_network_print) = network_print {
            if request_network_print(order.id.clone()).await {
                info!("receipt printed via network proxy");
                return Ok(());
            }
            warn!("network print failed, trying direct device");
        }

        // Channel 2: locally attached thermal printer
        if self.device.is_supported() && self.device.get_state().is_connected {
            if self.device.print_receipt(&bytes).await {
                info!("receipt printed via direct device");
                return Ok(());
            }
            warn!("direct device print failed, trying browser dialog");
        }

        // Channel 3: browser print dialog, the universal last resort
        let html = HtmlReceiptRenderer::new(settings).render(order, menu_names);
        match self.surface.present(&html, auto_print).await {
            Ok(()) => {
                info!("receipt handed to print surface");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "print surface blocked, receipt not printed");
                Err(DispatchError::SurfaceBlocked(e.0))
            }
        }
    }
}
