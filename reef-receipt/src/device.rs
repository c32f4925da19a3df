//! Printer device connection manager
//!
//! Owns the lifecycle of the single hardware printer connection: pairing
//! through the platform device chooser, silent reconnect from the persisted
//! descriptor, byte transmission and state-change notification. One
//! instance exists per running client, constructed at the composition root
//! and shared by handle.

use crate::store::DescriptorStore;
use crate::types::ConnectionState;
use reef_printer::{HardwareTransport, OpenedDevice, PlatformHint, TransportChannel, TransportKind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, info, instrument, warn};

/// Lifecycle phase of the hardware connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

type Listener = Box<dyn Fn(&ConnectionState) + Send + Sync>;

struct Shared {
    phase: Phase,
    state: ConnectionState,
    listeners: Vec<(u64, Listener)>,
}

impl Shared {
    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }
}

/// Handle that deregisters a state listener when dropped
pub struct Subscription {
    id: u64,
    shared: Weak<Mutex<Shared>>,
}

impl Subscription {
    /// Deregister the listener now
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            let mut shared = shared.lock().unwrap_or_else(PoisonError::into_inner);
            shared.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Manager for the locally attached receipt printer
///
/// All operations are panic-free and report failure through their return
/// value; cancellation and missing capabilities are ordinary outcomes, not
/// errors.
pub struct DeviceConnectionManager {
    transports: Vec<Arc<dyn HardwareTransport>>,
    platform: PlatformHint,
    store: Box<dyn DescriptorStore>,
    channel: tokio::sync::Mutex<Option<Box<dyn TransportChannel>>>,
    shared: Arc<Mutex<Shared>>,
    next_listener_id: AtomicU64,
}

impl DeviceConnectionManager {
    pub fn new(
        transports: Vec<Arc<dyn HardwareTransport>>,
        platform: PlatformHint,
        store: Box<dyn DescriptorStore>,
    ) -> Self {
        Self {
            transports,
            platform,
            store,
            channel: tokio::sync::Mutex::new(None),
            shared: Arc::new(Mutex::new(Shared {
                phase: Phase::Disconnected,
                state: ConnectionState::disconnected(),
                listeners: Vec::new(),
            })),
            next_listener_id: AtomicU64::new(1),
        }
    }

    /// Whether any hardware transport capability exists in this runtime
    pub fn is_supported(&self) -> bool {
        self.transports.iter().any(|t| t.is_available())
    }

    /// Immutable snapshot of the connection state
    pub fn get_state(&self) -> ConnectionState {
        self.lock_shared().state.clone()
    }

    /// Register a state listener
    ///
    /// The listener runs synchronously on every state mutation, and once
    /// immediately with the current state. It must not call back into the
    /// manager. Dropping the returned subscription deregisters it.
    pub fn subscribe(
        &self,
        listener: impl Fn(&ConnectionState) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        let mut shared = self.lock_shared();
        listener(&shared.state);
        shared.listeners.push((id, Box::new(listener)));
        Subscription {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Open the platform device chooser and connect to the selected printer
    ///
    /// Requires an interactive user gesture. Returns `false` on chooser
    /// cancellation, missing transport capability or transport failure;
    /// nothing is persisted in those cases. Only one attempt may be in
    /// flight: a call while another is running returns `false`.
    #[instrument(skip(self))]
    pub async fn connect(&self) -> bool {
        {
            let mut shared = self.lock_shared();
            match shared.phase {
                Phase::Connecting | Phase::Disconnecting => {
                    debug!("connection attempt already in flight");
                    return false;
                }
                Phase::Connected => {
                    // Pairing a replacement printer: drop the live session,
                    // keep the persisted descriptor until the new pairing
                    // lands or fails.
                    shared.phase = Phase::Connecting;
                    shared.state.is_connected = false;
                    shared.state.printer_display_name = None;
                    shared.notify();
                }
                Phase::Disconnected => shared.phase = Phase::Connecting,
            }
        }

        if let Some(mut old) = self.channel.lock().await.take() {
            let _ = old.close().await;
        }

        let Some(transport) = self.select_transport() else {
            debug!("no hardware transport available");
            self.abort_attempt();
            return false;
        };

        let opened = match transport.request_device().await {
            Ok(Some(opened)) => opened,
            Ok(None) => {
                debug!("user dismissed the device chooser");
                self.abort_attempt();
                return false;
            }
            Err(e) => {
                warn!(error = %e, "device chooser failed");
                self.abort_attempt();
                return false;
            }
        };

        let OpenedDevice {
            descriptor,
            mut channel,
        } = opened;

        // Descriptor goes to durable storage before the state flips
        if let Err(e) = self.store.save(&descriptor) {
            warn!(error = %e, "failed to persist printer descriptor");
            let _ = channel.close().await;
            self.abort_attempt();
            return false;
        }

        *self.channel.lock().await = Some(channel);

        let display_name = descriptor.display_name();
        {
            let mut shared = self.lock_shared();
            shared.phase = Phase::Connected;
            shared.state = ConnectionState {
                is_connected: true,
                last_device: Some(descriptor),
                printer_display_name: Some(display_name.clone()),
            };
            shared.notify();
        }
        info!(printer = %display_name, "printer connected");
        true
    }

    /// Silently re-open the previously paired printer
    ///
    /// No user gesture; meant for the process-restart path. Returns `false`
    /// with no state change when nothing is persisted or the matching
    /// transport is missing. A failed re-open clears the stored descriptor
    /// so a dead identity is not retried on every restart.
    #[instrument(skip(self))]
    pub async fn reconnect(&self) -> bool {
        let Some(stored) = self.store.load() else {
            debug!("no persisted printer descriptor");
            return false;
        };
        let Some(transport) = self.transport_for(stored.kind) else {
            debug!(kind = %stored.kind, "transport for persisted descriptor unavailable");
            return false;
        };

        {
            let mut shared = self.lock_shared();
            if shared.phase != Phase::Disconnected {
                debug!("reconnect skipped, connection not idle");
                return false;
            }
            shared.phase = Phase::Connecting;
        }

        match transport.reopen(&stored).await {
            Ok(Some(opened)) => {
                let OpenedDevice {
                    descriptor,
                    mut channel,
                } = opened;
                if let Err(e) = self.store.save(&descriptor) {
                    warn!(error = %e, "failed to persist printer descriptor");
                    let _ = channel.close().await;
                    self.reset_after_failed_reconnect("descriptor persistence failed");
                    return false;
                }

                *self.channel.lock().await = Some(channel);

                let display_name = descriptor.display_name();
                {
                    let mut shared = self.lock_shared();
                    shared.phase = Phase::Connected;
                    shared.state = ConnectionState {
                        is_connected: true,
                        last_device: Some(descriptor),
                        printer_display_name: Some(display_name.clone()),
                    };
                    shared.notify();
                }
                info!(printer = %display_name, "printer reconnected");
                true
            }
            Ok(None) => {
                self.reset_after_failed_reconnect("device not present");
                false
            }
            Err(e) => {
                self.reset_after_failed_reconnect(&e.to_string());
                false
            }
        }
    }

    /// Close the connection and forget the paired printer
    ///
    /// Idempotent: disconnecting while already disconnected changes nothing
    /// and notifies nobody.
    #[instrument(skip(self))]
    pub async fn disconnect(&self) {
        {
            let mut shared = self.lock_shared();
            if shared.phase == Phase::Connecting || shared.phase == Phase::Disconnecting {
                debug!("disconnect skipped, connection attempt in flight");
                return;
            }
            shared.phase = Phase::Disconnecting;
        }

        if let Some(mut channel) = self.channel.lock().await.take() {
            if let Err(e) = channel.close().await {
                warn!(error = %e, "error closing printer channel");
            }
        }

        // Stored descriptor is cleared before the state flips
        self.store.clear();

        let mut shared = self.lock_shared();
        shared.phase = Phase::Disconnected;
        if shared.state != ConnectionState::disconnected() {
            shared.state = ConnectionState::disconnected();
            shared.notify();
            info!("printer disconnected");
        }
    }

    /// Send encoded receipt bytes to the connected printer
    ///
    /// Returns `false` when no live channel exists or the write fails. A
    /// transmission failure does not tear down the connection; a later
    /// explicit reconnect or disconnect surfaces a genuinely dead session.
    #[instrument(skip_all, fields(len = bytes.len()))]
    pub async fn print_receipt(&self, bytes: &[u8]) -> bool {
        let mut guard = self.channel.lock().await;
        let Some(channel) = guard.as_mut() else {
            debug!("print requested without a live channel");
            return false;
        };
        match channel.write_all(bytes).await {
            Ok(()) => {
                info!("receipt bytes sent to printer");
                true
            }
            Err(e) => {
                warn!(error = %e, "receipt transmission failed");
                false
            }
        }
    }

    fn select_transport(&self) -> Option<&Arc<dyn HardwareTransport>> {
        self.platform
            .preferred_transports()
            .into_iter()
            .find_map(|kind| self.transport_for(kind))
    }

    fn transport_for(&self, kind: TransportKind) -> Option<&Arc<dyn HardwareTransport>> {
        self.transports
            .iter()
            .find(|t| t.kind() == kind && t.is_available())
    }

    fn lock_shared(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn abort_attempt(&self) {
        self.lock_shared().phase = Phase::Disconnected;
    }

    fn reset_after_failed_reconnect(&self, reason: &str) {
        warn!(reason, "reconnect failed, clearing persisted descriptor");
        self.store.clear();
        let mut shared = self.lock_shared();
        shared.phase = Phase::Disconnected;
        shared.state = ConnectionState::disconnected();
        shared.notify();
    }
}
