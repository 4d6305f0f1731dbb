//! Signal emitter.
//!
//! Widgets report intents (show details, location changed, custom events)
//! by broadcasting named signals to whoever listens above them in the UI
//! tree. Services depend on [`SignalTarget`] rather than a concrete
//! transport.

use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

/// Ask the frontend to open the detail view for `{ entityId }`.
pub const MORE_INFO: &str = "hass-more-info";
/// The current location changed; payload `{ replace }`.
pub const LOCATION_CHANGED: &str = "location-changed";
/// Custom integrations; payload is the whole action descriptor.
pub const CUSTOM: &str = "ll-custom";

/// Propagation flags of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalOptions {
    pub bubbles: bool,
    pub cancelable: bool,
    pub composed: bool,
}

impl Default for SignalOptions {
    fn default() -> Self {
        Self {
            bubbles: true,
            cancelable: false,
            composed: true,
        }
    }
}

/// A named notification with an optional JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub name: String,
    pub detail: Option<Value>,
    pub options: SignalOptions,
}

/// Anything signals can be dispatched on: a widget node, the window.
pub trait SignalTarget: Send + Sync {
    fn dispatch(&self, signal: Signal);
}

/// Build a signal and dispatch it on `node`.
///
/// A payload that fails to serialize is sent as `null`.
pub fn emit<N, T>(
    node: &N,
    name: &str,
    detail: Option<&T>,
    options: Option<SignalOptions>,
) where
    N: SignalTarget + ?Sized,
    T: Serialize,
{
    let detail = detail.map(|d| serde_json::to_value(d).unwrap_or(Value::Null));
    let signal = Signal {
        name: name.to_string(),
        detail,
        options: options.unwrap_or_default(),
    };
    tracing::trace!(name = %signal.name, "Signal emitted");
    node.dispatch(signal);
}

/// A signal target that fans out to any number of subscribers.
#[derive(Clone)]
pub struct SignalBus {
    tx: broadcast::Sender<Signal>,
}

impl SignalBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.tx.subscribe()
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl SignalTarget for SignalBus {
    fn dispatch(&self, signal: Signal) {
        // Err only means there are no subscribers.
        let _ = self.tx.send(signal);
    }
}
