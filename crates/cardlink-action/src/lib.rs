//! Action engine for Cardlink.
//!
//! Turns dashboard widget gestures into side effects: detail views,
//! navigation, backend service calls, device toggles, URLs and custom
//! signals, optionally gated behind a confirmation prompt.

pub mod confirmation;
pub mod debounce;
pub mod dispatcher;
pub mod error;
pub mod navigation;
pub mod remote;
pub mod signal;
pub mod toggle;
pub mod types;

pub use confirmation::{ConfirmationGate, Prompt};
pub use debounce::Debouncer;
pub use dispatcher::{parse_service, resolve_action, ActionDispatcher};
pub use error::{ActionError, RemoteError};
pub use navigation::{navigate, HostWindow};
pub use remote::{MemoryRemote, RemoteControl};
pub use signal::{emit, Signal, SignalBus, SignalOptions, SignalTarget};
pub use toggle::{resolve_toggle, toggle_call};
pub use types::{
    has_action, Action, ActionDescriptor, ActionKind, ConfirmationPolicy, DispatchOutcome,
    Exemption, Gesture, HandlerOptions, SkipReason, WidgetActions,
};
