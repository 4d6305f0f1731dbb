//! Action resolver and dispatcher.
//!
//! Picks the descriptor a gesture maps to, runs it past the confirmation
//! gate, then performs exactly one side effect through the injected host
//! capabilities. Dispatch never fails: incomplete configuration degrades to
//! a skip and a declined prompt to a cancellation.

use std::borrow::Cow;
use std::sync::Arc;

use cardlink_core::config::ConfirmationConfig;
use cardlink_core::ServiceCall;
use serde_json::json;
use tracing::Instrument;
use uuid::Uuid;

use crate::confirmation::{ConfirmationGate, Prompt};
use crate::error::ActionError;
use crate::navigation::{navigate, HostWindow};
use crate::remote::RemoteControl;
use crate::signal::{emit, SignalTarget, CUSTOM, MORE_INFO};
use crate::toggle::toggle_call;
use crate::types::{
    Action, ActionDescriptor, DispatchOutcome, Gesture, SkipReason, WidgetActions,
};

/// The descriptor `gesture` runs: the one configured for it, else `more-info`.
pub fn resolve_action(config: &WidgetActions, gesture: Gesture) -> Cow<'_, ActionDescriptor> {
    match config.action_for(gesture) {
        Some(descriptor) => Cow::Borrowed(descriptor),
        None => Cow::Owned(ActionDescriptor::new(Action::MoreInfo)),
    }
}

/// Split `"<domain>.<service>"` into its first two segments.
pub fn parse_service(service: &str) -> Result<(&str, &str), ActionError> {
    let mut parts = service.split('.');
    match (parts.next(), parts.next()) {
        (Some(domain), Some(name)) if !domain.is_empty() && !name.is_empty() => Ok((domain, name)),
        _ => Err(ActionError::InvalidService(service.to_string())),
    }
}

/// Dispatcher that turns widget gestures into side effects.
pub struct ActionDispatcher {
    window: Arc<dyn HostWindow>,
    gate: ConfirmationGate,
}

impl ActionDispatcher {
    /// Create a dispatcher navigating and opening URLs on `window` and
    /// asking confirmations through `prompt`.
    pub fn new(
        window: Arc<dyn HostWindow>,
        prompt: Arc<dyn Prompt>,
        config: ConfirmationConfig,
    ) -> Self {
        Self {
            window,
            gate: ConfirmationGate::new(prompt, config),
        }
    }

    /// Handle one gesture on the widget `node`.
    ///
    /// Resolves only when the confirmation (if any) is answered. Service
    /// calls are spawned onto the runtime and not awaited.
    pub async fn handle(
        &self,
        node: &dyn SignalTarget,
        remote: &Arc<dyn RemoteControl>,
        config: &WidgetActions,
        gesture: Gesture,
    ) -> DispatchOutcome {
        let span = tracing::debug_span!("dispatch", id = %Uuid::new_v4(), gesture = %gesture);
        self.dispatch(node, remote, config, gesture)
            .instrument(span)
            .await
    }

    async fn dispatch(
        &self,
        node: &dyn SignalTarget,
        remote: &Arc<dyn RemoteControl>,
        config: &WidgetActions,
        gesture: Gesture,
    ) -> DispatchOutcome {
        let descriptor = resolve_action(config, gesture);
        let kind = descriptor.kind();

        let user_id = remote.user_id();
        if !self.gate.approve(&descriptor, user_id.as_deref()).await {
            return DispatchOutcome::Cancelled(kind);
        }

        let outcome = match self.execute(node, remote, config, &descriptor) {
            Ok(()) => DispatchOutcome::Executed(kind),
            Err(reason) => DispatchOutcome::Skipped { kind, reason },
        };
        match &outcome {
            DispatchOutcome::Skipped { reason, .. } => {
                tracing::debug!(action = %kind, reason = %reason, "Action skipped");
            }
            _ => tracing::info!(action = %kind, "Action executed"),
        }
        outcome
    }

    fn execute(
        &self,
        node: &dyn SignalTarget,
        remote: &Arc<dyn RemoteControl>,
        config: &WidgetActions,
        descriptor: &ActionDescriptor,
    ) -> Result<(), SkipReason> {
        match &descriptor.action {
            Action::MoreInfo => {
                let entity_id = config.more_info_target().ok_or(SkipReason::MissingTarget)?;
                emit(node, MORE_INFO, Some(&json!({ "entityId": entity_id })), None);
            }
            Action::Navigate { navigation_path } => {
                let path = non_empty(navigation_path).ok_or(SkipReason::MissingNavigationPath)?;
                navigate(&*self.window, path, false);
            }
            Action::Url { url_path } => {
                let url = non_empty(url_path).ok_or(SkipReason::MissingUrl)?;
                self.window.open_window(url);
            }
            Action::Toggle => {
                let entity_id = config.toggle_target().ok_or(SkipReason::MissingEntity)?;
                let state = remote.state(entity_id).map(|s| s.state);
                spawn_call(remote, toggle_call(state.as_deref(), entity_id));
            }
            Action::CallService {
                service,
                service_data,
                target,
            } => {
                let service = service.as_deref().ok_or(SkipReason::MissingService)?;
                let (domain, name) = parse_service(service)
                    .map_err(|_| SkipReason::InvalidService(service.to_string()))?;
                let mut call = ServiceCall::new(domain, name);
                if let Some(data) = service_data {
                    call = call.with_data(data.clone());
                }
                if let Some(target) = target {
                    call = call.with_target(target.clone());
                }
                spawn_call(remote, call);
            }
            Action::FireDomEvent { .. } => {
                emit(node, CUSTOM, Some(descriptor), None);
            }
            Action::None => return Err(SkipReason::NoAction),
            Action::Unknown => return Err(SkipReason::UnknownAction),
        }
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Fire-and-forget: the backend reports its own failures.
fn spawn_call(remote: &Arc<dyn RemoteControl>, call: ServiceCall) {
    let remote = Arc::clone(remote);
    tokio::spawn(async move {
        let label = call.to_string();
        if let Err(e) = remote.call_service(call).await {
            tracing::warn!(service = %label, error = %e, "Service call failed");
        }
    });
}
