//! Core types for the action engine.
//!
//! Gestures, the per-gesture action descriptors a widget is configured
//! with, and the outcome reported after a dispatch.

use cardlink_core::ServiceTarget;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// =============================================================================
// Enums
// =============================================================================

/// A user interaction recognized by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Tap,
    Hold,
    DoubleTap,
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gesture::Tap => write!(f, "tap"),
            Gesture::Hold => write!(f, "hold"),
            Gesture::DoubleTap => write!(f, "double_tap"),
        }
    }
}

impl std::str::FromStr for Gesture {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tap" => Ok(Gesture::Tap),
            "hold" => Ok(Gesture::Hold),
            "double_tap" => Ok(Gesture::DoubleTap),
            _ => Err(format!("Unknown gesture: {}", s)),
        }
    }
}

/// The kind of an [`Action`], without its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    None,
    Toggle,
    CallService,
    Navigate,
    Url,
    MoreInfo,
    FireDomEvent,
    Unknown,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::None => write!(f, "none"),
            ActionKind::Toggle => write!(f, "toggle"),
            ActionKind::CallService => write!(f, "call-service"),
            ActionKind::Navigate => write!(f, "navigate"),
            ActionKind::Url => write!(f, "url"),
            ActionKind::MoreInfo => write!(f, "more-info"),
            ActionKind::FireDomEvent => write!(f, "fire-dom-event"),
            ActionKind::Unknown => write!(f, "unknown"),
        }
    }
}

// =============================================================================
// Action descriptors
// =============================================================================

/// What to do, tagged by the `action` field.
///
/// Required fields are optional here on purpose: configuration may leave
/// them out and dispatch degrades to a no-op instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    None,
    Toggle,
    CallService {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        service: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        service_data: Option<Map<String, Value>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<ServiceTarget>,
    },
    Navigate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        navigation_path: Option<String>,
    },
    Url {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url_path: Option<String>,
    },
    MoreInfo,
    /// Free-form payload for custom integrations listening on `ll-custom`.
    FireDomEvent {
        #[serde(flatten)]
        fields: Map<String, Value>,
    },
    #[serde(other)]
    Unknown,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::None => ActionKind::None,
            Action::Toggle => ActionKind::Toggle,
            Action::CallService { .. } => ActionKind::CallService,
            Action::Navigate { .. } => ActionKind::Navigate,
            Action::Url { .. } => ActionKind::Url,
            Action::MoreInfo => ActionKind::MoreInfo,
            Action::FireDomEvent { .. } => ActionKind::FireDomEvent,
            Action::Unknown => ActionKind::Unknown,
        }
    }
}

/// One configured action plus its optional confirmation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    #[serde(flatten)]
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<ConfirmationPolicy>,
}

impl ActionDescriptor {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            confirmation: None,
        }
    }

    pub fn with_confirmation(mut self, confirmation: ConfirmationPolicy) -> Self {
        self.confirmation = Some(confirmation);
        self
    }

    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }
}

impl From<Action> for ActionDescriptor {
    fn from(action: Action) -> Self {
        Self::new(action)
    }
}

/// Ask before running an action, unless the acting user is exempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exemptions: Vec<Exemption>,
}

impl ConfirmationPolicy {
    /// Whether `user_id` skips the prompt. No user never matches.
    pub fn exempts(&self, user_id: Option<&str>) -> bool {
        match user_id {
            Some(id) => self.exemptions.iter().any(|e| e.user == id),
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exemption {
    pub user: String,
}

/// Whether a descriptor is configured to do something.
pub fn has_action(descriptor: Option<&ActionDescriptor>) -> bool {
    descriptor.is_some_and(|d| d.kind() != ActionKind::None)
}

// =============================================================================
// Widget configuration
// =============================================================================

/// The action-related part of a widget's configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetActions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tap_action: Option<ActionDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_action: Option<ActionDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_tap_action: Option<ActionDescriptor>,
}

impl WidgetActions {
    /// The descriptor configured for exactly this gesture.
    pub fn action_for(&self, gesture: Gesture) -> Option<&ActionDescriptor> {
        match gesture {
            Gesture::DoubleTap => self.double_tap_action.as_ref(),
            Gesture::Hold => self.hold_action.as_ref(),
            Gesture::Tap => self.tap_action.as_ref(),
        }
    }

    /// Identifier shown by a `more-info` action.
    ///
    /// An empty `entity` counts as absent, so `camera_image` is used rather
    /// than asking for the detail view of an empty id.
    pub fn more_info_target(&self) -> Option<&str> {
        non_empty(self.entity.as_deref()).or(non_empty(self.camera_image.as_deref()))
    }

    /// The entity a `toggle` action flips.
    pub fn toggle_target(&self) -> Option<&str> {
        non_empty(self.entity.as_deref())
    }

    /// Which gestures the host recognizer should listen for.
    pub fn handler_options(&self) -> HandlerOptions {
        HandlerOptions {
            has_hold: has_action(self.hold_action.as_ref()),
            has_double_click: has_action(self.double_tap_action.as_ref()),
            disabled: false,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Gesture recognizer settings for a widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerOptions {
    pub has_hold: bool,
    pub has_double_click: bool,
    pub disabled: bool,
}

// =============================================================================
// Outcomes
// =============================================================================

/// Why a dispatch produced no side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The action is `none`.
    NoAction,
    /// The action kind is not one this engine knows.
    UnknownAction,
    /// `more-info` with neither `entity` nor `camera_image`.
    MissingTarget,
    /// `toggle` without `entity`.
    MissingEntity,
    MissingNavigationPath,
    MissingUrl,
    MissingService,
    InvalidService(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoAction => write!(f, "no action configured"),
            SkipReason::UnknownAction => write!(f, "unknown action"),
            SkipReason::MissingTarget => write!(f, "no entity or camera_image"),
            SkipReason::MissingEntity => write!(f, "no entity"),
            SkipReason::MissingNavigationPath => write!(f, "no navigation_path"),
            SkipReason::MissingUrl => write!(f, "no url_path"),
            SkipReason::MissingService => write!(f, "no service"),
            SkipReason::InvalidService(s) => write!(f, "malformed service '{}'", s),
        }
    }
}

/// What happened to one gesture.
///
/// None of these is an error: skipped and cancelled dispatches are normal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Executed(ActionKind),
    Skipped { kind: ActionKind, reason: SkipReason },
    Cancelled(ActionKind),
}

impl DispatchOutcome {
    pub fn kind(&self) -> ActionKind {
        match self {
            DispatchOutcome::Executed(kind)
            | DispatchOutcome::Skipped { kind, .. }
            | DispatchOutcome::Cancelled(kind) => *kind,
        }
    }

    pub fn is_executed(&self) -> bool {
        matches!(self, DispatchOutcome::Executed(_))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gesture_display_and_from_str() {
        for (gesture, name) in [
            (Gesture::Tap, "tap"),
            (Gesture::Hold, "hold"),
            (Gesture::DoubleTap, "double_tap"),
        ] {
            assert_eq!(gesture.to_string(), name);
            assert_eq!(name.parse::<Gesture>().unwrap(), gesture);
        }
        assert!("swipe".parse::<Gesture>().is_err());
    }

    #[test]
    fn test_gesture_from_handler_event_detail() {
        let gesture: Gesture = serde_json::from_value(json!("double_tap")).unwrap();
        assert_eq!(gesture, Gesture::DoubleTap);
    }

    #[test]
    fn test_action_kind_display() {
        assert_eq!(ActionKind::CallService.to_string(), "call-service");
        assert_eq!(ActionKind::MoreInfo.to_string(), "more-info");
        assert_eq!(ActionKind::FireDomEvent.to_string(), "fire-dom-event");
        assert_eq!(ActionKind::Toggle.to_string(), "toggle");
    }

    #[test]
    fn test_descriptor_call_service_from_json() {
        let descriptor: ActionDescriptor = serde_json::from_value(json!({
            "action": "call-service",
            "service": "light.turn_on",
            "service_data": {"brightness": 200},
            "target": {"entity_id": "light.kitchen"},
        }))
        .unwrap();
        assert_eq!(descriptor.kind(), ActionKind::CallService);
        assert!(descriptor.confirmation.is_none());
        match descriptor.action {
            Action::CallService {
                service,
                service_data,
                target,
            } => {
                assert_eq!(service.as_deref(), Some("light.turn_on"));
                assert_eq!(service_data.unwrap()["brightness"], json!(200));
                assert!(target.unwrap().entity_id.is_some());
            }
            other => panic!("expected call-service, got {other:?}"),
        }
    }

    #[test]
    fn test_descriptor_with_confirmation_from_json() {
        let descriptor: ActionDescriptor = serde_json::from_value(json!({
            "action": "toggle",
            "confirmation": {
                "text": "Unlock the door?",
                "exemptions": [{"user": "abc123"}],
            },
        }))
        .unwrap();
        assert_eq!(descriptor.action, Action::Toggle);
        let policy = descriptor.confirmation.unwrap();
        assert_eq!(policy.text.as_deref(), Some("Unlock the door?"));
        assert!(policy.exempts(Some("abc123")));
        assert!(!policy.exempts(Some("someone-else")));
        assert!(!policy.exempts(None));
    }

    #[test]
    fn test_descriptor_unknown_kind() {
        let descriptor: ActionDescriptor =
            serde_json::from_value(json!({"action": "assist"})).unwrap();
        assert_eq!(descriptor.kind(), ActionKind::Unknown);
    }

    #[test]
    fn test_descriptor_missing_optional_fields() {
        let descriptor: ActionDescriptor =
            serde_json::from_value(json!({"action": "navigate"})).unwrap();
        assert_eq!(
            descriptor.action,
            Action::Navigate {
                navigation_path: None
            }
        );
    }

    #[test]
    fn test_fire_dom_event_keeps_custom_fields() {
        let descriptor: ActionDescriptor = serde_json::from_value(json!({
            "action": "fire-dom-event",
            "browser_mod": {"service": "browser_mod.popup"},
        }))
        .unwrap();
        assert_eq!(descriptor.kind(), ActionKind::FireDomEvent);

        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["action"], json!("fire-dom-event"));
        assert_eq!(value["browser_mod"]["service"], json!("browser_mod.popup"));
    }

    #[test]
    fn test_has_action() {
        assert!(!has_action(None));
        assert!(!has_action(Some(&ActionDescriptor::new(Action::None))));
        assert!(has_action(Some(&ActionDescriptor::new(Action::Toggle))));
        assert!(has_action(Some(&ActionDescriptor::new(Action::Unknown))));
    }

    #[test]
    fn test_action_for_matches_exact_gesture() {
        let widget = WidgetActions {
            tap_action: Some(Action::Toggle.into()),
            hold_action: Some(Action::MoreInfo.into()),
            ..WidgetActions::default()
        };
        assert_eq!(widget.action_for(Gesture::Tap).unwrap().kind(), ActionKind::Toggle);
        assert_eq!(widget.action_for(Gesture::Hold).unwrap().kind(), ActionKind::MoreInfo);
        assert!(widget.action_for(Gesture::DoubleTap).is_none());
    }

    #[test]
    fn test_more_info_target_prefers_entity() {
        let widget = WidgetActions {
            entity: Some("camera.porch_state".to_string()),
            camera_image: Some("camera.porch".to_string()),
            ..WidgetActions::default()
        };
        assert_eq!(widget.more_info_target(), Some("camera.porch_state"));

        let camera_only = WidgetActions {
            camera_image: Some("camera.porch".to_string()),
            ..WidgetActions::default()
        };
        assert_eq!(camera_only.more_info_target(), Some("camera.porch"));
        assert_eq!(WidgetActions::default().more_info_target(), None);

        let blank_entity = WidgetActions {
            entity: Some(String::new()),
            camera_image: Some("camera.porch".to_string()),
            ..WidgetActions::default()
        };
        assert_eq!(blank_entity.more_info_target(), Some("camera.porch"));
        assert_eq!(blank_entity.toggle_target(), None);
    }

    #[test]
    fn test_handler_options() {
        let widget = WidgetActions {
            hold_action: Some(Action::MoreInfo.into()),
            double_tap_action: Some(Action::None.into()),
            ..WidgetActions::default()
        };
        let options = widget.handler_options();
        assert!(options.has_hold);
        assert!(!options.has_double_click);
        assert!(!options.disabled);
        assert_eq!(
            serde_json::to_value(options).unwrap(),
            json!({"hasHold": true, "hasDoubleClick": false, "disabled": false})
        );
    }

    #[test]
    fn test_widget_actions_from_card_json() {
        let widget: WidgetActions = serde_json::from_value(json!({
            "entity": "lock.front_door",
            "tap_action": {"action": "toggle"},
            "hold_action": {"action": "more-info"},
        }))
        .unwrap();
        assert_eq!(widget.entity.as_deref(), Some("lock.front_door"));
        assert_eq!(widget.tap_action.unwrap().action, Action::Toggle);
        assert!(widget.double_tap_action.is_none());
    }

    #[test]
    fn test_dispatch_outcome_kind() {
        let outcome = DispatchOutcome::Skipped {
            kind: ActionKind::Url,
            reason: SkipReason::MissingUrl,
        };
        assert_eq!(outcome.kind(), ActionKind::Url);
        assert!(!outcome.is_executed());
        assert!(DispatchOutcome::Executed(ActionKind::Toggle).is_executed());
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(
            SkipReason::InvalidService("lightturn_on".to_string()).to_string(),
            "malformed service 'lightturn_on'"
        );
        assert_eq!(SkipReason::MissingUrl.to_string(), "no url_path");
    }
}
