//! Domain toggle policy.
//!
//! Maps an entity's domain and current state to the service call that
//! flips it. The override table is exact and case-sensitive.

use cardlink_core::{EntityId, ServiceCall};
use serde_json::{Map, Value};

/// States from which a toggle turns the entity "on" (opens, locks, ...).
const TURN_ON_STATES: [&str; 3] = ["closed", "locked", "off"];

/// Compute `(service_domain, service)` for toggling `entity_id`.
///
/// A missing state counts as not being in the turn-on set.
pub fn resolve_toggle(current_state: Option<&str>, entity_id: &str) -> (String, &'static str) {
    let turn_on = current_state.is_some_and(|s| TURN_ON_STATES.contains(&s));
    let domain = EntityId::new(entity_id).domain().to_string();

    let default_service = if turn_on { "turn_on" } else { "turn_off" };

    match domain.as_str() {
        "lock" => (domain, if turn_on { "lock" } else { "unlock" }),
        "cover" => (domain, if turn_on { "open_cover" } else { "close_cover" }),
        "button" | "input_button" => (domain, "press"),
        "group" => ("homeassistant".to_string(), default_service),
        "scene" => (domain, "turn_on"),
        "valve" => (domain, if turn_on { "open_valve" } else { "close_valve" }),
        _ => (domain, default_service),
    }
}

/// The full toggle call, addressed with `entity_id` in the service data.
pub fn toggle_call(current_state: Option<&str>, entity_id: &str) -> ServiceCall {
    let (domain, service) = resolve_toggle(current_state, entity_id);
    let mut data = Map::new();
    data.insert(
        "entity_id".to_string(),
        Value::String(entity_id.to_string()),
    );
    ServiceCall::new(domain, service).with_data(data)
}
