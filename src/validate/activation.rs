use serde_json::Value;

/// Channel used when a record carries no (or an empty) `topic`.
pub const DEFAULT_TOPIC: &str = "_none";

/// The activation signals carried by an input record.
///
/// `activate` is tri-state: `Some(true)` starts (or restarts) the channel's
/// fade, `Some(false)` stops it, `None` means the record passes through with
/// no lifecycle change. `enabled` is likewise tri-state; `None` leaves the
/// channel's persisted flag alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activation {
    /// Channel identifier.
    pub topic: String,
    /// Requested lifecycle change, if any.
    pub activate: Option<bool>,
    /// Requested enabled-flag update, if any.
    pub enabled: Option<bool>,
}

/// Parse the topic, service verb and enabled flag from an input record.
///
/// `service` values `"turn_on"`, `"on"` and boolean `true` activate; any
/// other non-empty, non-null value deactivates; absent or empty means no
/// change.
pub fn parse_activation(record: &Value) -> Activation {
    let topic = match record.get("topic").and_then(Value::as_str) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => DEFAULT_TOPIC.to_string(),
    };

    let service = record.get("payload").and_then(|p| p.get("service"));
    let activate = match service {
        Some(Value::String(s)) if s == "turn_on" || s == "on" => Some(true),
        Some(Value::Bool(true)) => Some(true),
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(_) => Some(false),
    };

    let enabled = record.get("fade_enabled").map(truthy);

    Activation { topic, activate, enabled }
}

/// Loose boolean coercion for the persisted enabled flag: `false`, `0`,
/// `""`, `"false"` and `null` are off, everything else is on.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "false",
        Value::Array(_) | Value::Object(_) => true,
    }
}
