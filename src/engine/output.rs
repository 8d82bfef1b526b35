use serde_json::{Map, Value, json};

use crate::levels::attrs::Levels;

/// The product of one emitting tick.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EvalOutput {
    /// Interpolated attribute set (attributes present in both anchors only).
    pub data: Levels,
    /// Step interval in seconds; set on recurring ticks only.
    pub transition_secs: Option<f64>,
}

impl EvalOutput {
    /// Augment the original input record for the transport collaborator.
    ///
    /// The interpolated attributes land under `payload.data` (plus
    /// `transition` when set), and the engine-active marker `fade_active`
    /// is set at the top level. Non-object pieces of the original record
    /// are replaced rather than merged into.
    pub fn augment(&self, record: &Value) -> Value {
        let mut out = match record {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };

        let payload = out.entry("payload").or_insert_with(|| json!({}));
        if !payload.is_object() {
            *payload = json!({});
        }
        if let Some(payload) = payload.as_object_mut() {
            let data = payload.entry("data").or_insert_with(|| json!({}));
            if !data.is_object() {
                *data = json!({});
            }
            if let Some(data) = data.as_object_mut() {
                if let Ok(Value::Object(fields)) = serde_json::to_value(&self.data) {
                    for (key, value) in fields {
                        data.insert(key, value);
                    }
                }
                if let Some(secs) = self.transition_secs {
                    data.insert("transition".to_string(), json!(secs));
                }
            }
        }

        out.insert("fade_active".to_string(), json!(true));
        Value::Object(out)
    }
}
