pub mod analyze_file;
pub mod chat;
pub mod enums;

use schemars::Schema;
use serde::{Deserialize, Deserializer};

use crate::args::InvocationOptions;
use crate::config::InvocationDefaults;
use crate::tools::enums::{ReasoningEffort, ReasoningSummary};

/// Accept any JSON for a required text field and keep it only when it is a
/// string. Absent or mistyped values reach the handler as `None`, which it
/// answers with a text result instead of a protocol error.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

/// `#[serde(default)]` drops a field from `required`; put it back for clients.
fn mark_required(schema: &mut Schema, field: &str) {
    schema.insert("required".to_string(), serde_json::json!([field]));
}

/// Fill every unset request field from `defaults`.
fn resolve_options(
    model: Option<String>,
    sandbox: Option<bool>,
    yolo: Option<bool>,
    reasoning_effort: Option<ReasoningEffort>,
    reasoning_summary: Option<ReasoningSummary>,
    defaults: &InvocationDefaults,
) -> InvocationOptions {
    InvocationOptions {
        model: model.filter(|m| !m.trim().is_empty()),
        sandbox: sandbox.unwrap_or(defaults.sandbox),
        yolo: yolo.unwrap_or(defaults.yolo),
        reasoning_effort: reasoning_effort.unwrap_or(defaults.reasoning_effort),
        reasoning_summary: reasoning_summary.unwrap_or(defaults.reasoning_summary),
    }
}
