use schemars::{JsonSchema, Schema};
use serde::Deserialize;

use crate::args::InvocationOptions;
use crate::config::InvocationDefaults;
use crate::tools::enums::{ReasoningEffort, ReasoningSummary};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(transform = require_prompt)]
pub struct ChatRequest {
    /// The prompt to send to CodeX CLI
    #[serde(default, deserialize_with = "super::lenient_string")]
    #[schemars(with = "String")]
    pub prompt: Option<String>,
    /// The model to use (optional; codex picks its own default when omitted)
    pub model: Option<String>,
    /// Run with `--sandbox workspace-write` (optional, default: true)
    pub sandbox: Option<bool>,
    /// Automatically accept all actions with `--full-auto` (optional, default: false)
    pub yolo: Option<bool>,
    /// Reasoning effort: "none", "low", "medium" (default), "high"
    pub reasoning_effort: Option<ReasoningEffort>,
    /// Reasoning summary: "none" (default) or "auto"
    pub reasoning_summary: Option<ReasoningSummary>,
}

impl ChatRequest {
    pub fn options(&self, defaults: &InvocationDefaults) -> InvocationOptions {
        super::resolve_options(
            self.model.clone(),
            self.sandbox,
            self.yolo,
            self.reasoning_effort,
            self.reasoning_summary,
            defaults,
        )
    }
}

fn require_prompt(schema: &mut Schema) {
    super::mark_required(schema, "prompt");
}
