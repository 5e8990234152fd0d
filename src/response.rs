use rmcp::model::{CallToolResult, Content};

/// Prefix for every failure raised while running the CLI.
pub const EXECUTION_ERROR_PREFIX: &str = "Error executing CodeX CLI";

/// Single-text-item tool result. Success and failure share this shape;
/// errors never travel on the MCP error channel, so a failed codex run
/// cannot cascade into sibling tool calls on the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResponse {
    pub text: String,
}

impl ToolResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// `Error: <message>` for failures detected before spawning.
    pub fn rejected(message: impl std::fmt::Display) -> Self {
        Self {
            text: format!("Error: {message}"),
        }
    }

    /// `Error executing CodeX CLI: <message>` for failures of the run itself.
    pub fn execution_failed(message: impl std::fmt::Display) -> Self {
        Self {
            text: format!("{EXECUTION_ERROR_PREFIX}: {message}"),
        }
    }

    pub fn into_call_tool_result(self) -> CallToolResult {
        CallToolResult::success(vec![Content::text(self.text)])
    }
}
