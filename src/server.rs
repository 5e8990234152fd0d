use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::tool::ToolCallContext;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Implementation, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, tool, tool_router};

use crate::config::Config;
use crate::handler::CodexHandler;
use crate::response::ToolResponse;
use crate::tools::analyze_file::AnalyzeFileRequest;
use crate::tools::chat::ChatRequest;

#[derive(Clone)]
pub struct CodexServer {
    handler: Arc<CodexHandler>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl CodexServer {
    pub fn new(config: Config) -> Self {
        tracing::info!(
            executable = %config.executable,
            timeout_secs = config.timeout.as_secs(),
            sandbox_default = config.defaults.sandbox,
            "codex-mcp configured"
        );
        Self {
            handler: Arc::new(CodexHandler::new(config)),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "chat",
        description = "Engage in a chat conversation with CodeX CLI"
    )]
    async fn chat(
        &self,
        Parameters(req): Parameters<ChatRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.handler.chat(req).await.into_call_tool_result())
    }

    #[tool(name = "analyzeFile", description = "Analyze a file using CodeX CLI")]
    async fn analyze_file(
        &self,
        Parameters(req): Parameters<AnalyzeFileRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.handler.analyze_file(req).await.into_call_tool_result())
    }
}

// Written out instead of `#[tool_handler]` so an unknown tool name gets a
// text result like every other failure rather than a JSON-RPC error.
impl ServerHandler for CodexServer {
    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        if !self.tool_router.has_route(&request.name) {
            tracing::warn!(tool = %request.name, "unknown tool requested");
            return Ok(
                ToolResponse::rejected(format!("Unknown tool: {}", request.name))
                    .into_call_tool_result(),
            );
        }
        let tcc = ToolCallContext::new(self, request, context);
        self.tool_router.call(tcc).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tool_router.list_all()))
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        self.tool_router.get(name).cloned()
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "codex-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Relays requests to the CodeX CLI (`codex exec`).\n\
                 - `chat`: send a prompt and get codex's answer.\n\
                 - `analyzeFile`: ask codex to analyze one file, optionally with a prompt.\n\
                 Both accept `model`, `sandbox` (default on), `yolo` (auto-accept, default off), \
                 `reasoningEffort` and `reasoningSummary`. Failures come back as text starting with `Error`."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
