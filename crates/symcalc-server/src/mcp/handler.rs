// crates/symcalc-server/src/mcp/handler.rs
// MCP ServerHandler implementation - protocol lifecycle methods

use super::SymcalcServer;

use rmcp::{
    ErrorData, ServerHandler,
    handler::server::tool::ToolCallContext,
    model::{
        CallToolRequestParams, CallToolResult, ListToolsResult, PaginatedRequestParams,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
};
use tracing::{debug, info, warn};

impl ServerHandler for SymcalcServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: rmcp::model::Implementation {
                name: "symcalc".into(),
                title: Some("symcalc - symbolic math tools".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "symcalc evaluates, differentiates, integrates and solves math expressions, and \
                 computes moments of simple distributions. Write powers as x^2 or x**2."
                    .into(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        }))
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move {
            let tool_name = request.name.to_string();
            let call_id = uuid::Uuid::new_v4().to_string();
            let start = std::time::Instant::now();
            debug!(tool = %tool_name, call_id = %call_id, "Tool call started");

            let ctx = ToolCallContext::new(self, request, context);
            let result = self.tool_router.call(ctx).await;

            let duration_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(r) => {
                    let success = !r.is_error.unwrap_or(false);
                    info!(
                        tool = %tool_name,
                        call_id = %call_id,
                        duration_ms,
                        success,
                        "Tool call finished"
                    );
                }
                Err(e) => warn!(
                    tool = %tool_name,
                    call_id = %call_id,
                    duration_ms,
                    error = %e.message,
                    "Tool call rejected"
                ),
            }

            result
        }
    }
}
