use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tracing::info;

use crate::config::Config;
use crate::diff::{diff_lines, DiffKind, DiffLine, DiffOptions, DiffStats};
use crate::error::AppError;
use crate::render::{summary, to_unified_text};
use toolbox_common::mcp_api::{DiffLineInfo, DiffStatsInfo, DiffTextsParams, DiffTextsResponse};

#[derive(Clone)]
pub struct CodeDiffServer {
    max_input_bytes: usize,
    tool_router: ToolRouter<CodeDiffServer>,
}

impl CodeDiffServer {
    pub fn new(config: &Config) -> Self {
        Self {
            max_input_bytes: config.max_input_bytes,
            tool_router: Self::tool_router(),
        }
    }

    fn check_size(&self, side: &'static str, text: &str) -> Result<(), AppError> {
        if text.len() > self.max_input_bytes {
            return Err(AppError::InputTooLarge {
                side,
                size: text.len(),
                limit: self.max_input_bytes,
            });
        }
        Ok(())
    }
}

#[tool_router]
impl CodeDiffServer {
    #[tool(description = "Compare two texts line by line. Returns each line classified as added, removed or unchanged, counts per kind, a one-line summary, and a unified-style text where lines are prefixed with '+', '-' or ' '.")]
    async fn diff_texts(
        &self,
        Parameters(params): Parameters<DiffTextsParams>,
    ) -> Result<Json<DiffTextsResponse>, String> {
        self.check_size("original", &params.original)
            .and_then(|()| self.check_size("modified", &params.modified))
            .map_err(|e| e.to_string())?;

        let options = DiffOptions {
            ignore_whitespace: params.ignore_whitespace.unwrap_or(false),
            ignore_case: params.ignore_case.unwrap_or(false),
        };
        let result = diff_lines(&params.original, &params.modified, options);
        info!(
            added = result.stats.added,
            removed = result.stats.removed,
            unchanged = result.stats.unchanged,
            "diff_texts"
        );

        let unified = to_unified_text(&result.lines);
        let include_unchanged = params.include_unchanged.unwrap_or(true);
        let lines = result
            .lines
            .iter()
            .filter(|l| include_unchanged || l.kind != DiffKind::Unchanged)
            .map(to_line_info)
            .collect();

        Ok(Json(DiffTextsResponse {
            lines,
            summary: summary(&result.stats),
            stats: to_stats_info(&result.stats),
            unified,
        }))
    }
}

fn to_line_info(line: &DiffLine) -> DiffLineInfo {
    DiffLineInfo {
        kind: line.kind.as_str().to_string(),
        line_number: line.line_number,
        content: line.content.clone(),
        original_line_number: line.original_line_number,
    }
}

fn to_stats_info(stats: &DiffStats) -> DiffStatsInfo {
    DiffStatsInfo {
        added: stats.added,
        removed: stats.removed,
        unchanged: stats.unchanged,
        total: stats.total,
    }
}

#[tool_handler]
impl ServerHandler for CodeDiffServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "code-diff".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Line diff MCP server. Call diff_texts with the original and modified text; \
                 set ignore_whitespace / ignore_case to relax comparison and \
                 include_unchanged=false to return only changed lines."
                    .to_string(),
            ),
        }
    }
}
