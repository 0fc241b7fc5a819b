//! Request and response types for the MCP tools exposed by the toolbox servers.
//!
//! Servers keep their own domain models and convert into these flat types at the tool
//! boundary, so the published JSON schemas stay stable when internals change.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::generator::FailedAttempt;
use crate::history::HistoryEntry;

// --- catalog ---

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchToolsParams {
    /// Free text matched case-insensitively against tool name, description and tags.
    pub query: Option<String>,
    /// Category slug, or "all".
    pub category: Option<String>,
    /// "beginner", "intermediate", "advanced", or "all".
    pub difficulty: Option<String>,
    /// "free", "premium", or "all".
    pub premium: Option<String>,
    /// "name" (default), "category", "featured" or "newest".
    pub sort: Option<String>,
    /// Maximum number of tools to return (default: all, max: 200).
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetToolParams {
    /// Tool slug such as "json-formatter".
    pub slug: String,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListCategoriesParams {
    /// Free text; a category matches on its own name/description or any matching tool.
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolSummary {
    pub slug: String,
    pub name: String,
    pub short_description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub is_featured: bool,
    pub is_premium: bool,
    pub difficulty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchToolsResponse {
    /// Number of tools matching before `limit` was applied.
    pub total: usize,
    pub tools: Vec<ToolSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryInfo {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub glyph: String,
    pub tool_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolDetailResponse {
    pub tool: ToolSummary,
    pub category: CategoryInfo,
    pub related: Vec<ToolSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FeaturedToolsResponse {
    pub tools: Vec<ToolSummary>,
}

// --- diff ---

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DiffTextsParams {
    pub original: String,
    pub modified: String,
    /// Ignore trailing whitespace when comparing lines.
    pub ignore_whitespace: Option<bool>,
    /// Compare lines case-insensitively.
    pub ignore_case: Option<bool>,
    /// Include unchanged lines in `lines` (default: true).
    pub include_unchanged: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiffLineInfo {
    /// "added", "removed" or "unchanged".
    pub kind: String,
    pub line_number: usize,
    pub content: String,
    pub original_line_number: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiffStatsInfo {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiffTextsResponse {
    pub lines: Vec<DiffLineInfo>,
    pub stats: DiffStatsInfo,
    pub summary: String,
    /// Every line prefixed with "+", "-" or " ".
    pub unified: String,
}

// --- generators ---

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WriteArticleParams {
    pub topic: String,
    /// "professional" (default), "casual", "friendly", "persuasive" or "formal".
    pub tone: Option<String>,
    /// "short", "medium" (default) or "long".
    pub length: Option<String>,
    /// Model to try first; the configured models follow as fallbacks.
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GenerateCodeParams {
    pub specification: String,
    /// Target language, e.g. "Rust".
    pub language: String,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WriteEmailParams {
    pub purpose: String,
    pub recipient: Option<String>,
    pub tone: Option<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ImagePromptParams {
    /// Idea to turn into a text-to-image prompt.
    pub subject: String,
    pub style: Option<String>,
    pub mood: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ModelsResponse {
    /// Fallback order used for every generation.
    pub configured: Vec<String>,
    /// Model IDs reported by the host; empty when the host could not be reached.
    pub available: Vec<String>,
    pub host_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GeneratedTextResponse {
    pub text: String,
    /// Model that produced `text`.
    pub model: String,
    /// Models tried before `model`, with the reason each failed.
    pub failed_attempts: Vec<FailedAttempt>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetHistoryParams {
    /// Generator tool name, e.g. "write_email". Omit to list every tool's history.
    pub tool: Option<String>,
    /// Maximum number of entries (default: 10, max: 50).
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ClearHistoryParams {
    pub tool: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryEntry>,
    pub redis_available: bool,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct OkResponse {
    pub ok: bool,
}
