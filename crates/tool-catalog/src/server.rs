/// MCP server over the tool catalog.
///
/// Exposes four tools:
/// - `search_tools`: text search + category/difficulty/premium filters + sort
/// - `get_tool`: one tool by slug, with its category and related tools
/// - `list_categories`: category browsing, optionally narrowed by a query
/// - `list_featured`: curated featured tools
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tracing::info;

use crate::catalog::Catalog;
use crate::model::{CategoryRecord, ToolRecord};
use crate::query::{filter_categories, query_tools, ToolQuery};
use toolbox_common::mcp_api::{
    CategoryInfo, CategoryListResponse, FeaturedToolsResponse, GetToolParams,
    ListCategoriesParams, SearchToolsParams, SearchToolsResponse, ToolDetailResponse,
    ToolSummary,
};

const MAX_LIMIT: u32 = 200;
const RELATED_LIMIT: usize = 4;

#[derive(Clone)]
pub struct ToolCatalogServer {
    catalog: Arc<Catalog>,
    tool_router: ToolRouter<ToolCatalogServer>,
}

impl ToolCatalogServer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            tool_router: Self::tool_router(),
        }
    }

    fn category_info(&self, category: &CategoryRecord) -> CategoryInfo {
        CategoryInfo {
            slug: category.slug.clone(),
            name: category.name.clone(),
            description: category.description.clone(),
            icon: category.icon.as_str().to_string(),
            glyph: category.icon.glyph().to_string(),
            tool_count: self.catalog.category_tool_count(&category.slug),
        }
    }
}

#[tool_router]
impl ToolCatalogServer {
    #[tool(description = "Search the tool catalog. Free text matches tool name, description and tags (case-insensitive substring). Optional filters: category slug, difficulty (beginner/intermediate/advanced), premium (free/premium); 'all' disables a filter. Sort by name, category, featured or newest.")]
    async fn search_tools(
        &self,
        Parameters(params): Parameters<SearchToolsParams>,
    ) -> Result<Json<SearchToolsResponse>, String> {
        let query = ToolQuery::from_raw(
            &self.catalog,
            params.query.as_deref(),
            params.category.as_deref(),
            params.difficulty.as_deref(),
            params.premium.as_deref(),
            params.sort.as_deref(),
        );

        let results = query_tools(self.catalog.tools(), &query);
        let total = results.len();
        let limit = params.limit.map(|l| l.min(MAX_LIMIT) as usize).unwrap_or(total);
        info!(query = %query.text, total, limit, "search_tools");

        Ok(Json(SearchToolsResponse {
            total,
            tools: results.into_iter().take(limit).map(to_tool_summary).collect(),
        }))
    }

    #[tool(description = "Get a tool by slug (e.g. 'json-formatter'), including its category and related tools.")]
    async fn get_tool(
        &self,
        Parameters(params): Parameters<GetToolParams>,
    ) -> Result<Json<ToolDetailResponse>, String> {
        let slug = params.slug.trim().to_string();
        if slug.is_empty() {
            return Err("slug must not be empty".to_string());
        }

        let tool = self
            .catalog
            .tool(&slug)
            .ok_or_else(|| format!("tool not found: {slug}"))?;
        let category = self
            .catalog
            .category(&tool.category)
            .ok_or_else(|| format!("tool '{}' has no category", tool.slug))?;

        Ok(Json(ToolDetailResponse {
            tool: to_tool_summary(tool),
            category: self.category_info(category),
            related: self
                .catalog
                .related_tools(&tool.slug, RELATED_LIMIT)
                .into_iter()
                .map(to_tool_summary)
                .collect(),
        }))
    }

    #[tool(description = "List tool categories with tool counts. With a query, only categories whose name/description match or that contain a matching tool are returned.")]
    async fn list_categories(
        &self,
        Parameters(params): Parameters<ListCategoriesParams>,
    ) -> Result<Json<CategoryListResponse>, String> {
        let query = params.query.unwrap_or_default();
        let categories = filter_categories(self.catalog.categories(), self.catalog.tools(), &query)
            .into_iter()
            .map(|c| self.category_info(c))
            .collect();
        Ok(Json(CategoryListResponse { categories }))
    }

    #[tool(description = "List featured tools, sorted by name.")]
    async fn list_featured(&self) -> Result<Json<FeaturedToolsResponse>, String> {
        let tools = self
            .catalog
            .featured_tools()
            .into_iter()
            .map(to_tool_summary)
            .collect();
        Ok(Json(FeaturedToolsResponse { tools }))
    }
}

fn to_tool_summary(tool: &ToolRecord) -> ToolSummary {
    ToolSummary {
        slug: tool.slug.clone(),
        name: tool.name.clone(),
        short_description: tool.short_description.clone(),
        category: tool.category.clone(),
        tags: tool.tags.clone(),
        is_featured: tool.is_featured,
        is_premium: tool.is_premium,
        difficulty: tool.difficulty.as_str().to_string(),
    }
}

#[tool_handler]
impl ServerHandler for ToolCatalogServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "tool-catalog".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tool catalog MCP server. Use search_tools to find tools by text and filters, \
                 get_tool for one tool by slug, list_categories to browse categories, and \
                 list_featured for the curated featured set."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rmcp::{handler::server::wrapper::Parameters, Json};

    use super::ToolCatalogServer;
    use crate::catalog::Catalog;
    use toolbox_common::mcp_api::{GetToolParams, ListCategoriesParams, SearchToolsParams};

    fn server() -> ToolCatalogServer {
        ToolCatalogServer::new(Arc::new(Catalog::builtin().expect("bundled catalog loads")))
    }

    #[test]
    fn tools_publish_output_schemas() {
        let tools = ToolCatalogServer::tool_router().list_all();
        for name in ["search_tools", "get_tool", "list_categories", "list_featured"] {
            let tool = tools
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing tool: {name}"));
            assert!(
                tool.output_schema.is_some(),
                "tool {name} should publish output_schema"
            );
        }
    }

    #[tokio::test]
    async fn search_applies_filters_and_limit() {
        let server = server();
        let Json(all_dev) = server
            .search_tools(Parameters(SearchToolsParams {
                category: Some("developer".to_string()),
                ..SearchToolsParams::default()
            }))
            .await
            .expect("search succeeds");
        assert!(all_dev.total > 1);
        assert!(all_dev.tools.iter().all(|t| t.category == "developer"));

        let Json(limited) = server
            .search_tools(Parameters(SearchToolsParams {
                category: Some("developer".to_string()),
                limit: Some(1),
                ..SearchToolsParams::default()
            }))
            .await
            .expect("search succeeds");
        assert_eq!(limited.total, all_dev.total);
        assert_eq!(limited.tools.len(), 1);
    }

    #[tokio::test]
    async fn get_tool_includes_category_and_related() {
        let Json(detail) = server()
            .get_tool(Parameters(GetToolParams {
                slug: "JSON-FORMATTER".to_string(),
            }))
            .await
            .expect("tool exists");
        assert_eq!(detail.tool.slug, "json-formatter");
        assert_eq!(detail.category.slug, "developer");
        assert!(detail.category.tool_count >= 1);
        assert!(!detail.related.is_empty());
        assert!(detail.related.iter().all(|t| t.slug != "json-formatter"));
    }

    #[tokio::test]
    async fn get_tool_rejects_unknown_slug() {
        let Err(err) = server()
            .get_tool(Parameters(GetToolParams {
                slug: "no-such-tool".to_string(),
            }))
            .await
        else {
            panic!("unknown slug should fail");
        };
        assert!(err.contains("no-such-tool"));
    }

    #[tokio::test]
    async fn list_categories_narrows_by_tool_match() {
        let Json(response) = server()
            .list_categories(Parameters(ListCategoriesParams {
                query: Some("base64".to_string()),
            }))
            .await
            .expect("list succeeds");
        let slugs: Vec<&str> = response.categories.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, ["developer"]);
    }
}
