use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tracing::{info, warn};

use toolbox_common::generator::Generation;
use toolbox_common::mcp_api::{
    ClearHistoryParams, GenerateCodeParams, GeneratedTextResponse, GetHistoryParams,
    HistoryResponse, ImagePromptParams, ModelsResponse, OkResponse, WriteArticleParams,
    WriteEmailParams,
};
use toolbox_common::openai::OpenAiClient;

use crate::error::AppError;
use crate::prompts::{self, Length, Tone};
use crate::writer::{GeneratorTool, WriterService};

const DEFAULT_HISTORY_LIMIT: u32 = 10;
const MAX_HISTORY_LIMIT: u32 = 50;

#[derive(Clone)]
pub struct AiWriterServer {
    writer: WriterService<OpenAiClient>,
    tool_router: ToolRouter<AiWriterServer>,
}

impl AiWriterServer {
    pub fn new(writer: WriterService<OpenAiClient>) -> Self {
        Self {
            writer,
            tool_router: Self::tool_router(),
        }
    }

    async fn run(
        &self,
        tool: GeneratorTool,
        prompt: String,
        model: Option<String>,
    ) -> Result<Json<GeneratedTextResponse>, String> {
        let generation = self
            .writer
            .generate(tool, &prompt, model.as_deref())
            .await
            .map_err(|e| e.to_string())?;
        Ok(Json(to_response(generation)))
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::EmptyField(field).to_string());
    }
    Ok(value)
}

fn parse_tool(name: &str) -> Result<GeneratorTool, String> {
    GeneratorTool::parse(name).ok_or_else(|| format!("unknown generator tool: {}", name.trim()))
}

fn to_response(generation: Generation) -> GeneratedTextResponse {
    GeneratedTextResponse {
        text: generation.text,
        model: generation.model,
        failed_attempts: generation.failed_attempts,
    }
}

#[tool_router]
impl AiWriterServer {
    #[tool(description = "Write a Markdown article on a topic. Optional tone (professional, casual, friendly, persuasive, formal) and length (short, medium, long). Configured models are tried in order until one answers.")]
    async fn write_article(
        &self,
        Parameters(params): Parameters<WriteArticleParams>,
    ) -> Result<Json<GeneratedTextResponse>, String> {
        let topic = required("topic", &params.topic)?;
        let prompt = prompts::article_prompt(
            topic,
            Tone::parse(params.tone.as_deref()),
            Length::parse(params.length.as_deref()),
        );
        self.run(GeneratorTool::Article, prompt, params.model).await
    }

    #[tool(description = "Generate code in a given language from a specification. Returns only the code unless the specification asks for explanation.")]
    async fn generate_code(
        &self,
        Parameters(params): Parameters<GenerateCodeParams>,
    ) -> Result<Json<GeneratedTextResponse>, String> {
        let specification = required("specification", &params.specification)?;
        let language = required("language", &params.language)?;
        let prompt = prompts::code_prompt(specification, language);
        self.run(GeneratorTool::Code, prompt, params.model).await
    }

    #[tool(description = "Draft an email for a purpose, with optional recipient, tone and key points to cover.")]
    async fn write_email(
        &self,
        Parameters(params): Parameters<WriteEmailParams>,
    ) -> Result<Json<GeneratedTextResponse>, String> {
        let purpose = required("purpose", &params.purpose)?;
        let prompt = prompts::email_prompt(
            purpose,
            params.recipient.as_deref(),
            Tone::parse(params.tone.as_deref()),
            &params.key_points,
        );
        self.run(GeneratorTool::Email, prompt, params.model).await
    }

    #[tool(description = "Expand a short idea into a detailed text-to-image prompt, with optional art style and mood.")]
    async fn image_prompt(
        &self,
        Parameters(params): Parameters<ImagePromptParams>,
    ) -> Result<Json<GeneratedTextResponse>, String> {
        let subject = required("subject", &params.subject)?;
        let prompt =
            prompts::image_prompt(subject, params.style.as_deref(), params.mood.as_deref());
        self.run(GeneratorTool::ImagePrompt, prompt, params.model).await
    }

    #[tool(description = "List the configured model fallback order and the models the OpenAI-compatible host reports (GET /v1/models).")]
    async fn list_models(&self) -> Result<Json<ModelsResponse>, String> {
        let configured = self.writer.chain().models().to_vec();
        let (available, host_error) = match self.writer.generator().list_models().await {
            Ok(list) => (list.data.into_iter().map(|m| m.id).collect(), None),
            Err(e) => {
                warn!(error = %e, "list_models: host unreachable");
                (Vec::new(), Some(e.to_string()))
            }
        };
        Ok(Json(ModelsResponse {
            configured,
            available,
            host_error,
        }))
    }

    #[tool(description = "Recent generations, newest first. Filter by generator tool name (write_article, generate_code, write_email, image_prompt); limit defaults to 10, max 50. Empty when Redis is not available.")]
    async fn get_history(
        &self,
        Parameters(params): Parameters<GetHistoryParams>,
    ) -> Result<Json<HistoryResponse>, String> {
        let tool = params.tool.as_deref().map(parse_tool).transpose()?;
        let limit = params
            .limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT) as usize;

        let entries = self.writer.recent(tool, limit).await;
        info!(tool = tool.map(|t| t.name()), count = entries.len(), "get_history");
        Ok(Json(HistoryResponse {
            entries,
            redis_available: self.writer.history().is_available().await,
        }))
    }

    #[tool(description = "Delete the stored history of one generator tool.")]
    async fn clear_history(
        &self,
        Parameters(params): Parameters<ClearHistoryParams>,
    ) -> Result<Json<OkResponse>, String> {
        let tool = parse_tool(&params.tool)?;
        let ok = self.writer.history().clear(tool.name()).await;
        info!(tool = tool.name(), ok, "clear_history");
        Ok(Json(OkResponse { ok }))
    }
}

#[tool_handler]
impl ServerHandler for AiWriterServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "ai-writer".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "AI writing MCP server backed by an OpenAI-compatible host. Use write_article, \
                 generate_code, write_email or image_prompt; each tries the configured models \
                 in order. Pass model to try a specific model first. Use get_history and \
                 clear_history to manage past generations."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rmcp::{handler::server::wrapper::Parameters, Json};

    use super::AiWriterServer;
    use crate::writer::WriterService;
    use toolbox_common::generator::ModelChain;
    use toolbox_common::history::GenerationHistory;
    use toolbox_common::mcp_api::{
        ClearHistoryParams, GenerateCodeParams, GetHistoryParams, WriteArticleParams,
    };
    use toolbox_common::openai::{OpenAiClient, OpenAiClientConfig};
    use toolbox_common::redis::RedisCache;

    fn server() -> AiWriterServer {
        let client = OpenAiClient::new(OpenAiClientConfig {
            base_url: "http://127.0.0.1:9/v1".to_string(),
            api_key: None,
            default_timeout: Duration::from_millis(200),
            temperature: None,
            max_retries: 0,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(1),
            max_error_body_bytes: 1024,
        })
        .expect("client builds");
        AiWriterServer::new(WriterService::new(
            Arc::new(client),
            ModelChain::parse("model-a,model-b").expect("valid chain"),
            GenerationHistory::new(RedisCache::disabled(), 10, 60),
            None,
        ))
    }

    #[test]
    fn tools_publish_output_schemas() {
        let tools = AiWriterServer::tool_router().list_all();
        for name in [
            "write_article",
            "generate_code",
            "write_email",
            "image_prompt",
            "list_models",
            "get_history",
            "clear_history",
        ] {
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
    async fn blank_inputs_are_rejected_before_generation() {
        let server = server();
        let Err(err) = server
            .write_article(Parameters(WriteArticleParams {
                topic: "   ".to_string(),
                tone: None,
                length: None,
                model: None,
            }))
            .await
        else {
            panic!("blank topic should fail");
        };
        assert_eq!(err, "topic must not be empty");

        let Err(err) = server
            .generate_code(Parameters(GenerateCodeParams {
                specification: "sort a list".to_string(),
                language: String::new(),
                model: None,
            }))
            .await
        else {
            panic!("blank language should fail");
        };
        assert_eq!(err, "language must not be empty");
    }

    #[tokio::test]
    async fn unreachable_host_exhausts_every_model() {
        let Err(err) = server()
            .write_article(Parameters(WriteArticleParams {
                topic: "tide pools".to_string(),
                tone: Some("casual".to_string()),
                length: None,
                model: None,
            }))
            .await
        else {
            panic!("no host is listening");
        };
        assert!(err.starts_with("generation failed: all 2 configured models"));
    }

    #[tokio::test]
    async fn list_models_reports_configured_chain_when_host_is_down() {
        let Json(models) = server().list_models().await.expect("list_models never fails");
        assert_eq!(models.configured, ["model-a", "model-b"]);
        assert!(models.available.is_empty());
        assert!(models.host_error.is_some());
    }

    #[tokio::test]
    async fn history_tools_validate_tool_names() {
        let server = server();
        let Json(history) = server
            .get_history(Parameters(GetHistoryParams {
                tool: None,
                limit: Some(500),
            }))
            .await
            .expect("history without redis is empty");
        assert!(history.entries.is_empty());
        assert!(!history.redis_available);

        let Err(err) = server
            .clear_history(Parameters(ClearHistoryParams {
                tool: "summarize".to_string(),
            }))
            .await
        else {
            panic!("unknown tool should fail");
        };
        assert_eq!(err, "unknown generator tool: summarize");
    }
}
