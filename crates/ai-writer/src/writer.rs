use std::sync::Arc;

use tracing::info;

use toolbox_common::generator::{generate_with_fallback, Generation, ModelChain, TextGenerator};
use toolbox_common::history::{GenerationHistory, HistoryEntry};

use crate::error::AppError;
use crate::rate_limit::RateLimiter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorTool {
    Article,
    Code,
    Email,
    ImagePrompt,
}

impl GeneratorTool {
    pub const ALL: [GeneratorTool; 4] = [Self::Article, Self::Code, Self::Email, Self::ImagePrompt];

    pub fn name(self) -> &'static str {
        match self {
            Self::Article => "write_article",
            Self::Code => "generate_code",
            Self::Email => "write_email",
            Self::ImagePrompt => "image_prompt",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// Runs prompts through the model chain and keeps per-tool history.
pub struct WriterService<G> {
    generator: Arc<G>,
    chain: ModelChain,
    history: GenerationHistory,
    limiter: Option<RateLimiter>,
}

impl<G> Clone for WriterService<G> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
            chain: self.chain.clone(),
            history: self.history.clone(),
            limiter: self.limiter.clone(),
        }
    }
}

impl<G: TextGenerator> WriterService<G> {
    pub fn new(
        generator: Arc<G>,
        chain: ModelChain,
        history: GenerationHistory,
        limiter: Option<RateLimiter>,
    ) -> Self {
        Self {
            generator,
            chain,
            history,
            limiter,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn chain(&self) -> &ModelChain {
        &self.chain
    }

    pub fn history(&self) -> &GenerationHistory {
        &self.history
    }

    /// `preferred_model` is tried before the configured chain.
    pub async fn generate(
        &self,
        tool: GeneratorTool,
        prompt: &str,
        preferred_model: Option<&str>,
    ) -> Result<Generation, AppError> {
        if let Some(limiter) = &self.limiter {
            limiter.check().await?;
        }

        let chain = match preferred_model {
            Some(model) => self.chain.preferring(model),
            None => self.chain.clone(),
        };
        let generation = generate_with_fallback(self.generator.as_ref(), &chain, prompt).await?;
        info!(
            tool = tool.name(),
            model = %generation.model,
            failed = generation.failed_attempts.len(),
            "generated"
        );

        self.history
            .record(HistoryEntry::new(
                tool.name(),
                &generation.model,
                prompt,
                &generation.text,
            ))
            .await;
        Ok(generation)
    }

    /// Newest first. Without a tool, entries of every generator tool are merged.
    pub async fn recent(&self, tool: Option<GeneratorTool>, limit: usize) -> Vec<HistoryEntry> {
        let Some(tool) = tool else {
            let mut merged = Vec::new();
            for tool in GeneratorTool::ALL {
                merged.extend(self.history.list(tool.name(), limit).await);
            }
            return newest_first(merged, limit);
        };
        self.history.list(tool.name(), limit).await
    }
}

fn newest_first(mut entries: Vec<HistoryEntry>, limit: usize) -> Vec<HistoryEntry> {
    entries.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    use toolbox_common::generator::{ModelChain, TextGenerator};
    use toolbox_common::history::{GenerationHistory, HistoryEntry};
    use toolbox_common::redis::RedisCache;

    use super::{newest_first, GeneratorTool, WriterService};
    use crate::error::AppError;
    use crate::rate_limit::RateLimiter;

    /// Fails for every model except `good`, recording which models were asked.
    struct OnlyModel {
        good: &'static str,
        asked: Mutex<Vec<String>>,
    }

    impl TextGenerator for OnlyModel {
        type Error = String;

        fn attempt<'a>(
            &'a self,
            model: &'a str,
            prompt: &'a str,
        ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a {
            self.asked.lock().expect("asked lock").push(model.to_string());
            let outcome = if model == self.good {
                Ok(format!("{model}: {prompt}"))
            } else {
                Err(format!("{model} is offline"))
            };
            async move { outcome }
        }
    }

    fn service(good: &'static str, limiter: Option<RateLimiter>) -> WriterService<OnlyModel> {
        WriterService::new(
            Arc::new(OnlyModel {
                good,
                asked: Mutex::new(Vec::new()),
            }),
            ModelChain::parse("a,b,c").expect("valid chain"),
            GenerationHistory::new(RedisCache::disabled(), 10, 60),
            limiter,
        )
    }

    #[test]
    fn tool_names_round_trip() {
        for tool in GeneratorTool::ALL {
            assert_eq!(GeneratorTool::parse(tool.name()), Some(tool));
        }
        assert_eq!(GeneratorTool::parse("summarize"), None);
    }

    #[test]
    fn merged_history_orders_by_millisecond_timestamp() {
        let at = |tool: &str, ms: u64| {
            let mut entry = HistoryEntry::new(tool, "model-a", "prompt", tool);
            entry.created_at_ms = ms;
            entry
        };
        // Same second, listed in tool order as they come back from the per-tool lists.
        let merged = newest_first(
            vec![
                at("write_article", 1_700_000_000_100),
                at("generate_code", 1_700_000_000_900),
                at("write_email", 1_700_000_000_500),
            ],
            2,
        );
        let tools: Vec<&str> = merged.iter().map(|e| e.tool.as_str()).collect();
        assert_eq!(tools, ["generate_code", "write_email"]);
    }

    #[tokio::test]
    async fn falls_back_to_working_model() {
        let writer = service("b", None);
        let generation = writer
            .generate(GeneratorTool::Email, "hi", None)
            .await
            .expect("b answers");
        assert_eq!(generation.model, "b");
        assert_eq!(generation.text, "b: hi");
        assert_eq!(generation.failed_attempts.len(), 1);
    }

    #[tokio::test]
    async fn preferred_model_is_tried_first() {
        let writer = service("c", None);
        writer
            .generate(GeneratorTool::Code, "fn main", Some("c"))
            .await
            .expect("c answers");
        let asked = writer.generator().asked.lock().expect("asked lock").clone();
        assert_eq!(asked, ["c"]);
    }

    #[tokio::test]
    async fn exhaustion_is_a_generic_error() {
        let writer = service("z", None);
        let err = writer
            .generate(GeneratorTool::Article, "topic", None)
            .await
            .expect_err("no model answers");
        assert!(matches!(err, AppError::Generation(_)));
        assert!(!err.to_string().contains("offline"));
    }

    #[tokio::test]
    async fn rate_limit_gates_generation() {
        let writer = service("a", RateLimiter::new(1));
        assert!(writer.generate(GeneratorTool::ImagePrompt, "cat", None).await.is_ok());
        let err = writer
            .generate(GeneratorTool::ImagePrompt, "cat", None)
            .await
            .expect_err("second call is limited");
        assert!(matches!(err, AppError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn history_is_empty_without_redis() {
        let writer = service("a", None);
        writer
            .generate(GeneratorTool::Email, "hi", None)
            .await
            .expect("a answers");
        assert!(writer.recent(None, 10).await.is_empty());
        assert!(writer.recent(Some(GeneratorTool::Email), 10).await.is_empty());
    }
}
