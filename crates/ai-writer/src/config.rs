use toolbox_common::generator::ModelChain;
use toolbox_common::openai::OpenAiClientConfig;

use crate::error::AppError;

const DEFAULT_MODELS: &str = "gpt-4o-mini,llama-3.1-8b-instruct,mistral-7b-instruct";

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Models tried in order for every generation.
    pub models: ModelChain,
    pub openai: OpenAiClientConfig,
    /// Redis connection URL. `None` disables generation history.
    pub redis_url: Option<String>,
    pub history_max_entries: usize,
    pub history_ttl_secs: u64,
    /// Generations per second; 0 disables rate limiting.
    pub rate_limit_rps: u32,
    pub tcp_listen_addr: Option<String>,
}

impl Config {
    /// Optional:
    /// - `WRITER_MODELS`: comma-separated model IDs, tried in order
    ///   (default: "gpt-4o-mini,llama-3.1-8b-instruct,mistral-7b-instruct")
    /// - `REDIS_URL`
    /// - `HISTORY_MAX_ENTRIES` (default: 50), `HISTORY_TTL_SECS` (default: 2592000)
    /// - `RATE_LIMIT_RPS` (default: 0, unlimited)
    /// - `MCP_TCP_LISTEN_ADDR`
    /// - `OPENAI_*`, see [`OpenAiClientConfig::from_env`]
    pub fn from_env() -> Result<Self, AppError> {
        let models_raw =
            std::env::var("WRITER_MODELS").unwrap_or_else(|_| DEFAULT_MODELS.to_string());
        let models = ModelChain::parse(&models_raw)
            .map_err(|e| AppError::Config(format!("WRITER_MODELS: {e}")))?;

        Ok(Self {
            models,
            openai: OpenAiClientConfig::from_env(),
            redis_url: non_empty_var("REDIS_URL"),
            history_max_entries: parse_var("HISTORY_MAX_ENTRIES").unwrap_or(50),
            history_ttl_secs: parse_var("HISTORY_TTL_SECS").unwrap_or(30 * 86_400),
            rate_limit_rps: parse_var("RATE_LIMIT_RPS").unwrap_or(0),
            tcp_listen_addr: non_empty_var("MCP_TCP_LISTEN_ADDR"),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    non_empty_var(name).and_then(|v| v.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::DEFAULT_MODELS;
    use toolbox_common::generator::ModelChain;

    #[test]
    fn default_model_list_is_valid() {
        let chain = ModelChain::parse(DEFAULT_MODELS).expect("default chain parses");
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.models()[0], "gpt-4o-mini");
    }
}
