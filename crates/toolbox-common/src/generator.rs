/// Text generation over an ordered list of alternative models.
///
/// A [`ModelChain`] is tried strictly in order, one request in flight at a time. The first
/// model that produces text wins; failures are logged and the next model is attempted. Only
/// when every model has failed does the caller see an error, and that error renders as a
/// single generic message.
use std::fmt;
use std::future::Future;

use schemars::JsonSchema;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::CommonError;

/// One backend capable of turning a prompt into text with a named model.
pub trait TextGenerator {
    type Error: fmt::Display;

    fn attempt<'a>(
        &'a self,
        model: &'a str,
        prompt: &'a str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

/// Non-empty, de-duplicated, ordered list of model identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelChain {
    models: Vec<String>,
}

impl ModelChain {
    pub fn new<I, S>(models: I) -> Result<Self, CommonError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for model in models {
            let model = model.as_ref().trim();
            if model.is_empty() || unique.iter().any(|m| m == model) {
                continue;
            }
            unique.push(model.to_string());
        }
        if unique.is_empty() {
            return Err(CommonError::ModelList(
                "at least one model identifier is required".to_string(),
            ));
        }
        Ok(Self { models: unique })
    }

    /// Parse a comma-separated list such as `"gpt-4o-mini, llama-3.1-8b-instruct"`.
    pub fn parse(list: &str) -> Result<Self, CommonError> {
        Self::new(list.split(','))
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// A chain that tries `preferred` first and then the remaining models in order.
    pub fn preferring(&self, preferred: &str) -> Self {
        let preferred = preferred.trim();
        if preferred.is_empty() {
            return self.clone();
        }
        let mut models = vec![preferred.to_string()];
        models.extend(self.models.iter().filter(|m| *m != preferred).cloned());
        Self { models }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct FailedAttempt {
    pub model: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub model: String,
    pub text: String,
    pub failed_attempts: Vec<FailedAttempt>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("generation failed: all {} configured models were unavailable, please try again later", .attempts.len())]
    Exhausted { attempts: Vec<FailedAttempt> },
}

impl GenerationError {
    pub fn attempts(&self) -> &[FailedAttempt] {
        match self {
            Self::Exhausted { attempts } => attempts,
        }
    }
}

pub async fn generate_with_fallback<G: TextGenerator>(
    generator: &G,
    chain: &ModelChain,
    prompt: &str,
) -> Result<Generation, GenerationError> {
    let mut failed_attempts = Vec::new();

    for model in chain.models() {
        match generator.attempt(model, prompt).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(model = %model, failed = failed_attempts.len(), "generation succeeded");
                return Ok(Generation {
                    model: model.clone(),
                    text,
                    failed_attempts,
                });
            }
            Ok(_) => {
                warn!(model = %model, "model returned empty text, trying next model");
                failed_attempts.push(FailedAttempt {
                    model: model.clone(),
                    error: "empty response".to_string(),
                });
            }
            Err(e) => {
                warn!(model = %model, error = %e, "model attempt failed, trying next model");
                failed_attempts.push(FailedAttempt {
                    model: model.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    Err(GenerationError::Exhausted {
        attempts: failed_attempts,
    })
}
