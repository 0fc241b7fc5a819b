use toolbox_common::generator::GenerationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("rate limit exceeded (RATE_LIMIT_RPS={rps}): try again in ~{retry_after_ms}ms")]
    RateLimited { rps: u32, retry_after_ms: u128 },
}
