#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("{side} text is {size} bytes, limit is {limit}")]
    InputTooLarge {
        side: &'static str,
        size: usize,
        limit: usize,
    },
}
