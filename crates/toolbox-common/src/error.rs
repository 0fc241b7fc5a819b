/// Errors raised by the shared toolbox components.
///
/// Redis and history failures never surface here: the cache layer degrades to misses
/// instead. Server crates wrap what does surface in their own `AppError`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("invalid model list: {0}")]
    ModelList(String),
}
