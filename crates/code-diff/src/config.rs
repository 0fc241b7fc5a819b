use crate::error::AppError;

const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upper bound on each of the two diffed texts.
    pub max_input_bytes: usize,
    /// Serve MCP over TCP on this address instead of stdio.
    pub tcp_listen_addr: Option<String>,
}

impl Config {
    /// Optional:
    /// - `DIFF_MAX_INPUT_BYTES` (default: 1048576)
    /// - `MCP_TCP_LISTEN_ADDR`: e.g. "127.0.0.1:7402"
    pub fn from_env() -> Result<Self, AppError> {
        let max_input_bytes = match std::env::var("DIFF_MAX_INPUT_BYTES") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "DIFF_MAX_INPUT_BYTES must be a positive integer, got '{raw}'"
                    ))
                })?,
            Err(_) => DEFAULT_MAX_INPUT_BYTES,
        };

        Ok(Self {
            max_input_bytes,
            tcp_listen_addr: std::env::var("MCP_TCP_LISTEN_ADDR")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            tcp_listen_addr: None,
        }
    }
}
