use std::path::PathBuf;

use crate::error::AppError;

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON catalog to serve instead of the bundled one.
    pub catalog_path: Option<PathBuf>,
    /// Serve MCP over TCP on this address instead of stdio.
    pub tcp_listen_addr: Option<String>,
}

impl Config {
    /// Optional:
    /// - `TOOL_CATALOG_PATH`: path to a catalog JSON file (default: bundled catalog)
    /// - `MCP_TCP_LISTEN_ADDR`: e.g. "127.0.0.1:7401"
    pub fn from_env() -> Result<Self, AppError> {
        let catalog_path = non_empty_var("TOOL_CATALOG_PATH").map(PathBuf::from);
        if let Some(path) = &catalog_path {
            if !path.is_file() {
                return Err(AppError::Config(format!(
                    "TOOL_CATALOG_PATH does not point to a file: {}",
                    path.display()
                )));
            }
        }

        Ok(Self {
            catalog_path,
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
