pub mod error;
pub mod generator;
pub mod history;
pub mod mcp_api;
pub mod openai;
pub mod redis;
