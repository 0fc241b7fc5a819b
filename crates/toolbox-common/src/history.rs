use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::redis::RedisCache;

const KEY_PREFIX: &str = "toolbox:v1:history:";

static ENTRY_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HistoryEntry {
    pub id: String,
    /// Name of the generator tool that produced the entry, e.g. "write_email".
    pub tool: String,
    pub model: String,
    pub prompt: String,
    pub output: String,
    /// Milliseconds since the Unix epoch.
    pub created_at_ms: u64,
}

impl HistoryEntry {
    pub fn new(tool: &str, model: &str, prompt: &str, output: &str) -> Self {
        Self {
            id: new_entry_id(),
            tool: tool.to_string(),
            model: model.to_string(),
            prompt: prompt.to_string(),
            output: output.to_string(),
            created_at_ms: u64::try_from(unix_now().as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Per-tool generation history, newest first, capped at `max_entries`.
///
/// Each tool's history is a Redis list under `toolbox:v1:history:{tool}` holding one JSON
/// entry per element. Writes push, trim and refresh the TTL in a single transaction, so
/// concurrent generations never overwrite each other.
#[derive(Clone)]
pub struct GenerationHistory {
    redis: RedisCache,
    max_entries: usize,
    ttl_secs: u64,
}

impl GenerationHistory {
    pub fn new(redis: RedisCache, max_entries: usize, ttl_secs: u64) -> Self {
        Self {
            redis,
            max_entries: max_entries.max(1),
            ttl_secs,
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub async fn is_available(&self) -> bool {
        self.redis.is_available().await
    }

    /// Returns `true` when the entry was persisted.
    pub async fn record(&self, entry: HistoryEntry) -> bool {
        let key = history_key(&entry.tool);
        let stored = self
            .redis
            .push_json_capped(&key, &entry, self.max_entries, self.ttl_secs)
            .await;
        debug!(key, id = %entry.id, stored, "history updated");
        stored
    }

    pub async fn list(&self, tool: &str, limit: usize) -> Vec<HistoryEntry> {
        self.redis
            .list_head_json(&history_key(tool), limit.min(self.max_entries))
            .await
    }

    pub async fn clear(&self, tool: &str) -> bool {
        self.redis.delete(&history_key(tool)).await
    }
}

fn history_key(tool: &str) -> String {
    format!("{KEY_PREFIX}{tool}")
}

fn unix_now() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
}

fn new_entry_id() -> String {
    let counter = ENTRY_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut h = Sha256::new();
    h.update(unix_now().as_nanos().to_le_bytes());
    h.update(std::process::id().to_le_bytes());
    h.update(counter.to_le_bytes());
    let digest = h.finalize();
    digest[..12].iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(output: &str) -> HistoryEntry {
        HistoryEntry::new("write_email", "model-a", "prompt", output)
    }

    #[test]
    fn created_at_has_millisecond_resolution() {
        let before = unix_now().as_millis();
        let e = entry("x");
        let after = unix_now().as_millis();
        assert!(u128::from(e.created_at_ms) >= before && u128::from(e.created_at_ms) <= after);
    }

    #[test]
    fn entry_ids_are_unique() {
        let a = entry("x");
        let b = entry("x");
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 24);
    }

    #[test]
    fn keys_are_namespaced_per_tool() {
        assert_eq!(history_key("write_article"), "toolbox:v1:history:write_article");
    }

    // Needs a running Redis: REDIS_URL=redis://127.0.0.1/ cargo test -- --ignored
    #[ignore]
    #[tokio::test]
    async fn concurrent_records_are_all_kept() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
        let history = GenerationHistory::new(RedisCache::new(Some(&url)), 10, 60);
        let tool = format!("test_{}", new_entry_id());

        let records = (0..8).map(|n| {
            let history = history.clone();
            let entry = HistoryEntry::new(&tool, "model-a", "prompt", &n.to_string());
            tokio::spawn(async move { history.record(entry).await })
        });
        for handle in records.collect::<Vec<_>>() {
            assert!(handle.await.expect("record task"));
        }

        let mut outputs: Vec<String> = history
            .list(&tool, 10)
            .await
            .into_iter()
            .map(|e| e.output)
            .collect();
        outputs.sort();
        assert_eq!(outputs, ["0", "1", "2", "3", "4", "5", "6", "7"]);

        for n in 8..12 {
            assert!(history.record(HistoryEntry::new(&tool, "m", "p", &n.to_string())).await);
        }
        let newest: Vec<String> =
            history.list(&tool, 2).await.into_iter().map(|e| e.output).collect();
        assert_eq!(newest, ["11", "10"]);
        assert_eq!(history.list(&tool, 50).await.len(), 10);
        assert!(history.clear(&tool).await);
        assert!(history.list(&tool, 10).await.is_empty());
    }

    #[tokio::test]
    async fn history_without_redis_is_empty() {
        let history = GenerationHistory::new(RedisCache::disabled(), 0, 60);
        assert_eq!(history.max_entries(), 1);
        assert!(!history.record(entry("lost")).await);
        assert!(history.list("write_email", 10).await.is_empty());
        assert!(!history.clear("write_email").await);
        assert!(!history.is_available().await);
    }
}
