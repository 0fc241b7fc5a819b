/// Redis wrapper with graceful degradation.
///
/// Every operation swallows Redis errors: failures are logged as warnings and reported as
/// `None`/`false`. Callers treat a missing value exactly like an empty store, so the servers
/// stay fully functional without Redis.
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

#[derive(Clone)]
pub struct RedisCache {
    client: Option<redis::Client>,
}

impl RedisCache {
    /// Build a cache for `url`. A `None` URL or an unparseable one yields a cache that
    /// no-ops on every call.
    pub fn new(url: Option<&str>) -> Self {
        let client = url.and_then(|u| {
            redis::Client::open(u)
                .inspect_err(|e| {
                    warn!(error = %e, url = u, "failed to create redis client, cache disabled")
                })
                .ok()
        });
        Self { client }
    }

    /// A cache that never talks to Redis.
    pub fn disabled() -> Self {
        Self { client: None }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Test the connection by sending a PING.
    pub async fn is_available(&self) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        let result: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
        result.is_ok()
    }

    pub async fn delete(&self, key: &str) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        conn.del::<_, ()>(key)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis DEL failed"))
            .is_ok()
    }

    /// Push `value` onto the head of the list at `key`, trim the list to `max_len` entries
    /// and refresh its TTL, as one MULTI/EXEC transaction.
    pub async fn push_capped(
        &self,
        key: &str,
        value: &str,
        max_len: usize,
        ttl_secs: u64,
    ) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        let result: Result<(), _> = capped_push_pipeline(key, value, max_len, ttl_secs)
            .query_async(&mut conn)
            .await;
        result
            .inspect_err(|e| warn!(error = %e, key, "redis LPUSH/LTRIM failed"))
            .is_ok()
    }

    /// The first `limit` elements of the list at `key`, head first.
    pub async fn list_head(&self, key: &str, limit: usize) -> Option<Vec<String>> {
        if limit == 0 {
            return Some(Vec::new());
        }
        let mut conn = self.connection().await?;
        conn.lrange::<_, Vec<String>>(key, 0, last_index(limit))
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis LRANGE failed"))
            .ok()
    }

    pub async fn push_json_capped<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        max_len: usize,
        ttl_secs: u64,
    ) -> bool {
        match serde_json::to_string(value) {
            Ok(raw) => self.push_capped(key, &raw, max_len, ttl_secs).await,
            Err(e) => {
                warn!(error = %e, key, "redis value serialization failed");
                false
            }
        }
    }

    /// Decode the head of a JSON list. Elements that fail to decode are logged and skipped.
    pub async fn list_head_json<T: DeserializeOwned>(&self, key: &str, limit: usize) -> Vec<T> {
        self.list_head(key, limit)
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|raw| {
                serde_json::from_str(raw)
                    .inspect_err(|e| warn!(error = %e, key, "redis list element decode failed"))
                    .ok()
            })
            .collect()
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        let client = self.client.as_ref()?;
        client
            .get_multiplexed_async_connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
            .ok()
    }
}

fn last_index(len: usize) -> isize {
    isize::try_from(len.max(1) - 1).unwrap_or(isize::MAX)
}

fn capped_push_pipeline(
    key: &str,
    value: &str,
    max_len: usize,
    ttl_secs: u64,
) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .lpush(key, value)
        .ignore()
        .ltrim(key, 0, last_index(max_len))
        .ignore()
        .expire(key, i64::try_from(ttl_secs).unwrap_or(i64::MAX))
        .ignore();
    pipe
}
