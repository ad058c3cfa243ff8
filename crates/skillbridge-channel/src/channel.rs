//! [`ParamChannel`] – the async key-value seam, and the in-memory backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use skillbridge_types::BridgeError;
use tokio::sync::RwLock;
use tracing::trace;

/// Atomic get/set of individual string-valued keys.
///
/// This is everything the dispatcher requires of the bus: each *single*
/// operation is atomic, but there are no transactional guarantees across
/// keys — the protocol's ordering guarantees come from program order on the
/// dispatcher side, not from the channel.
///
/// # Contract
///
/// * `get` returns `default` (not an error) when the key has never been
///   written.
/// * `set` unconditionally overwrites.
/// * Errors are transport failures only (backend unreachable, …) and are
///   treated as fatal by the dispatch loop.
#[async_trait]
pub trait ParamChannel: Send + Sync {
    /// Read `key`, falling back to `default` when it is unset.
    async fn get(&self, key: &str, default: &str) -> Result<String, BridgeError>;

    /// Write `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), BridgeError>;
}

/// In-process channel backend over a shared map.
///
/// Clone it cheaply – all clones share the same underlying storage, so a
/// planner-side clone and the dispatcher's clone see each other's writes
/// exactly like two processes sharing a real parameter server.
#[derive(Clone, Debug, Default)]
pub struct InMemoryChannel {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryChannel {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParamChannel for InMemoryChannel {
    async fn get(&self, key: &str, default: &str) -> Result<String, BridgeError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BridgeError> {
        trace!(key, value, "channel set");
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_of_unset_key_returns_default() {
        let channel = InMemoryChannel::new();
        let value = channel.get("human_state", "standing").await.unwrap();
        assert_eq!(value, "standing");
    }

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let channel = InMemoryChannel::new();
        channel.set("skill_name_input", "pick,bottle").await.unwrap();
        let value = channel.get("skill_name_input", "None,None").await.unwrap();
        assert_eq!(value, "pick,bottle");
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let channel = InMemoryChannel::new();
        channel.set("k", "first").await.unwrap();
        channel.set("k", "second").await.unwrap();
        assert_eq!(channel.get("k", "").await.unwrap(), "second");
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let writer = InMemoryChannel::new();
        let reader = writer.clone();
        writer.set("skill_name_suc_msg", "nav,true,done").await.unwrap();
        assert_eq!(
            reader.get("skill_name_suc_msg", "None,None,None").await.unwrap(),
            "nav,true,done"
        );
    }
}
