use anyhow::Result;
use async_trait::async_trait;

/// Whole-value key-value persistence. Values are opaque strings written and
/// read in one piece; there is no partial update.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn put(&self, key: &str, value: &str) -> Result<()>;
}
