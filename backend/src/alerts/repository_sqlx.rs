use anyhow::Context;
use async_trait::async_trait;
use sqlx::{AnyPool, Row};

use crate::alerts::repository::KeyValueStore;
use crate::time::now_ms;

/// SQLx-backed implementation of KeyValueStore over the `kv_store` table.
/// Responsible only for persistence and row mapping.
pub struct SqlxKeyValueStore {
    pool: AnyPool,
}

impl SqlxKeyValueStore {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for SqlxKeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query(r#"SELECT kv_value FROM kv_store WHERE kv_key = ?;"#)
            .bind(key.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(
                r.try_get::<String, _>("kv_value")
                    .context("decode kv_value")?,
            )),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
INSERT INTO kv_store (kv_key, kv_value, updated_ms)
VALUES (?, ?, ?)
ON CONFLICT(kv_key) DO UPDATE SET
  kv_value = excluded.kv_value,
  updated_ms = excluded.updated_ms;
"#,
        )
        .bind(key.to_string())
        .bind(value.to_string())
        .bind(now_ms())
        .execute(&self.pool)
        .await
        .with_context(|| format!("upsert kv key {key}"))?;

        Ok(())
    }
}
