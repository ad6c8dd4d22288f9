use sqlx::AnyPool;

pub async fn migrate(pool: &AnyPool) -> anyhow::Result<()> {
    // Whole-blob key-value storage; alerts live under a single key.
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS kv_store (
  kv_key TEXT PRIMARY KEY,
  kv_value TEXT NOT NULL,
  updated_ms BIGINT NOT NULL
);
"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
