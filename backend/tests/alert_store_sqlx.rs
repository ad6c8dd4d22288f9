use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use std::sync::Arc;
use tokio::task::JoinSet;
use uuid::Uuid;

use backend::alerts::store::ALERTS_KEY;
use backend::alerts::{AlertStore, KeyValueStore, SqlxKeyValueStore};
use backend::db::schema;
use corelib::{AlertCondition, PriceAlert};

/// Helper to setup an isolated, unique in-memory SQLite database.
/// Using a unique name in the connection string keeps parallel tests apart
/// while still allowing shared cache access across pool connections.
async fn setup_db() -> AnyPool {
    sqlx::any::install_default_drivers();

    let db_name = Uuid::new_v4().to_string();
    let conn_str = format!("sqlite:file:{}?mode=memory&cache=shared", db_name);

    let pool = AnyPoolOptions::new()
        .max_connections(5)
        .connect(&conn_str)
        .await
        .unwrap();

    schema::migrate(&pool).await.unwrap();
    pool
}

fn alert(id: &str, target: f64) -> PriceAlert {
    PriceAlert::new(id, AlertCondition::Below, target, "eur", 1_000).unwrap()
}

#[tokio::test]
async fn get_missing_key_is_none() {
    let pool = setup_db().await;
    let kv = SqlxKeyValueStore::new(pool);

    assert_eq!(kv.get("nope").await.unwrap(), None);
}

#[tokio::test]
async fn put_upserts_whole_value() {
    let pool = setup_db().await;
    let kv = SqlxKeyValueStore::new(pool.clone());

    kv.put("k", "first").await.unwrap();
    kv.put("k", "second").await.unwrap();

    assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("second"));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn migrate_is_idempotent() {
    let pool = setup_db().await;
    schema::migrate(&pool).await.unwrap();
}

#[tokio::test]
async fn alert_store_round_trip_over_sqlite() {
    let pool = setup_db().await;
    let store = AlertStore::new(Arc::new(SqlxKeyValueStore::new(pool.clone())));

    let alerts = vec![alert("a", 10.0), alert("b", 20.0).triggered_at(5_000)];
    store.save(&alerts).await.unwrap();

    // A fresh store over the same database sees the persisted list.
    let reopened = AlertStore::new(Arc::new(SqlxKeyValueStore::new(pool)));
    assert_eq!(reopened.load().await, alerts);
}

#[tokio::test]
async fn corrupt_row_reads_as_no_alerts() {
    let pool = setup_db().await;
    let kv = SqlxKeyValueStore::new(pool.clone());
    kv.put(ALERTS_KEY, "[{\"broken\": true").await.unwrap();

    let store = AlertStore::new(Arc::new(SqlxKeyValueStore::new(pool)));
    assert!(store.load().await.is_empty());
}

#[tokio::test]
async fn missing_table_fails_writes_but_not_reads() {
    sqlx::any::install_default_drivers();
    let conn_str = format!("sqlite:file:{}?mode=memory&cache=shared", Uuid::new_v4());
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .connect(&conn_str)
        .await
        .unwrap();

    let store = AlertStore::new(Arc::new(SqlxKeyValueStore::new(pool)));
    assert!(store.load().await.is_empty());
    assert!(store.save(&[alert("a", 1.0)]).await.is_err());
}

#[tokio::test]
async fn concurrent_adds_are_serialized() {
    let pool = setup_db().await;
    let store = Arc::new(AlertStore::new(Arc::new(SqlxKeyValueStore::new(pool))));

    let mut set = JoinSet::new();
    for i in 0..20 {
        let store = store.clone();
        set.spawn(async move { store.add(alert(&format!("id-{i}"), 1.0 + i as f64)).await });
    }
    while let Some(res) = set.join_next().await {
        res.unwrap().unwrap();
    }

    let mut ids: Vec<String> = store.load().await.into_iter().map(|a| a.id).collect();
    ids.sort();
    assert_eq!(ids.len(), 20);
    ids.dedup();
    assert_eq!(ids.len(), 20);
}
