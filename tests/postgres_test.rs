//! Integration tests against a live PostgreSQL
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

use pagecache::prelude::*;

async fn setup_pool() -> PgPool {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

async fn seed_orders(pool: &PgPool, table: &str) {
    sqlx::query(&format!("DROP TABLE IF EXISTS {} CASCADE", table))
        .execute(pool)
        .await
        .expect("Failed to drop table");
    sqlx::query(&format!(
        "CREATE TABLE {} (id INTEGER PRIMARY KEY, status TEXT NOT NULL, total BIGINT, \
         placed_at TIMESTAMPTZ NOT NULL DEFAULT now(), meta JSONB)",
        table
    ))
    .execute(pool)
    .await
    .expect("Failed to create table");

    for (id, status) in [(1, "open"), (2, "open"), (3, "shipped"), (4, "open"), (5, "shipped")] {
        sqlx::query(&format!(
            "INSERT INTO {} (id, status, total, meta) VALUES ($1, $2, $3, $4)",
            table
        ))
        .bind(id)
        .bind(status)
        .bind(i64::from(id) * 100)
        .bind(sqlx::types::Json(json!({"source": "test"})))
        .execute(pool)
        .await
        .expect("Failed to insert row");
    }
}

async fn drop_table(pool: &PgPool, table: &str) {
    let _ = sqlx::query(&format!("DROP TABLE IF EXISTS {} CASCADE", table))
        .execute(pool)
        .await;
}

#[tokio::test]
#[ignore]
async fn test_fetch_filtered_sorted_page() {
    let pool = setup_pool().await;
    seed_orders(&pool, "pagecache_orders_page").await;

    let cache = PaginatedCache::new(pool.clone(), &CacheConfig::default()).unwrap();
    let table = ValidatedTableName::new("pagecache_orders_page").unwrap();
    let filters = [FilterCriterion::eq("status", "open").unwrap()];
    let sort = [SortCriterion::desc("id").unwrap()];

    let result = cache
        .fetch(&table, &filters, &sort, &PageRequest::new(0, 2).unwrap())
        .await
        .unwrap();

    assert_eq!(result.total, 3);
    let ids: Vec<_> = result.rows.iter().map(|row| row["id"].clone()).collect();
    assert_eq!(ids, vec![json!(4), json!(2)]);
    assert_eq!(result.rows[0]["total"], json!(400));
    assert_eq!(result.rows[0]["meta"], json!({"source": "test"}));
    assert!(result.rows[0]["placed_at"].is_string());
    assert!(result.has_next_page(&PageRequest::new(0, 2).unwrap()));

    drop_table(&pool, "pagecache_orders_page").await;
}

#[tokio::test]
#[ignore]
async fn test_cached_result_survives_table_change() {
    let pool = setup_pool().await;
    seed_orders(&pool, "pagecache_orders_cached").await;

    let cache = PaginatedCache::new(pool.clone(), &CacheConfig::default()).unwrap();
    let table = ValidatedTableName::new("pagecache_orders_cached").unwrap();
    let page = PageRequest::new(0, 10).unwrap();

    let first = cache.fetch(&table, &[], &[], &page).await.unwrap();
    assert_eq!(first.total, 5);

    sqlx::query("DELETE FROM pagecache_orders_cached WHERE id = 1")
        .execute(&pool)
        .await
        .unwrap();

    let second = cache.fetch(&table, &[], &[], &page).await.unwrap();
    assert_eq!(second, first);

    drop_table(&pool, "pagecache_orders_cached").await;
}

#[tokio::test]
#[ignore]
async fn test_missing_table_is_execution_error() {
    let pool = setup_pool().await;
    let cache = PaginatedCache::new(pool, &CacheConfig::default()).unwrap();
    let table = ValidatedTableName::new("pagecache_no_such_table").unwrap();

    let err = cache
        .fetch(&table, &[], &[], &PageRequest::new(0, 10).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PageCacheError::Executor(ExecutorError::Execution(_))
    ));
    assert!(cache.cache().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let pool = setup_pool().await;
    let cache = PaginatedCache::new(pool, &CacheConfig::default()).unwrap();
    cache.health_check().await.unwrap();
}

const REFERENCE_UUID: &str = "123e4567-e89b-12d3-a456-426614174000";
const REFERENCE_TIMESTAMP: &str = "2024-01-01T00:00:00Z";

async fn seed_references(pool: &PgPool) {
    drop_table(pool, "pagecache_refs").await;
    sqlx::query(
        "CREATE TABLE pagecache_refs (id INTEGER PRIMARY KEY, reference TEXT NOT NULL, \
         external_id UUID, placed_at TIMESTAMPTZ, big BIGINT)",
    )
    .execute(pool)
    .await
    .expect("Failed to create table");

    sqlx::query(&format!(
        "INSERT INTO pagecache_refs VALUES \
         (1, '{uuid}', '{uuid}', '{ts}', 5000000000), \
         (2, '{ts}', NULL, NULL, 1), \
         (3, 'plain', NULL, NULL, NULL)",
        uuid = REFERENCE_UUID,
        ts = REFERENCE_TIMESTAMP
    ))
    .execute(pool)
    .await
    .expect("Failed to insert rows");
}

fn ids(result: &PaginatedResult) -> Vec<Value> {
    result.rows.iter().map(|row| row["id"].clone()).collect()
}

#[tokio::test]
#[ignore]
async fn test_text_filters_bind_as_text() {
    let pool = setup_pool().await;
    seed_references(&pool).await;

    let cache = PaginatedCache::new(pool.clone(), &CacheConfig::default()).unwrap();
    let table = ValidatedTableName::new("pagecache_refs").unwrap();
    let page = PageRequest::new(0, 10).unwrap();

    // the default key ignores values, so each lookup gets its own cache
    for (value, expected) in [(REFERENCE_UUID, 1), (REFERENCE_TIMESTAMP, 2), ("plain", 3)] {
        let cache = PaginatedCache::new(pool.clone(), &CacheConfig::default()).unwrap();
        let filters = [FilterCriterion::eq("reference", value).unwrap()];
        let result = cache.fetch(&table, &filters, &[], &page).await.unwrap();
        assert_eq!(result.total, 1, "filter value {}", value);
        assert_eq!(ids(&result), vec![json!(expected)]);
    }

    let missing = [FilterCriterion::eq("reference", "absent").unwrap()];
    let result = cache.fetch(&table, &missing, &[], &page).await.unwrap();
    assert_eq!(result.total, 0);

    drop_table(&pool, "pagecache_refs").await;
}

#[tokio::test]
#[ignore]
async fn test_typed_filters_bind_as_their_type() {
    let pool = setup_pool().await;
    seed_references(&pool).await;

    let config = CacheConfig::new(60, CacheKeyStrategy::QueryAndArguments);
    let cache = PaginatedCache::new(pool.clone(), &config).unwrap();
    let table = ValidatedTableName::new("pagecache_refs").unwrap();
    let page = PageRequest::new(0, 10).unwrap();

    let external_id = uuid::Uuid::parse_str(REFERENCE_UUID).unwrap();
    let placed_at = chrono::DateTime::parse_from_rfc3339(REFERENCE_TIMESTAMP)
        .unwrap()
        .with_timezone(&chrono::Utc);

    for filter in [
        FilterCriterion::eq("external_id", external_id).unwrap(),
        FilterCriterion::eq("placed_at", placed_at).unwrap(),
        FilterCriterion::eq("big", 5_000_000_000i64).unwrap(),
    ] {
        let result = cache.fetch(&table, &[filter.clone()], &[], &page).await.unwrap();
        assert_eq!(ids(&result), vec![json!(1)], "filter {:?}", filter);
    }

    let result = cache
        .fetch(&table, &[FilterCriterion::eq("big", 1).unwrap()], &[], &page)
        .await
        .unwrap();
    assert_eq!(ids(&result), vec![json!(2)]);

    drop_table(&pool, "pagecache_refs").await;
}

#[tokio::test]
#[ignore]
async fn test_decodes_extended_column_types() {
    let pool = setup_pool().await;
    drop_table(&pool, "pagecache_types").await;
    sqlx::query("DROP TYPE IF EXISTS pagecache_mood")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("CREATE TYPE pagecache_mood AS ENUM ('happy', 'sad')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE pagecache_types (id INTEGER PRIMARY KEY, amount NUMERIC(10,2), \
         mood pagecache_mood, span INTERVAL, addr INET, price MONEY, small INT2[], \
         flags BOOL[], weights FLOAT8[], note TEXT)",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO pagecache_types VALUES (1, 12.50, 'happy', '1 day 2 hours', '10.0.0.1', \
         '12.34', '{1,2}', '{t,f}', '{0.5,1.5}', NULL)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let cache = PaginatedCache::new(pool.clone(), &CacheConfig::default()).unwrap();
    let table = ValidatedTableName::new("pagecache_types").unwrap();
    let result = cache
        .fetch(&table, &[], &[], &PageRequest::new(0, 10).unwrap())
        .await
        .unwrap();

    let row = &result.rows[0];
    assert_eq!(row["amount"], json!("12.50"));
    assert_eq!(row["mood"], json!("happy"));
    assert_eq!(row["span"], json!("P1DT2H"));
    assert_eq!(row["addr"], json!("10.0.0.1/32"));
    assert_eq!(row["price"], json!("12.34"));
    assert_eq!(row["small"], json!([1, 2]));
    assert_eq!(row["flags"], json!([true, false]));
    assert_eq!(row["weights"], json!([0.5, 1.5]));
    assert_eq!(row["note"], Value::Null);

    let columns: Vec<&str> = row.keys().map(String::as_str).collect();
    assert_eq!(
        columns,
        ["id", "amount", "mood", "span", "addr", "price", "small", "flags", "weights", "note"]
    );

    drop_table(&pool, "pagecache_types").await;
    let _ = sqlx::query("DROP TYPE IF EXISTS pagecache_mood")
        .execute(&pool)
        .await;
}

#[tokio::test]
#[ignore]
async fn test_largest_page_window_is_accepted() {
    let pool = setup_pool().await;
    seed_orders(&pool, "pagecache_orders_wide").await;

    let cache = PaginatedCache::new(pool.clone(), &CacheConfig::default()).unwrap();
    let table = ValidatedTableName::new("pagecache_orders_wide").unwrap();
    let page = PageRequest::new(MAX_PAGE_VALUE, MAX_PAGE_VALUE).unwrap();

    let result = cache.fetch(&table, &[], &[], &page).await.unwrap();
    assert!(result.rows.is_empty());
    assert_eq!(result.total, 5);
    assert!(PageRequest::new(0, u64::MAX).is_err());

    drop_table(&pool, "pagecache_orders_wide").await;
}
