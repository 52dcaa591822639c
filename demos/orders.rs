//! # Paginated Orders Example
//!
//! Fetches the same page twice (the second call is served from cache), then
//! the same filter with the sort reversed, which is a separate cache entry.
//!
//! Expects a `pagecache.toml` (or `PAGECACHE_CONFIG`) pointing at a database
//! with an `orders` table.

use pagecache::prelude::*;
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("pagecache orders example");
    println!("========================");

    let config = AppConfig::load()?;
    let cache = PaginatedCache::connect(&config).await?;
    cache.health_check().await?;
    println!("Connected to {}", config.database.database);

    let orders = ValidatedTableName::new("orders")?;
    let filters = [FilterCriterion::eq("id", 4)?];
    let page = PageRequest::new(0, 10)?;

    for sort in [
        [SortCriterion::asc("id")?],
        [SortCriterion::asc("id")?],
        [SortCriterion::desc("id")?],
    ] {
        let started = Instant::now();
        let result = cache.fetch(&orders, &filters, &sort, &page).await?;
        println!(
            "ORDER BY id {}: {} rows of {} in {:?}",
            sort[0].direction,
            result.rows.len(),
            result.total,
            started.elapsed()
        );
        for row in &result.rows {
            println!("  {}", serde_json::Value::Object(row.clone()));
        }
    }

    let stats = cache.stats();
    println!(
        "Cache: {} hits, {} misses, {} entries",
        stats.hits, stats.misses, stats.entries
    );

    Ok(())
}
