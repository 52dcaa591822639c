//! Core paginated cache
//!
//! `PaginatedCache` renders a request through the query builder, then serves it
//! from its TTL cache or, on a miss, runs the data and count queries against its
//! executor and stores the assembled page.

use crate::errors::{ExecutorError, PageCacheError};
use crate::executor::QueryExecutor;
use crate::result::PaginatedResult;
use cache_system::{CacheStats, Clock, SystemClock, TtlCache};
use config::{AppConfig, CacheConfig, CacheKeyStrategy, DatabaseConfig};
use query_builder::{
    build_query, BuiltQuery, FilterCriterion, PageRequest, QueryBuilder, SortCriterion,
    ValidatedTableName,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Query builder + executor + TTL cache
pub struct PaginatedCache<E> {
    executor: E,
    cache: TtlCache<PaginatedResult>,
    key_strategy: CacheKeyStrategy,
}

impl<E> std::fmt::Debug for PaginatedCache<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedCache")
            .field("cache", &self.cache)
            .field("key_strategy", &self.key_strategy)
            .finish()
    }
}

impl<E: QueryExecutor> PaginatedCache<E> {
    pub fn new(executor: E, config: &CacheConfig) -> Result<Self, PageCacheError> {
        Self::with_clock(executor, config, Arc::new(SystemClock))
    }

    /// Build a cache whose expiry checks use `clock`
    pub fn with_clock(
        executor: E,
        config: &CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PageCacheError> {
        config.validate()?;
        Ok(Self {
            executor,
            cache: TtlCache::with_clock(config.ttl_duration(), clock)?,
            key_strategy: config.key_strategy,
        })
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn cache(&self) -> &TtlCache<PaginatedResult> {
        &self.cache
    }

    pub fn key_strategy(&self) -> CacheKeyStrategy {
        self.key_strategy
    }

    /// Key under which the result of `built` is stored
    pub fn cache_key(&self, built: &BuiltQuery) -> String {
        match self.key_strategy {
            CacheKeyStrategy::QueryText => built.sql.clone(),
            CacheKeyStrategy::QueryAndArguments => {
                let arguments: Vec<String> =
                    built.arguments.iter().map(ToString::to_string).collect();
                format!("{} -- [{}]", built.sql, arguments.join(", "))
            }
        }
    }

    /// Return one page of `table`, served from cache while the stored entry is fresh
    pub async fn fetch(
        &self,
        table: &ValidatedTableName,
        filters: &[FilterCriterion],
        sort: &[SortCriterion],
        page: &PageRequest,
    ) -> Result<PaginatedResult, PageCacheError> {
        let built = build_query(table, filters, sort, page);
        self.fetch_built(table, &built).await
    }

    /// Same as [`fetch`](Self::fetch) for a request assembled with [`QueryBuilder`]
    pub async fn fetch_query(&self, query: &QueryBuilder) -> Result<PaginatedResult, PageCacheError> {
        let built = query.build()?;
        self.fetch_built(query.table_name(), &built).await
    }

    async fn fetch_built(
        &self,
        table: &ValidatedTableName,
        built: &BuiltQuery,
    ) -> Result<PaginatedResult, PageCacheError> {
        let key = self.cache_key(built);
        debug_log!("[FETCH] Table: {}", table);
        debug_log!("[FETCH] SQL: {}", built.sql);
        debug_log!("[FETCH] Params count: {}", built.arguments.len());

        let result = self
            .cache
            .get_or_try_insert_with(&key, || self.execute(built))
            .await
            .inspect_err(|e| {
                tracing::warn!(table = %table, sql = %built.sql, error = %e, "paginated fetch failed");
            })?;

        Ok(result)
    }

    /// Run the data and count queries without consulting the cache
    pub async fn execute(&self, built: &BuiltQuery) -> Result<PaginatedResult, ExecutorError> {
        let rows = self.executor.fetch_rows(&built.sql, &built.arguments).await?;
        let total = self
            .executor
            .fetch_count(&built.count_sql, built.count_arguments())
            .await?;

        trace_log!("[EXECUTE] {} rows, total {}", rows.len(), total);
        Ok(PaginatedResult::new(rows, total))
    }

    /// Drop stale entries; see [`TtlCache::purge_expired`]
    pub async fn purge_expired(&self) -> usize {
        self.cache.purge_expired().await
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl PaginatedCache<PgPool> {
    /// Connect a pool from configuration and wrap it in a cache
    pub async fn connect(config: &AppConfig) -> Result<Self, PageCacheError> {
        config.validate()?;
        let pool = connect_pool(&config.database).await?;
        Self::new(pool, &config.cache)
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.executor
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), PageCacheError> {
        sqlx::query("SELECT 1").fetch_one(&self.executor).await?;
        Ok(())
    }
}

/// Open a PostgreSQL pool honoring the configured limits
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, PageCacheError> {
    let mut pool_options = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

    if config.max_lifetime_seconds > 0 {
        pool_options = pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
    }

    let pool = pool_options.connect(&config.connection_string()).await?;
    tracing::info!(
        host = %config.host,
        database = %config.database,
        max_connections = config.max_connections,
        "connected to database"
    );
    Ok(pool)
}
