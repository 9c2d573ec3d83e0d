use error_stack::{Report, ResultExt};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::{str::FromStr, time::Duration};

use crate::config;

mod error;
pub use error::*;

pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Postgres>;
pub type Connection = sqlx::PgConnection;

/// Embedded schema migrations from the `migrations` directory.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct Pool {
    pool: sqlx::PgPool,
}

impl Pool {
    pub(crate) async fn new(
        global_cfg: &config::Database,
        pool_cfg: &config::DbPoolConfig,
    ) -> Result<Self> {
        let mut pool_opts = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(global_cfg.timeout_secs.get()))
            .max_connections(pool_cfg.pool_size.get());

        if let Some(min_idle) = pool_cfg.min_idle {
            pool_opts = pool_opts.min_connections(min_idle.get());
        }

        let mut connect_opts =
            PgConnectOptions::from_str(pool_cfg.url.as_str()).change_context(Error::InvalidUrl)?;

        if global_cfg.enforce_tls {
            connect_opts = connect_opts.ssl_mode(PgSslMode::Prefer);
        }

        // Writes against a readonly pool fail with a "read-only transaction"
        // error which gets turned into `Error::Readonly`.
        if pool_cfg.readonly {
            connect_opts = connect_opts.options([("default_transaction_read_only", "on")]);
        }

        let pool = Self {
            pool: pool_opts.connect_lazy_with(connect_opts),
        };

        match pool.wait_until_healthy().await {
            Ok(..) => {}
            Err(err) if err.is_unhealthy() => {}
            Err(err) => return Err(err),
        }

        Ok(pool)
    }
}

#[cfg(test)]
impl Pool {
    /// A lazy pool pointing at a port nothing listens on.
    pub(crate) fn unreachable() -> Self {
        let connect_opts = PgConnectOptions::new().host("127.0.0.1").port(1);
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy_with(connect_opts);

        Self { pool }
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.pool.fmt(f)
    }
}

impl Pool {
    #[inline]
    pub fn connections(&self) -> u32 {
        self.pool.size()
    }

    #[inline]
    pub fn is_healthy(&self) -> bool {
        self.connections() > 0
    }

    #[tracing::instrument(name = "db.connect", skip(self))]
    pub async fn get(&self) -> Result<PoolConnection> {
        if let Some(inner) = self.pool.try_acquire() {
            return Ok(inner);
        }

        // An empty pool (database restarted, idle connections reaped)
        // has to dial out again before it can be called unhealthy.
        self.acquire().await
    }

    async fn acquire(&self) -> Result<PoolConnection> {
        match self.pool.acquire().await {
            Ok(conn) => Ok(conn),
            Err(e) if !self.is_healthy() => Err(Report::new(Error::Internal(e)))
                .change_context(Error::UnhealthyPool),
            Err(e) => Err(Report::new(Error::Internal(e))),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn wait_until_healthy(&self) -> Result<()> {
        self.acquire().await.map(|_| ())
    }

    /// Applies pending schema migrations.
    #[tracing::instrument(name = "db.migrate", skip(self))]
    pub async fn migrate(&self) -> Result<()> {
        let now = tokio::time::Instant::now();
        tracing::info!("Performing database migrations... (this may take a while)");

        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| Report::new(Error::Migration(e)))?;

        let elapsed = now.elapsed();
        tracing::info!("Successfully performed database migrations! took {elapsed:.2?}");

        Ok(())
    }
}
