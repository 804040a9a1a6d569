//! # Repository
//!
//! PostgreSQL backed storage of blog posts and comments.
//!
//! Query functions live in [`sql_models::pg_queries`] and are re-exported here; they
//! accept anything implementing [`AsExec`], in practice a [`Tx`]. Higher level, multi-statement logic is implemented by the facades in
//! [`facades`].

use log::info;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::str::FromStr;
use std::time::Duration;

use crate::params;

mod error;
pub use error::*;

mod sql_models;
pub use sql_models::*;

mod facades;
pub use facades::*;

pub type Database = sqlx::Postgres;
pub type Pool = sqlx::Pool<Database>;

/// Provides an executor on which queries can be run.
pub trait AsExec {
    type Exec<'e>: sqlx::Executor<'e, Database = Database>
    where
        Self: 'e;

    fn as_exec(&mut self) -> Self::Exec<'_>;
}

/// Transaction on a pooled connection.
///
/// Nothing is persisted until [`Tx::commit`] succeeds: dropping a [`Tx`] (for
/// instance because the request owning it was cancelled) rolls it back.
pub struct Tx {
    inner: sqlx::Transaction<'static, Database>,
}

impl AsExec for Tx {
    type Exec<'e>
        = &'e mut sqlx::PgConnection
    where
        Self: 'e;

    fn as_exec(&mut self) -> Self::Exec<'_> {
        &mut *self.inner
    }
}

impl Tx {
    /// Makes the server abort any statement of this transaction running
    /// longer than `budget`.
    pub async fn statement_timeout(&mut self, budget: Duration) -> Result<(), Error> {
        // a zero timeout disables the limit
        let ms = budget.as_millis().max(1);
        sqlx::query("SELECT set_config('statement_timeout', $1, true)")
            .bind(format!("{ms}ms"))
            .execute(&mut *self.inner)
            .await?;
        Ok(())
    }

    pub async fn commit(self) -> Result<(), Error> {
        self.inner.commit().await?;
        Ok(())
    }
}

/// Cheap to clone handle to the database pool.
#[derive(Clone)]
pub struct Repository {
    pool: Pool,
}

impl Repository {
    /// Connects to the database and verifies the connection.
    pub async fn try_new(config: &Config) -> Result<Self, Error> {
        let options = config.connect_options()?;

        let pool = config.pool_options().connect_with(options).await?;
        info!(
            "connected to database (max connections: {})",
            config.max_open_conns
        );

        Ok(Self { pool })
    }

    pub async fn transaction(&self) -> Result<Tx, Error> {
        Ok(Tx {
            inner: self.pool.begin().await?,
        })
    }

    /// Waits for checked out connections to be returned and closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl From<Pool> for Repository {
    fn from(pool: Pool) -> Self {
        Self { pool }
    }
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Full connection URL, takes precedence over the discrete fields
    pub url: Option<String>,

    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub ssl_mode: String,

    pub max_open_conns: u32,
    /// Connections kept open even when idle
    pub max_idle_conns: u32,
    pub conn_max_life: Duration,
    pub acquire_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_owned(),
            port: 5432,
            user: "postgres".to_owned(),
            password: String::new(),
            database: "postgres".to_owned(),
            ssl_mode: "disable".to_owned(),
            max_open_conns: 10,
            max_idle_conns: 5,
            conn_max_life: Duration::from_secs(5 * 60),
            acquire_timeout: params::configurables().db_acquire_timeout,
        }
    }
}

impl Config {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_ssl_mode(mut self, ssl_mode: impl Into<String>) -> Self {
        self.ssl_mode = ssl_mode.into();
        self
    }

    pub fn with_pool_limits(mut self, max_open: u32, max_idle: u32, max_life: Duration) -> Self {
        self.max_open_conns = max_open;
        self.max_idle_conns = max_idle;
        self.conn_max_life = max_life;
        self
    }

    fn connect_options(&self) -> Result<PgConnectOptions, Error> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url)
                .map_err(|e| Error::InvalidConfig(format!("database url: {e}")));
        }

        let ssl_mode = PgSslMode::from_str(&self.ssl_mode)
            .map_err(|e| Error::InvalidConfig(format!("ssl mode `{}`: {e}", self.ssl_mode)))?;

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database)
            .ssl_mode(ssl_mode);

        if !self.password.is_empty() {
            options = options.password(&self.password);
        }

        Ok(options)
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_open_conns)
            .min_connections(self.max_idle_conns.min(self.max_open_conns))
            .max_lifetime(self.conn_max_life)
            .acquire_timeout(self.acquire_timeout)
            .test_before_acquire(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_ssl_mode_is_rejected() {
        let config = Config::default().with_ssl_mode("sometimes");
        assert!(matches!(
            config.connect_options(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let config = Config::default().with_url("::not a url::");
        assert!(matches!(
            config.connect_options(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn discrete_fields() {
        let config = Config::default()
            .with_host("db.internal")
            .with_port(6543)
            .with_credentials("blog", "secret")
            .with_database("blogs")
            .with_ssl_mode("require");

        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "blog");
        assert_eq!(options.get_database(), Some("blogs"));
    }
}
