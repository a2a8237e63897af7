use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbConn, DbErr};

/// Configuration for the posts database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` when `DATABASE_URL` is not set.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("DATABASE_URL").ok()?;

        Some(Self {
            url: normalize_url(url),
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
            min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            connect_timeout: Duration::from_secs(
                std::env::var("DB_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        })
    }
}

/// Hosted Postgres providers hand out the legacy `postgres://` scheme.
fn normalize_url(url: String) -> String {
    match url.strip_prefix("postgres://") {
        Some(rest) => format!("postgresql://{rest}"),
        None => url,
    }
}

/// Database connection holder.
#[cfg(feature = "postgres")]
pub struct DatabaseConnections {
    pub main: DbConn,
}

#[cfg(not(feature = "postgres"))]
pub struct DatabaseConnections;

#[cfg(feature = "postgres")]
impl DatabaseConnections {
    /// Open the connection pool.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false)
            .to_owned();

        let main = Database::connect(opts).await?;
        tracing::info!(pool = config.max_connections, "Database connected");

        Ok(Self { main })
    }

    /// Round-trip a trivial statement to confirm the database answers.
    pub async fn ping(&self) -> bool {
        match self.main.execute_unprepared("SELECT 1").await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "Database ping failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_scheme_is_rewritten() {
        assert_eq!(
            normalize_url("postgres://u:p@localhost/inbrief".to_string()),
            "postgresql://u:p@localhost/inbrief"
        );
        assert_eq!(
            normalize_url("postgresql://u:p@localhost/inbrief".to_string()),
            "postgresql://u:p@localhost/inbrief"
        );
    }
}
