//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono_tz::Tz;

use inbrief_core::ports::{
    AdminAllowList, Cache, Clock, DirectoryError, DirectoryService, EmployeeRecord, ImageStore,
    PostRepository, RateLimiter, SystemClock,
};
use inbrief_core::{AccessService, PostService};
use inbrief_infra::{
    CloudinaryImageStore, InMemoryAllowList, InMemoryCache, InMemoryImageStore,
    InMemoryPostRepository, InMemoryRateLimiter, SuccessFactorsDirectory,
};

#[cfg(feature = "postgres")]
use inbrief_infra::database::{DatabaseConnections, PostgresAllowList, PostgresPostRepository};

#[cfg(feature = "redis")]
use inbrief_infra::RedisCache;

use crate::config::AppConfig;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub access: Arc<AccessService>,
    pub login_limiter: Arc<dyn RateLimiter>,
    pub display_tz: Tz,
    pub max_image_bytes: usize,
    pub secure_cookies: bool,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

/// Directory stand-in used when SuccessFactors credentials are missing.
///
/// Every lookup fails, so logins are refused rather than waved through.
pub struct DirectoryUnavailable;

#[async_trait]
impl DirectoryService for DirectoryUnavailable {
    async fn find_employee(
        &self,
        _employee_id: &str,
    ) -> Result<Option<EmployeeRecord>, DirectoryError> {
        tracing::warn!("Employee directory not configured - lookup refused");
        Err(DirectoryError::Transport(
            "Employee directory not configured".to_string(),
        ))
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let sessions = Self::session_cache(config).await?;
        let images = Self::image_store(config);
        let directory = Self::directory(config);

        #[cfg(feature = "postgres")]
        let (db, posts, allow_list) = Self::storage(config).await;

        #[cfg(not(feature = "postgres"))]
        let (posts, allow_list): (Arc<dyn PostRepository>, Arc<dyn AdminAllowList>) = {
            tracing::info!("Running without postgres feature - using in-memory storage");
            (
                Arc::new(InMemoryPostRepository::new()),
                Arc::new(InMemoryAllowList::new(config.allowed_admin_ids.clone())),
            )
        };

        if config.allowed_admin_ids.is_empty() {
            tracing::warn!("ALLOWED_ADMIN_IDS is empty - only stored admins can sign in");
        }

        let posts = Arc::new(PostService::new(
            posts,
            images,
            clock.clone(),
            config.edit_window,
        ));
        let access = Arc::new(AccessService::new(
            directory,
            allow_list,
            sessions,
            clock,
            config.session_ttl,
        ));

        tracing::info!(
            edit_window_hours = config.edit_window.length().num_hours(),
            session_ttl_secs = config.session_ttl.as_secs(),
            display_tz = %config.display_tz,
            "Application state initialized"
        );

        Ok(Self {
            posts,
            access,
            login_limiter: Arc::new(InMemoryRateLimiter::new(config.login_rate_limit.clone())),
            display_tz: config.display_tz,
            max_image_bytes: config.max_image_bytes,
            secure_cookies: config.secure_cookies,
            #[cfg(feature = "postgres")]
            db,
        })
    }

    /// Whether posts live in PostgreSQL, and whether it answers.
    pub async fn database_status(&self) -> (&'static str, bool) {
        #[cfg(feature = "postgres")]
        {
            if let Some(db) = &self.db {
                return ("postgres", db.ping().await);
            }
        }
        ("memory", false)
    }

    async fn session_cache(config: &AppConfig) -> std::io::Result<Arc<dyn Cache>> {
        #[cfg(feature = "redis")]
        {
            if let Some(redis) = &config.redis {
                match RedisCache::new(redis).await {
                    Ok(cache) => return Ok(Arc::new(cache)),
                    Err(e) if redis.fallback_to_memory => {
                        tracing::error!(
                            error = %e,
                            "Failed to connect to Redis. Using in-memory sessions."
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to connect to Redis");
                        return Err(std::io::Error::other(e.to_string()));
                    }
                }
            }
        }

        #[cfg(not(feature = "redis"))]
        let _ = config;

        tracing::info!("Using in-memory session cache");
        let cache = Arc::new(InMemoryCache::new());
        cache.spawn_purge_task(SESSION_PURGE_INTERVAL);
        Ok(cache)
    }

    fn image_store(config: &AppConfig) -> Arc<dyn ImageStore> {
        match config.cloudinary.clone().map(CloudinaryImageStore::new) {
            Some(Ok(store)) => Arc::new(store),
            Some(Err(e)) => {
                tracing::error!(error = %e, "Cloudinary client failed. Using in-memory images.");
                Arc::new(InMemoryImageStore::new())
            }
            None => {
                tracing::warn!("Cloudinary not configured. Images are kept in memory.");
                Arc::new(InMemoryImageStore::new())
            }
        }
    }

    fn directory(config: &AppConfig) -> Arc<dyn DirectoryService> {
        match config.directory.clone().map(SuccessFactorsDirectory::new) {
            Some(Ok(directory)) => Arc::new(directory),
            Some(Err(e)) => {
                tracing::error!(error = %e, "Directory client failed. Logins are disabled.");
                Arc::new(DirectoryUnavailable)
            }
            None => {
                tracing::warn!("SAP_API_USERNAME/SAP_API_PASSWORD not set. Logins are disabled.");
                Arc::new(DirectoryUnavailable)
            }
        }
    }

    #[cfg(feature = "postgres")]
    async fn storage(
        config: &AppConfig,
    ) -> (
        Option<Arc<DatabaseConnections>>,
        Arc<dyn PostRepository>,
        Arc<dyn AdminAllowList>,
    ) {
        let in_memory = || -> (Arc<dyn PostRepository>, Arc<dyn AdminAllowList>) {
            (
                Arc::new(InMemoryPostRepository::new()),
                Arc::new(InMemoryAllowList::new(config.allowed_admin_ids.clone())),
            )
        };

        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            let (posts, allow_list) = in_memory();
            return (None, posts, allow_list);
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                let conn = Arc::new(connections);
                let allow_list = PostgresAllowList::new(conn.main.clone());
                if let Err(e) = allow_list.seed(&config.allowed_admin_ids).await {
                    tracing::error!(error = %e, "Failed to seed admin allow-list");
                }
                let posts = Arc::new(PostgresPostRepository::new(conn.main.clone()));
                (Some(conn), posts, Arc::new(allow_list))
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Failed to connect to database. Using in-memory fallback."
                );
                let (posts, allow_list) = in_memory();
                (None, posts, allow_list)
            }
        }
    }
}
