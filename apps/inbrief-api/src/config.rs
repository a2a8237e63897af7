//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use chrono::TimeDelta;
use chrono_tz::Tz;

use inbrief_core::domain::EditWindow;
use inbrief_infra::database::DatabaseConfig;
use inbrief_infra::{CloudinaryConfig, DirectoryConfig, RateLimitConfig};

#[cfg(feature = "redis")]
use inbrief_infra::RedisConfig;

const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_SESSION_TTL_HOURS: u64 = 12;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    #[cfg(feature = "redis")]
    pub redis: Option<RedisConfig>,
    pub cloudinary: Option<CloudinaryConfig>,
    pub directory: Option<DirectoryConfig>,
    pub login_rate_limit: RateLimitConfig,
    /// Seed for the admin allow-list
    pub allowed_admin_ids: Vec<String>,
    pub edit_window: EditWindow,
    pub session_ttl: Duration,
    /// Only used to render the `date` field of public posts
    pub display_tz: Tz,
    pub max_image_bytes: usize,
    /// Mark the session cookie `Secure` (HTTPS only)
    pub secure_cookies: bool,
    /// Key the login limiter on `X-Forwarded-For` (only behind a trusted proxy)
    pub trust_forwarded_for: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database: DatabaseConfig::from_env(),
            #[cfg(feature = "redis")]
            redis: RedisConfig::from_env(),
            cloudinary: CloudinaryConfig::from_env(),
            directory: DirectoryConfig::from_env(),
            login_rate_limit: RateLimitConfig::from_env(),
            allowed_admin_ids: env::var("ALLOWED_ADMIN_IDS")
                .map(|raw| parse_id_list(&raw))
                .unwrap_or_default(),
            edit_window: edit_window(parse_var("EDIT_WINDOW_HOURS")),
            session_ttl: session_ttl(parse_var("SESSION_TTL_HOURS")),
            display_tz: env::var("DISPLAY_TIMEZONE")
                .ok()
                .and_then(|name| match name.parse::<Tz>() {
                    Ok(tz) => Some(tz),
                    Err(e) => {
                        tracing::warn!(timezone = %name, error = %e, "Unknown DISPLAY_TIMEZONE");
                        None
                    }
                })
                .unwrap_or(chrono_tz::Asia::Kolkata),
            max_image_bytes: parse_var("MAX_IMAGE_BYTES").unwrap_or(DEFAULT_MAX_IMAGE_BYTES),
            secure_cookies: parse_flag("SESSION_COOKIE_SECURE"),
            trust_forwarded_for: parse_flag("TRUST_FORWARDED_FOR"),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

fn parse_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

/// Positive hour counts only; anything out of range keeps the default.
fn edit_window(hours: Option<i64>) -> EditWindow {
    hours
        .filter(|h| *h > 0)
        .and_then(TimeDelta::try_hours)
        .map(EditWindow::new)
        .unwrap_or_default()
}

fn session_ttl(hours: Option<u64>) -> Duration {
    let hours = hours.filter(|h| *h > 0).unwrap_or(DEFAULT_SESSION_TTL_HOURS);
    hours
        .checked_mul(60 * 60)
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(DEFAULT_SESSION_TTL_HOURS * 60 * 60))
}

/// Comma-separated ids, blanks dropped.
fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        assert_eq!(
            parse_id_list("9025857, 9025676,,9023422 "),
            vec!["9025857", "9025676", "9023422"]
        );
        assert!(parse_id_list(" ").is_empty());
    }

    #[test]
    fn test_edit_window_hours() {
        assert_eq!(edit_window(Some(48)).length(), TimeDelta::hours(48));
        assert_eq!(edit_window(None), EditWindow::default());
        assert_eq!(edit_window(Some(0)), EditWindow::default());
        assert_eq!(edit_window(Some(i64::MAX)), EditWindow::default());
    }

    #[test]
    fn test_session_ttl_hours() {
        assert_eq!(session_ttl(Some(2)), Duration::from_secs(7200));
        assert_eq!(session_ttl(None), Duration::from_secs(12 * 3600));
        assert_eq!(session_ttl(Some(u64::MAX)), Duration::from_secs(12 * 3600));
    }
}
