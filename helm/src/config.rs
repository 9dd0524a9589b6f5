use std::env;
use std::path::PathBuf;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

/// Strip trailing slashes so endpoint paths can be appended verbatim.
fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub services: ServicesConfig,
    pub session: SessionConfig,
    pub query: QueryConfig,
    pub feed: FeedConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone)]
pub struct ServicesConfig {
    pub users_base_url: String,
    pub discussions_base_url: String,
    pub request_timeout_secs: u64,
    /// Clear the session and redirect to `/login` when a request comes back 401.
    pub logout_on_unauthorized: bool,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub cache_size: usize,
}

/// Paging and windowing parameters for the feed
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub page_size: usize,
    pub estimated_row_height: u32,
    pub overscan: usize,
    pub viewport_height: u32,
    pub page_delay_ms: u64,
    /// Total number of synthetic posts before the feed reports its end.
    pub max_posts: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub ttl_secs: i64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            estimated_row_height: 200,
            overscan: 5,
            viewport_height: 800,
            page_delay_ms: 500,
            max_posts: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            services: ServicesConfig {
                users_base_url: normalize_base_url(
                    env::var("HELM_USERS_SERVICE_API_BASE_URL")
                        .unwrap_or_else(|_| "http://localhost:8081".to_string()),
                ),
                discussions_base_url: normalize_base_url(
                    env::var("HELM_DISCUSSIONS_SERVICE_API_BASE_URL")
                        .unwrap_or_else(|_| "http://localhost:8082".to_string()),
                ),
                request_timeout_secs: parse_env_or("HELM_REQUEST_TIMEOUT", 30),
                logout_on_unauthorized: parse_env_or("HELM_LOGOUT_ON_UNAUTHORIZED", false),
            },
            session: SessionConfig {
                path: env::var("HELM_SESSION_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(".helm").join("session")),
            },
            query: QueryConfig {
                cache_size: parse_env_or("HELM_QUERY_CACHE_SIZE", 256),
            },
            feed: FeedConfig {
                page_size: parse_env_or("HELM_FEED_PAGE_SIZE", 10),
                estimated_row_height: parse_env_or("HELM_FEED_ROW_HEIGHT", 200),
                overscan: parse_env_or("HELM_FEED_OVERSCAN", 5),
                viewport_height: parse_env_or("HELM_FEED_VIEWPORT", 800),
                page_delay_ms: parse_env_or("HELM_FEED_PAGE_DELAY_MS", 500),
                max_posts: parse_env_opt("HELM_FEED_MAX_POSTS"),
            },
            notifications: NotificationConfig {
                ttl_secs: parse_env_or("HELM_NOTIFICATION_TTL", 4),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Config pointing both services at one base URL, used against a single mock server.
    pub fn for_base_url(base_url: &str) -> Self {
        let mut config = Self::default();
        config.services.users_base_url = normalize_base_url(base_url.to_string());
        config.services.discussions_base_url = normalize_base_url(base_url.to_string());
        config.services.logout_on_unauthorized = false;
        config.feed.page_delay_ms = 0;
        config
    }
}
