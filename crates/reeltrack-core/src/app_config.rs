use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Local hour (0-23) at which the daily poll runs.
    pub daily_run_hour: u32,
    pub enable_internal_scheduler: bool,
    pub manual_poll_enabled: bool,
    pub cron_secret: Option<String>,
    pub apify_token: Option<String>,
    pub apify_actor_id: String,
    pub apify_base_url: String,
    pub apify_timeout_secs: u64,
    pub apify_max_concurrent_runs: usize,
    pub poll_batch_size: usize,
    /// Total provider attempts per post, including the first.
    pub fetch_retry_count: u32,
}

impl AppConfig {
    /// Concurrency used inside one poll batch.
    #[must_use]
    pub fn poll_concurrency(&self) -> usize {
        self.apify_max_concurrent_runs.min(self.poll_batch_size).max(1)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("daily_run_hour", &self.daily_run_hour)
            .field("enable_internal_scheduler", &self.enable_internal_scheduler)
            .field("manual_poll_enabled", &self.manual_poll_enabled)
            .field(
                "cron_secret",
                &self.cron_secret.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "apify_token",
                &self.apify_token.as_ref().map(|_| "[redacted]"),
            )
            .field("apify_actor_id", &self.apify_actor_id)
            .field("apify_base_url", &self.apify_base_url)
            .field("apify_timeout_secs", &self.apify_timeout_secs)
            .field("apify_max_concurrent_runs", &self.apify_max_concurrent_runs)
            .field("poll_batch_size", &self.poll_batch_size)
            .field("fetch_retry_count", &self.fetch_retry_count)
            .finish()
    }
}
