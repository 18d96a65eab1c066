use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub publishing: PublishingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the air-quality API, e.g. "http://localhost:8000".
    pub base_url: String,
    /// Upper bound for each fetch; must not exceed poll.interval_ms.
    /// When omitted: 10 s, or the poll interval if that is shorter.
    #[serde(default)]
    fetch_timeout_ms: Option<u64>,
}

const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

impl BackendConfig {
    pub fn fetch_timeout_ms(&self) -> u64 {
        self.fetch_timeout_ms.unwrap_or(DEFAULT_FETCH_TIMEOUT_MS)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// How often to log poll stats (cycles, failures, discarded results) at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

fn default_interval_ms() -> u64 {
    30_000
}

fn default_stats_log_interval_secs() -> u64 {
    300
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Ping interval for /ws/view clients.
    #[serde(default = "default_ws_ping_interval_secs")]
    pub ws_ping_interval_secs: u64,
}

fn default_ws_ping_interval_secs() -> u64 {
    30
}

impl Default for PublishingConfig {
    fn default() -> Self {
        Self {
            ws_ping_interval_secs: default_ws_ping_interval_secs(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let mut config: AppConfig = toml::from_str(s)?;
        config
            .backend
            .fetch_timeout_ms
            .get_or_insert(DEFAULT_FETCH_TIMEOUT_MS.min(config.poll.interval_ms));
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        let base_url = self.backend.base_url.trim();
        anyhow::ensure!(!base_url.is_empty(), "backend.base_url must be non-empty");
        anyhow::ensure!(
            base_url.starts_with("http://") || base_url.starts_with("https://"),
            "backend.base_url must start with http:// or https://, got {}",
            base_url
        );
        anyhow::ensure!(
            self.poll.interval_ms > 0,
            "poll.interval_ms must be > 0, got {}",
            self.poll.interval_ms
        );
        let fetch_timeout_ms = self.backend.fetch_timeout_ms();
        anyhow::ensure!(
            fetch_timeout_ms > 0,
            "backend.fetch_timeout_ms must be > 0, got {}",
            fetch_timeout_ms
        );
        anyhow::ensure!(
            fetch_timeout_ms <= self.poll.interval_ms,
            "backend.fetch_timeout_ms ({}) must not exceed poll.interval_ms ({})",
            fetch_timeout_ms,
            self.poll.interval_ms
        );
        anyhow::ensure!(
            self.poll.stats_log_interval_secs > 0,
            "poll.stats_log_interval_secs must be > 0, got {}",
            self.poll.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.publishing.ws_ping_interval_secs > 0,
            "publishing.ws_ping_interval_secs must be > 0, got {}",
            self.publishing.ws_ping_interval_secs
        );
        Ok(())
    }
}
