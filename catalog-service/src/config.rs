use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    // sqlite | memory
    pub backend_type: String,
    pub database_url: String,
    pub reading_budget: Duration,
    pub reading_min_delay: Duration,
    pub reading_max_delay: Duration,
    pub max_batch_size: usize,
    // 0 disables the cap
    pub max_concurrent_readings: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 7010,
            backend_type: "sqlite".to_string(),
            database_url: "sqlite://books.db?mode=rwc".to_string(),
            reading_budget: Duration::from_millis(5000),
            reading_min_delay: Duration::from_millis(1000),
            reading_max_delay: Duration::from_millis(7000),
            max_batch_size: 256,
            max_concurrent_readings: 64,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_millis(key: &str) -> Option<Duration> {
    env_parse::<u64>(key).map(Duration::from_millis)
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            port: env_parse("PORT").unwrap_or(default.port),
            backend_type: std::env::var("BACKEND_TYPE").unwrap_or(default.backend_type),
            database_url: std::env::var("DATABASE_URL").unwrap_or(default.database_url),
            reading_budget: env_millis("READING_BUDGET_MS").unwrap_or(default.reading_budget),
            reading_min_delay: env_millis("READING_MIN_DELAY_MS")
                .unwrap_or(default.reading_min_delay),
            reading_max_delay: env_millis("READING_MAX_DELAY_MS")
                .unwrap_or(default.reading_max_delay),
            max_batch_size: env_parse("MAX_BATCH_SIZE").unwrap_or(default.max_batch_size),
            max_concurrent_readings: env_parse("MAX_CONCURRENT_READINGS")
                .unwrap_or(default.max_concurrent_readings),
        }
    }
}
