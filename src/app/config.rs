use clap::Parser;
use std::time::Duration;
use url::Url;

/// Consecutive failures in `closed` that trip a breaker.
pub const FAILURE_THRESHOLD: u32 = 5;
/// Minimum time a breaker stays open before a probe is let through.
pub const RESET_TIMEOUT: Duration = Duration::from_secs(30);
pub const WORKER_COUNT: usize = 100;
pub const QUEUE_CAPACITY: usize = 10_000;
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
/// Upper bound on the `/internal-summary` call to the peer instance.
pub const PEER_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Parser)]
#[command(name = "api", about = "Payment intake gateway with primary/fallback processors")]
pub struct Config {
    #[arg(long, env = "APP_PORT", default_value_t = 8080)]
    pub app_port: u16,

    /// SQLite file for processed payments. Without it records live in memory.
    #[arg(long, env = "DB_PATH")]
    pub db_path: Option<String>,

    #[arg(
        long,
        env = "PAYMENT_PROCESSOR_URL_DEFAULT",
        default_value = "http://payment-processor-default:8080"
    )]
    pub default_processor_url: Url,

    #[arg(
        long,
        env = "PAYMENT_PROCESSOR_URL_FALLBACK",
        default_value = "http://payment-processor-fallback:8080"
    )]
    pub fallback_processor_url: Url,

    /// Sibling instance queried for `/payments-summary`.
    #[arg(long, env = "PEER_URL")]
    pub peer_url: Option<Url>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::parse()
    }

    pub fn default_base_url(&self) -> String {
        base_url(&self.default_processor_url)
    }

    pub fn fallback_base_url(&self) -> String {
        base_url(&self.fallback_processor_url)
    }

    pub fn peer_base_url(&self) -> Option<String> {
        self.peer_url.as_ref().map(base_url)
    }
}

/// `Url` always renders a root path; paths are appended as `<base>/payments`.
pub fn base_url(url: &Url) -> String {
    url.as_str().trim_end_matches('/').to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerConfig {
    pub failure_threshold: u32,
    pub reset_timeout: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: FAILURE_THRESHOLD,
            reset_timeout: RESET_TIMEOUT,
        }
    }
}
