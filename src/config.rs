use std::time::Duration;

use crate::transcript::ProviderConfig;

pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://tubescript-ten.vercel.app";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration, resolved once at startup and injected into the
/// router state. Handlers never touch the process environment, so tests can
/// build a `Config` directly.
#[derive(Debug, Clone)]
pub struct Config {
    /// RapidAPI key. Optional at startup so a misconfigured deploy answers
    /// requests with a structured 500 instead of refusing to boot.
    pub rapidapi_key: Option<String>,
    pub allowed_origin: String,
    pub upstream_timeout: Duration,
    pub provider: ProviderConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let mut provider = ProviderConfig::default();
        if let Some(host) = env("RAPIDAPI_HOST") {
            provider.base_url = format!("https://{host}");
            provider.host_header = host;
        }

        let timeout_secs = env("UPSTREAM_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);

        Config {
            rapidapi_key: env("RAPIDAPI_KEY"),
            allowed_origin: env("ALLOWED_ORIGIN")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string()),
            upstream_timeout: Duration::from_secs(timeout_secs),
            provider,
        }
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
