//! Runtime settings read from the environment.
//!
//! Every value has a default suited to a local development backend, so an
//! empty environment gives a working client against `http://localhost:8000`.

use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const USER_AGENT: &str = concat!("landhub/", env!("CARGO_PKG_VERSION"));

/// Top-level client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the plot API, without trailing slash
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// How long ordered-plot status stays fresh
    pub order_cache_ttl: Duration,
    pub map: MapConfig,
}

/// Map view tuning
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Total load attempts before the view gives up
    pub load_attempts: u32,
    /// Backoff unit; attempt `n` waits `n` units before retrying
    pub load_backoff: Duration,
    /// Labels are hidden below this zoom level
    pub label_min_zoom: f64,
    pub label_batch_size: usize,
    pub hover_debounce: Duration,
    pub zoom_debounce: Duration,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            load_attempts: 3,
            load_backoff: Duration::from_secs(2),
            label_min_zoom: 15.0,
            label_batch_size: 50,
            hover_debounce: Duration::from_millis(50),
            zoom_debounce: Duration::from_millis(300),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            user_agent: USER_AGENT.to_string(),
            order_cache_ttl: Duration::from_secs(30),
            map: MapConfig::default(),
        }
    }
}

impl Config {
    /// Read `LANDHUB_*` variables, falling back to defaults for anything
    /// missing or unparsable.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        let map_defaults = MapConfig::default();

        let api_base_url = std::env::var("LANDHUB_API_URL")
            .ok()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);

        let map = MapConfig {
            load_attempts: env_parse::<u32>("LANDHUB_LOAD_ATTEMPTS")
                .unwrap_or(map_defaults.load_attempts)
                .max(1),
            load_backoff: env_parse::<f64>("LANDHUB_LOAD_BACKOFF_S")
                .and_then(secs)
                .unwrap_or(map_defaults.load_backoff),
            label_min_zoom: env_parse("LANDHUB_LABEL_MIN_ZOOM").unwrap_or(map_defaults.label_min_zoom),
            label_batch_size: env_parse::<usize>("LANDHUB_LABEL_BATCH_SIZE")
                .unwrap_or(map_defaults.label_batch_size)
                .max(1),
            ..map_defaults
        };

        Self {
            api_base_url,
            request_timeout: env_parse::<f64>("LANDHUB_REQUEST_TIMEOUT_S")
                .and_then(secs)
                .unwrap_or(defaults.request_timeout),
            user_agent: defaults.user_agent,
            order_cache_ttl: env_parse::<f64>("LANDHUB_ORDER_CACHE_TTL_S")
                .and_then(secs)
                .unwrap_or(defaults.order_cache_ttl),
            map,
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", name, raw);
            None
        }
    }
}

fn secs(value: f64) -> Option<Duration> {
    match Duration::try_from_secs_f64(value) {
        Ok(duration) => Some(duration),
        Err(err) => {
            warn!("Ignoring duration of {} seconds: {}", value, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_backend() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.order_cache_ttl, Duration::from_secs(30));
        assert_eq!(config.map.load_attempts, 3);
        assert_eq!(config.map.label_batch_size, 50);
    }

    #[test]
    fn negative_seconds_are_rejected() {
        assert_eq!(secs(-1.0), None);
        assert_eq!(secs(f64::NAN), None);
        assert_eq!(secs(1.5), Some(Duration::from_millis(1500)));
        assert_eq!(secs(1e20), None);
        assert_eq!(secs(f64::INFINITY), None);
    }

    // The only test in this crate that touches LANDHUB_* variables.
    #[test]
    fn from_env_reads_overrides_and_ignores_bad_values() {
        let vars = [
            ("LANDHUB_API_URL", " http://plots.example:9000/ "),
            ("LANDHUB_ORDER_CACHE_TTL_S", "1e20"),
            ("LANDHUB_REQUEST_TIMEOUT_S", "2.5"),
            ("LANDHUB_LOAD_ATTEMPTS", "0"),
            ("LANDHUB_LOAD_BACKOFF_S", "soon"),
            ("LANDHUB_LABEL_MIN_ZOOM", "14"),
            ("LANDHUB_LABEL_BATCH_SIZE", "25"),
        ];
        for (name, value) in vars {
            std::env::set_var(name, value);
        }

        let config = Config::from_env();

        for (name, _) in vars {
            std::env::remove_var(name);
        }

        assert_eq!(config.api_base_url, "http://plots.example:9000");
        assert_eq!(config.order_cache_ttl, Duration::from_secs(30));
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.map.load_attempts, 1);
        assert_eq!(config.map.load_backoff, Duration::from_secs(2));
        assert_eq!(config.map.label_min_zoom, 14.0);
        assert_eq!(config.map.label_batch_size, 25);
    }
}
