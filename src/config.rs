use std::{
    env,
    fmt::{Debug, Display},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use tracing::{info, warn};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub session_file: PathBuf,
    pub cart_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(10),
            session_file: PathBuf::from(".foodiego-session.json"),
            cart_buffer: 32,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_url: try_load(&lookup, "FOODIEGO_API_URL", defaults.api_url),
            timeout: Duration::from_secs(try_load(
                &lookup,
                "FOODIEGO_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )),
            session_file: try_load(&lookup, "FOODIEGO_SESSION_FILE", defaults.session_file),
            cart_buffer: try_load(&lookup, "FOODIEGO_CART_BUFFER", defaults.cart_buffer).max(1),
        }
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Debug,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default:?}");
        return default;
    };
    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value: {e}, using default: {default:?}");
        default
    })
}
