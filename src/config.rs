//! Runtime configuration, read from the environment (and `.env` in debug builds).

use std::{env, str::FromStr, time::Duration};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const PLATFORM_API_URL: &str = "http://localhost:8000/api";
const PLATFORM_TIMEOUT_SECS: u64 = 10;
const DRAFT_SAVE_DEBOUNCE_MS: u64 = 500;
const WHATSAPP_NUMBER: &str = "919876543210";
const SESSION_IDLE_TIMEOUT_SECS: u64 = 30 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL of the tourism platform's REST API.
    pub platform_api_url: String,
    pub platform_timeout: Duration,
    /// Drafts are kept in memory unless this is set.
    pub mongodb_uri: Option<String>,
    pub draft_save_debounce: Duration,
    /// Number guests message to confirm hybrid bookings.
    pub whatsapp_number: String,
    /// Wizards untouched for this long are dropped; their drafts stay saved.
    pub session_idle_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| HOST.to_string()),
            port: parse_var("PORT", PORT),
            platform_api_url: env::var("PLATFORM_API_URL")
                .unwrap_or_else(|_| PLATFORM_API_URL.to_string()),
            platform_timeout: Duration::from_secs(parse_var(
                "PLATFORM_TIMEOUT_SECS",
                PLATFORM_TIMEOUT_SECS,
            )),
            mongodb_uri: env::var("MONGODB_URI").ok().filter(|uri| !uri.is_empty()),
            draft_save_debounce: Duration::from_millis(parse_var(
                "DRAFT_SAVE_DEBOUNCE_MS",
                DRAFT_SAVE_DEBOUNCE_MS,
            )),
            whatsapp_number: env::var("WHATSAPP_NUMBER")
                .unwrap_or_else(|_| WHATSAPP_NUMBER.to_string()),
            session_idle_timeout: Duration::from_secs(parse_var(
                "SESSION_IDLE_TIMEOUT_SECS",
                SESSION_IDLE_TIMEOUT_SECS,
            )),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            platform_api_url: PLATFORM_API_URL.to_string(),
            platform_timeout: Duration::from_secs(PLATFORM_TIMEOUT_SECS),
            mongodb_uri: None,
            draft_save_debounce: Duration::from_millis(DRAFT_SAVE_DEBOUNCE_MS),
            whatsapp_number: WHATSAPP_NUMBER.to_string(),
            session_idle_timeout: Duration::from_secs(SESSION_IDLE_TIMEOUT_SECS),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}
