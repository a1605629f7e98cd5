use services::services::user::DEMO_USER_ID;
use thiserror::Error;
use uuid::Uuid;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite://taskboard.db?mode=rwc";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Attribute requests without an `X-User-Id` header to the demo user.
    pub allow_demo_user: bool,
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            allow_demo_user: true,
            cors_permissive: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("BACKEND_PORT").or_else(|| get("PORT")) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "BACKEND_PORT",
                value: raw,
            })?,
            None => defaults.port,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            allow_demo_user: parse_flag("ALLOW_DEMO_USER", get("ALLOW_DEMO_USER"))?
                .unwrap_or(defaults.allow_demo_user),
            cors_permissive: parse_flag("CORS_PERMISSIVE", get("CORS_PERMISSIVE"))?
                .unwrap_or(defaults.cors_permissive),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Identity used for requests that present none.
    pub fn demo_fallback(&self) -> Option<Uuid> {
        self.allow_demo_user.then_some(DEMO_USER_ID)
    }
}

fn parse_flag(key: &'static str, raw: Option<String>) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}
