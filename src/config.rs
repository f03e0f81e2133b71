use std::env;
use std::fmt;

/// Which of the deployment profiles the server runs under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    Development,
    Production,
    Testing,
}

impl Profile {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Some(Profile::Development),
            "production" | "prod" => Some(Profile::Production),
            "testing" | "test" => Some(Profile::Testing),
            _ => None,
        }
    }

    /// Whether executed SQL should be echoed at info level.
    pub fn echo_sql(self) -> bool {
        self == Profile::Development
    }

    pub fn secure_cookies(self) -> bool {
        self == Profile::Production
    }
}

/// Longest session a token may be issued for: one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug)]
pub struct ConfigError(String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_address: String,
    pub session_ttl_hours: i64,
    pub profile: Profile,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so it can be exercised
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| ConfigError("DATABASE_URL must be set".to_string()))?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| ConfigError("JWT_SECRET must be set".to_string()))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError("JWT_SECRET cannot be empty".to_string()));
        }

        let bind_address =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1:8080".to_string());

        let session_ttl_hours = match lookup("SESSION_TTL_HOURS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|hours| (1..=MAX_SESSION_TTL_HOURS).contains(hours))
                .ok_or_else(|| {
                    ConfigError(format!(
                        "SESSION_TTL_HOURS must be between 1 and {MAX_SESSION_TTL_HOURS}, got {raw:?}"
                    ))
                })?,
            None => 24,
        };

        let profile = match lookup("APP_CONFIG") {
            Some(raw) => Profile::parse(&raw)
                .ok_or_else(|| ConfigError(format!("unknown APP_CONFIG {raw:?}")))?,
            None => Profile::Development,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_address,
            session_ttl_hours,
            profile,
        })
    }
}
