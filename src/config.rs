use std::env;

/// Fallback signing key for session tokens when `SECRET_KEY` is unset.
pub const DEFAULT_SECRET_KEY: &str = "vocab-portal-local-development-secret";

const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/";
const DEFAULT_MONGODB_DATABASE: &str = "Vocabulary-finnish";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
/// Longest accepted session lifetime: one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 8760;

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup and
/// immutable afterwards; handlers reach it through `FromRef` on the application state.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // MongoDB connection string.
    pub mongodb_uri: String,
    // Name of the database holding the vocabulary, categories and users collections.
    pub mongodb_database: String,
    // HMAC key used to sign and verify session cookies.
    pub secret_key: String,
    // Socket address the HTTP server binds to.
    pub bind_address: String,
    // Lifetime of a login session.
    pub session_ttl_hours: i64,
    // Runtime environment marker. Controls the log output format.
    pub env: Env,
}

/// Env
///
/// Defines the runtime context. Local development logs human-readable output;
/// production logs JSON lines for aggregation.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Same values `load()` would produce with an empty environment. Used for test
    /// state scaffolding without touching process environment variables.
    fn default() -> Self {
        Self {
            mongodb_uri: DEFAULT_MONGODB_URI.to_string(),
            mongodb_database: DEFAULT_MONGODB_DATABASE.to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads every parameter from the environment. Nothing is mandatory: each unset
    /// variable falls back to its local-development default, as does a session
    /// lifetime that is unparsable or outside 1..=8760 hours.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let session_ttl_hours = env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|hours| (1..=MAX_SESSION_TTL_HOURS).contains(hours))
            .unwrap_or(DEFAULT_SESSION_TTL_HOURS);

        Self {
            mongodb_uri: var_or("MONGODB_URI", DEFAULT_MONGODB_URI),
            mongodb_database: var_or("MONGODB_DATABASE", DEFAULT_MONGODB_DATABASE),
            secret_key: var_or("SECRET_KEY", DEFAULT_SECRET_KEY),
            bind_address: var_or("BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            session_ttl_hours,
            env,
        }
    }

    /// True when sessions are signed with the built-in development key.
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}
