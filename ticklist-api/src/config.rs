/// Configuration management for the API server
///
/// Configuration is loaded from environment variables (with a `.env` file
/// honored in development via dotenvy). The only required variables are
/// `DATABASE_URL` and `JWT_SECRET`; everything else has a sensible default.

use anyhow::{bail, Context, Result};
use std::env;
use ticklist_shared::auth::password::{HashCost, PasswordPolicy};
use ticklist_shared::db::pool::DatabaseConfig;

/// Complete API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins ("*" for any)
    pub cors_origins: Vec<String>,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret used to sign and verify tokens
    pub secret: String,

    /// Password strength requirements applied at registration
    pub password_policy: PasswordPolicy,

    /// Argon2 cost parameters for password hashing
    pub hash_cost: HashCost,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` or `JWT_SECRET` is missing, if
    /// `JWT_SECRET` is shorter than 32 bytes, or if a numeric variable
    /// fails to parse.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development convenience)
        dotenvy::dotenv().ok();

        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("API_PORT must be a valid port number")?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a number")?;

        let secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.len() < 32 {
            bail!("JWT_SECRET must be at least 32 characters");
        }

        let policy_defaults = PasswordPolicy::default();
        let password_policy = PasswordPolicy {
            min_length: parse_env("PASSWORD_MIN_LENGTH", policy_defaults.min_length)?,
            require_upper: parse_env("PASSWORD_REQUIRE_UPPER", policy_defaults.require_upper)?,
            require_lower: parse_env("PASSWORD_REQUIRE_LOWER", policy_defaults.require_lower)?,
            require_digit: parse_env("PASSWORD_REQUIRE_DIGIT", policy_defaults.require_digit)?,
            require_special: parse_env("PASSWORD_REQUIRE_SPECIAL", policy_defaults.require_special)?,
        };

        let cost_defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_env("HASH_MEMORY_KIB", cost_defaults.memory_kib)?,
            iterations: parse_env("HASH_ITERATIONS", cost_defaults.iterations)?,
            parallelism: parse_env("HASH_PARALLELISM", cost_defaults.parallelism)?,
        };

        Ok(Config {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                ..Default::default()
            },
            auth: AuthConfig {
                secret,
                password_policy,
                hash_cost,
            },
        })
    }

    /// Returns the socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value", name)),
        Err(_) => Ok(default),
    }
}
