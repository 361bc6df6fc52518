use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MongoDB,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StorageBackend::MongoDB),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub jwt: JwtSettings,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
    pub admin_seed: Option<AdminSeed>,
}

const DEFAULT_JWT_SECRET: &str = "default-secret-change-me";

/// One year
const MAX_TTL_HOURS: i64 = 24 * 365;

impl Config {
    /// Reads the process environment (call `dotenv()` first to pick up `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let storage = parse::<StorageBackend>("STORAGE", &var("STORAGE", "mongodb"))?;
        let database_url = lookup("DATABASE_URL");
        if storage == StorageBackend::MongoDB && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let jwt = JwtSettings {
            secret: var("JWT_SECRET", DEFAULT_JWT_SECRET),
            issuer: var("JWT_ISSUER", "complaint-service"),
            audience: var("JWT_AUDIENCE", "complaint-api"),
            ttl_hours: parse("JWT_TTL_HOURS", &var("JWT_TTL_HOURS", "24"))?,
        };
        if !(1..=MAX_TTL_HOURS).contains(&jwt.ttl_hours) {
            return Err(ConfigError::Invalid {
                name: "JWT_TTL_HOURS",
                value: jwt.ttl_hours.to_string(),
            });
        }

        let bcrypt_cost: u32 = parse("BCRYPT_COST", &var("BCRYPT_COST", "12"))?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let cors_origins = var("CORS_ORIGINS", "http://localhost:5173,http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let admin_seed = match (
            lookup("ADMIN_USERNAME"),
            lookup("ADMIN_EMAIL"),
            lookup("ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(email), Some(password)) => Some(AdminSeed {
                name: var("ADMIN_NAME", "Administrator"),
                username,
                email,
                password,
            }),
            _ => None,
        };

        Ok(Config {
            host: var("HOST", "0.0.0.0"),
            port: parse("PORT", &var("PORT", "5000"))?,
            storage,
            database_url,
            jwt,
            bcrypt_cost,
            cors_origins,
            admin_seed,
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt.secret == DEFAULT_JWT_SECRET
    }
}

fn parse<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_memory_storage() {
        let cfg = config(&[("STORAGE", "memory")]).unwrap();
        assert_eq!(cfg.storage, StorageBackend::Memory);
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.jwt.ttl_hours, 24);
        assert!(cfg.uses_default_secret());
        assert!(cfg.admin_seed.is_none());
        assert_eq!(cfg.cors_origins.len(), 2);
    }

    #[test]
    fn test_mongodb_requires_database_url() {
        assert!(matches!(config(&[]), Err(ConfigError::Missing("DATABASE_URL"))));
        assert!(config(&[("DATABASE_URL", "mongodb://localhost/complaints")]).is_ok());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = config(&[("STORAGE", "memory"), ("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));

        let err = config(&[("STORAGE", "memory"), ("BCRYPT_COST", "2")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "BCRYPT_COST", .. }));

        assert!(config(&[("STORAGE", "sqlite")]).is_err());
    }

    #[test]
    fn test_token_lifetime_is_bounded() {
        for ttl in ["0", "-5", "8761", "10000000000"] {
            let err = config(&[("STORAGE", "memory"), ("JWT_TTL_HOURS", ttl)]).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: "JWT_TTL_HOURS", .. }), "{}", ttl);
        }

        let cfg = config(&[("STORAGE", "memory"), ("JWT_TTL_HOURS", "8760")]).unwrap();
        assert_eq!(cfg.jwt.ttl_hours, 8760);
    }

    #[test]
    fn test_admin_seed_needs_all_fields() {
        let cfg = config(&[
            ("STORAGE", "memory"),
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_EMAIL", "admin@example.com"),
        ])
        .unwrap();
        assert!(cfg.admin_seed.is_none());

        let cfg = config(&[
            ("STORAGE", "memory"),
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_EMAIL", "admin@example.com"),
            ("ADMIN_PASSWORD", "changeme"),
        ])
        .unwrap();
        assert_eq!(cfg.admin_seed.unwrap().name, "Administrator");
    }
}
