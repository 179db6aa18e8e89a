use std::collections::HashMap;
use std::net::IpAddr;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind_addr: IpAddr,
    pub max_share_code_len: usize,
    /// Upper bound on funding rounds accepted in one request.
    pub max_rounds: usize,
    pub cors_allow_any: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            bind_addr: IpAddr::from([127, 0, 0, 1]),
            max_share_code_len: 200_000,
            max_rounds: 500,
            cors_allow_any: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let bind_addr = env_map
            .get("BIND_ADDR")
            .map(|s| s.as_str())
            .unwrap_or("127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "BIND_ADDR".to_string(),
                    "must be an IPv4 or IPv6 address".to_string(),
                )
            })?;

        let max_share_code_len = env_map
            .get("MAX_SHARE_CODE_LEN")
            .map(|s| s.as_str())
            .unwrap_or("200000")
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "MAX_SHARE_CODE_LEN".to_string(),
                    "must be a non-negative integer".to_string(),
                )
            })?;

        let max_rounds = env_map
            .get("MAX_ROUNDS")
            .map(|s| s.as_str())
            .unwrap_or("500")
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "MAX_ROUNDS".to_string(),
                    "must be a non-negative integer".to_string(),
                )
            })?;

        let cors_allow_any = match env_map
            .get("CORS_ALLOW_ANY")
            .map(|s| s.as_str())
            .unwrap_or("true")
        {
            "true" => true,
            "false" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "CORS_ALLOW_ANY".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        Ok(Config {
            port,
            bind_addr,
            max_share_code_len,
            max_rounds,
            cors_allow_any,
        })
    }
}
