use std::env;
use std::time::Duration;

use crate::models::user::NameLengthPolicy;

pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com/users";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://usuarios_dashboard.db";

#[derive(Debug, Clone)]
pub struct Config {
	pub host: String,
	pub port: u16,
	pub api_url: String,
	pub database_url: String,
	pub fetch_timeout_secs: u64,
	pub refresh_ttl_secs: u64,
	pub max_pool_size: u32,
	pub name_length_policy: NameLengthPolicy,
}

impl Config {
	/// Reads the process configuration, honouring a `.env` file if present.
	pub fn from_env() -> Result<Self, ConfigError> {
		let _ = dotenvy::dotenv();

		Ok(Self {
			host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
			port: env::var("PORT")
				.unwrap_or_else(|_| "8080".to_string())
				.parse()
				.map_err(|_| ConfigError::InvalidPort)?,
			api_url: env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
			database_url: env::var("DATABASE_URL")
				.unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
			fetch_timeout_secs: parse_var("FETCH_TIMEOUT_SECS", 20)?,
			refresh_ttl_secs: parse_var("REFRESH_TTL_SECS", 3600)?,
			max_pool_size: parse_var("MAX_POOL_SIZE", 5)?,
			name_length_policy: match env::var("NAME_LENGTH_POLICY") {
				Ok(value) => value
					.parse()
					.map_err(|_| ConfigError::InvalidValue("NAME_LENGTH_POLICY", value))?,
				Err(_) => NameLengthPolicy::default(),
			},
		})
	}

	pub fn server_addr(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}

	pub fn fetch_timeout(&self) -> Duration {
		Duration::from_secs(self.fetch_timeout_secs)
	}

	pub fn refresh_ttl(&self) -> Duration {
		Duration::from_secs(self.refresh_ttl_secs)
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: 8080,
			api_url: DEFAULT_API_URL.to_string(),
			database_url: DEFAULT_DATABASE_URL.to_string(),
			fetch_timeout_secs: 20,
			refresh_ttl_secs: 3600,
			max_pool_size: 5,
			name_length_policy: NameLengthPolicy::default(),
		}
	}
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
	match env::var(name) {
		Ok(value) => value
			.parse()
			.map_err(|_| ConfigError::InvalidValue(name, value)),
		Err(_) => Ok(default),
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("Invalid port number")]
	InvalidPort,
	#[error("Invalid value for {0}: {1}")]
	InvalidValue(&'static str, String),
}
