mod api_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod session_config;
mod stores_config;

#[cfg(test)]
mod tests;

pub use api_config::ApiConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use session_config::SessionConfig;
pub use stores_config::StoresConfig;

const CONFIG_DIR_ENV: &str = "FT_CONFIG_DIR";
const CONFIG_DIR_NAME: &str = ".fittribe";
const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TOKEN_FILE: &str = "token";
const DEFAULT_CLEAR_ON_LOGOUT: bool = true;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_COLORED: bool = true;
