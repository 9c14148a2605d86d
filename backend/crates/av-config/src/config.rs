use crate::{
    AuditConfig, AuthConfig, ConfigError, ConfigErrorResult, DatabaseConfig, DeviceConfig,
    LoggingConfig, PollingConfig, ServerConfig, WebSocketConfig,
};

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;
use serde::Deserialize;

const CONFIG_DIR_ENV: &str = "AV_CONFIG_DIR";
const CONFIG_DIR_NAME: &str = ".av";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub websocket: WebSocketConfig,
    pub polling: PollingConfig,
    pub audit: AuditConfig,
    pub device: DeviceConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for AV_CONFIG_DIR env var, else use ./.av/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply AV_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: AV_CONFIG_DIR env var > ./.av/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::environment("Cannot determine current working directory"))?;
        Ok(cwd.join(CONFIG_DIR_NAME))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.auth.validate()?;
        self.websocket.validate()?;
        self.polling.validate()?;
        self.audit.validate()?;

        let db_path = Path::new(&self.database.path);
        if db_path.is_absolute() || self.database.path.contains("..") {
            return Err(ConfigError::database(
                "database.path must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Get absolute path to database file.
    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join(&self.database.path))
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_secs)
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);
        info!("  database: {}", self.database.path);
        info!(
            "  auth: {}",
            if self.auth.enabled {
                "token (HS256)"
            } else {
                "disabled (identity from query)"
            }
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
        info!(
            "  websocket: mailbox={}, ping={}s, pong={}s, write={}s, max_message={}B",
            self.websocket.mailbox_capacity,
            self.websocket.ping_interval_secs,
            self.websocket.pong_timeout_secs,
            self.websocket.write_timeout_secs,
            self.websocket.max_message_size
        );
        info!(
            "  polling: {} every {}s",
            if self.polling.enabled { "enabled" } else { "disabled" },
            self.polling.interval_secs
        );
        info!(
            "  audit: queue={}, batch={}, flush={}ms, grace={}ms",
            self.audit.queue_capacity,
            self.audit.batch_size,
            self.audit.flush_interval_ms,
            self.audit.shutdown_grace_ms
        );
        info!(
            "  device: {}",
            if self.device.mock { "mock" } else { "hardware" }
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("AV_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("AV_SERVER_PORT", &mut self.server.port);

        // Database
        Self::apply_env_string("AV_DATABASE_PATH", &mut self.database.path);

        // Auth
        Self::apply_env_bool("AV_AUTH_ENABLED", &mut self.auth.enabled);
        Self::apply_env_option_string("AV_AUTH_JWT_SECRET", &mut self.auth.jwt_secret);

        // Logging
        Self::apply_env_parse("AV_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("AV_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("AV_LOG_FILE", &mut self.logging.file);

        // WebSocket
        Self::apply_env_parse(
            "AV_WS_MAILBOX_CAPACITY",
            &mut self.websocket.mailbox_capacity,
        );
        Self::apply_env_parse(
            "AV_WS_PING_INTERVAL_SECS",
            &mut self.websocket.ping_interval_secs,
        );
        Self::apply_env_parse(
            "AV_WS_PONG_TIMEOUT_SECS",
            &mut self.websocket.pong_timeout_secs,
        );
        Self::apply_env_parse(
            "AV_WS_WRITE_TIMEOUT_SECS",
            &mut self.websocket.write_timeout_secs,
        );
        Self::apply_env_parse(
            "AV_WS_MAX_MESSAGE_SIZE",
            &mut self.websocket.max_message_size,
        );

        // Polling
        Self::apply_env_bool("AV_POLL_ENABLED", &mut self.polling.enabled);
        Self::apply_env_parse("AV_POLL_INTERVAL_SECS", &mut self.polling.interval_secs);

        // Audit
        Self::apply_env_parse(
            "AV_AUDIT_QUEUE_CAPACITY",
            &mut self.audit.queue_capacity,
        );
        Self::apply_env_parse("AV_AUDIT_BATCH_SIZE", &mut self.audit.batch_size);
        Self::apply_env_parse(
            "AV_AUDIT_FLUSH_INTERVAL_MS",
            &mut self.audit.flush_interval_ms,
        );
        Self::apply_env_parse(
            "AV_AUDIT_SHUTDOWN_GRACE_MS",
            &mut self.audit.shutdown_grace_ms,
        );

        // Device
        Self::apply_env_bool("AV_DEVICE_MOCK", &mut self.device.mock);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
