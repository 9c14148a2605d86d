use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Config error: {0}")]
    Config(#[from] av_config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] av_db::DbError),

    #[error("Logger setup failed: {message}")]
    Logger { message: String },

    #[error("No hardware driver available; set device.mock = true")]
    UnsupportedDevice,
}

pub type Result<T> = std::result::Result<T, ServerError>;
