use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: String },

    #[error("{field} must be finite")]
    NotFinite { field: &'static str },

    #[error("{field} is too large: {value}")]
    OutOfRange { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown key {key:?} in [{table}]")]
    UnknownKey { table: &'static str, key: String },

    #[error("invalid weight {name}: {reason}")]
    InvalidWeight { name: String, reason: String },

    #[error("invalid tier table: {0}")]
    InvalidTierTable(String),
}
