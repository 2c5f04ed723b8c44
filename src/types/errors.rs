use std::fmt;

// === CookieError ===

/// Errors raised by a cookie jar backend.
#[derive(Debug)]
pub enum CookieError {
    /// The cookie name is empty or contains reserved characters.
    InvalidName(String),
    /// The cookie value contains characters that cannot be stored in a cookie.
    InvalidValue(String),
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for CookieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookieError::InvalidName(name) => write!(f, "Invalid cookie name: {}", name),
            CookieError::InvalidValue(msg) => write!(f, "Invalid cookie value: {}", msg),
            CookieError::DatabaseError(msg) => write!(f, "Cookie database error: {}", msg),
        }
    }
}

impl std::error::Error for CookieError {}

impl From<rusqlite::Error> for CookieError {
    fn from(e: rusqlite::Error) -> Self {
        CookieError::DatabaseError(e.to_string())
    }
}

// === CodecError ===

/// Errors related to encoding or decoding the persisted history blob.
#[derive(Debug)]
pub enum CodecError {
    /// The blob is not valid base64 after reversing the cookie-safe substitution.
    Base64(String),
    /// The decoded bytes are not valid UTF-8.
    Utf8(String),
    /// The decoded text is not a valid JSON history collection.
    Json(String),
    /// A percent-escaped field could not be unescaped.
    Escape(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Base64(msg) => write!(f, "History base64 error: {}", msg),
            CodecError::Utf8(msg) => write!(f, "History UTF-8 error: {}", msg),
            CodecError::Json(msg) => write!(f, "History JSON error: {}", msg),
            CodecError::Escape(msg) => write!(f, "History field escape error: {}", msg),
        }
    }
}

impl std::error::Error for CodecError {}

// === ConfigError ===

/// Errors related to loading or validating the history configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading the config file.
    IoError(String),
    /// Failed to parse the config file.
    SerializationError(String),
    /// A config value is out of range.
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "Config I/O error: {}", msg),
            ConfigError::SerializationError(msg) => {
                write!(f, "Config serialization error: {}", msg)
            }
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
