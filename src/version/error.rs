use thiserror::Error;

use crate::version::family::VendorOptionFamily;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version string: {0:?}")]
    InvalidVersion(String),

    #[error("Unknown vendor option family: {0}")]
    UnknownFamily(String),

    #[error("Version family {found} does not match range family {expected}")]
    MismatchedFamily {
        expected: VendorOptionFamily,
        found: VendorOptionFamily,
    },

    #[error("Minimum version {minimum} is greater than maximum version {maximum}")]
    InvertedRange { minimum: String, maximum: String },

    #[error("Malformed encoding: {0:?}")]
    MalformedEncoding(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid catalogue entry: {0}")]
    Catalogue(#[from] VersionError),
}
