//! Error types shared across the crate.
//!
//! Each layer has its own enum; [`Error`] wraps them so callers can match on
//! the failing layer without losing the specific cause.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to read secret file {}: {source}", path.display())]
    ReadSecretFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings resolution and config file problems.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required setting: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("could not determine home directory")]
    NoHomeDir,
}

/// Failures talking to or interpreting the remote directory.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("directory request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("directory service rejected credentials (status {status})")]
    Unauthorized { status: u16 },

    #[error("directory service returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed directory response: {reason}")]
    Malformed { reason: String },

    #[error("unknown member or team: {0}")]
    UnknownRecipient(String),

    #[error("fetch worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("fetch pipeline closed before all results were collected")]
    PipelineClosed,
}

/// Local snapshot cache problems.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache miss: {name}")]
    Miss { name: &'static str },

    #[error("failed to read cache file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write cache file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed cache file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode cache record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures against the secret storage service.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage service rejected credentials (status {status})")]
    Unauthorized { status: u16 },

    #[error("storage service returned {status} for {path}")]
    Status { status: u16, path: String },

    #[error("secret not found: {path}")]
    NotFound { path: String },

    #[error("malformed storage response: {reason}")]
    Malformed { reason: String },

    #[error("role file {}: {source}", path.display())]
    Role {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
