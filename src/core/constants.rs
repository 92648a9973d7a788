//! Constants used throughout deaddrop.
//!
//! Centralizes magic strings and tuning values.

use std::time::Duration;

/// Configuration directory relative to HOME (~/.deaddrop).
pub const CONFIG_DIR: &str = ".deaddrop";

/// Optional configuration file inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Snapshot cache directory relative to HOME (~/.deaddrop/cache).
pub const CACHE_DIR: &str = ".deaddrop/cache";

/// How long cached directory records stay fresh.
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Number of concurrent identity lookups during a directory fetch.
pub const FETCH_WORKERS: usize = 10;

/// Capacity of the fetch pipeline channels.
pub const FETCH_QUEUE: usize = 32;

/// Per-call timeout for remote directory requests.
pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(2);

/// Overall timeout for storage service requests.
pub const STORAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Items requested per page from the directory service.
pub const PAGE_SIZE: u32 = 100;

/// Base URL of the directory API.
pub const DIRECTORY_API: &str = "https://api.github.com";

/// Keyspace prefix for stored secrets, relative to the storage mount root.
pub const SECRET_PREFIX: &str = "secret/deaddrop";

/// Field under which the payload is stored in a secret record.
pub const SECRET_FIELD: &str = "secret";

/// Prefix for generated policy and role names.
pub const POLICY_PREFIX: &str = "deaddrop";
