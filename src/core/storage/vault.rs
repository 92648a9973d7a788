//! Vault-backed secret store.
//!
//! Speaks the KV v1 HTTP API directly: reads and deletes take the full
//! storage path, writes fan one payload out to every target's drop space.

use std::collections::BTreeSet;

use reqwest::{header, StatusCode};
use serde::Deserialize;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::config::Settings;
use crate::core::constants;
use crate::core::storage::secret_path;
use crate::error::{ConfigError, Result, StorageError};

/// Synchronous handle on the secret store.
///
/// Owns a small runtime so callers stay blocking code, matching how the
/// directory handle works.
pub struct VaultStore {
    client: reqwest::Client,
    addr: String,
    runtime: tokio::runtime::Runtime,
}

impl VaultStore {
    /// Connect using the configured address and token.
    ///
    /// # Errors
    ///
    /// Fails when either setting is missing or the client cannot be built.
    /// No request is made until a secret operation runs.
    pub fn connect(settings: &Settings) -> Result<Self> {
        let addr = settings
            .vault_addr
            .as_deref()
            .ok_or(ConfigError::MissingField {
                field: "vault_addr",
            })?;
        let token = settings
            .vault_token
            .as_deref()
            .ok_or(ConfigError::MissingField {
                field: "vault_token",
            })?;

        let mut headers = header::HeaderMap::new();
        let mut auth =
            header::HeaderValue::from_str(token).map_err(|_| ConfigError::InvalidValue {
                field: "vault_token",
                reason: "not usable as a header value".to_string(),
            })?;
        auth.set_sensitive(true);
        headers.insert("X-Vault-Token", auth);

        let client = reqwest::Client::builder()
            .user_agent(concat!("deaddrop/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(constants::STORAGE_TIMEOUT)
            .build()
            .map_err(StorageError::Http)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            client,
            addr: addr.trim_end_matches('/').to_string(),
            runtime,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.addr, path.trim_start_matches('/'))
    }

    /// Read the secret stored at `path`.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] when nothing is stored there, or
    /// [`StorageError::Malformed`] when the payload lacks the secret field.
    pub fn read(&self, path: &str) -> Result<Zeroizing<String>> {
        let url = self.url(path);
        let body: SecretResponse = self.runtime.block_on(async {
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(StorageError::Http)?;
            if resp.status() == StatusCode::NOT_FOUND {
                return Err(StorageError::NotFound {
                    path: path.to_string(),
                });
            }
            let resp = check(resp, path)?;
            resp.json().await.map_err(StorageError::Http)
        })?;

        match body
            .data
            .get(constants::SECRET_FIELD)
            .and_then(|value| value.as_str())
        {
            Some(secret) => Ok(Zeroizing::new(secret.to_string())),
            None => Err(StorageError::Malformed {
                reason: format!("payload has no {} field", constants::SECRET_FIELD),
            }
            .into()),
        }
    }

    /// Drop one payload under `name` for every target entity.
    ///
    /// Targets are written in order; the first failure aborts the rest.
    pub fn write(&self, name: &str, payload: &str, targets: &BTreeSet<String>) -> Result<()> {
        let mut body = serde_json::Map::new();
        body.insert(
            constants::SECRET_FIELD.to_string(),
            serde_json::Value::String(payload.to_string()),
        );

        self.runtime.block_on(async {
            for target in targets {
                let path = secret_path(target, name);
                let resp = self
                    .client
                    .put(self.url(&path))
                    .json(&body)
                    .send()
                    .await
                    .map_err(StorageError::Http)?;
                check(resp, &path)?;
                debug!(target = %target, name = %name, "secret dropped");
            }
            Ok::<_, StorageError>(())
        })?;
        Ok(())
    }

    /// Names of the secrets currently dropped for `entity`.
    ///
    /// An entity with no drop space yet lists as empty rather than failing.
    pub fn list(&self, entity: &str) -> Result<Vec<String>> {
        let path = format!("{}/{}", constants::SECRET_PREFIX, entity);
        let url = self.url(&path);
        let keys = self.runtime.block_on(async {
            let resp = self
                .client
                .get(&url)
                .query(&[("list", "true")])
                .send()
                .await
                .map_err(StorageError::Http)?;
            if resp.status() == StatusCode::NOT_FOUND {
                return Ok(Vec::new());
            }
            let resp = check(resp, &path)?;
            let body: ListResponse = resp.json().await.map_err(StorageError::Http)?;
            Ok(body.data.keys)
        })?;
        Ok(keys)
    }

    /// Remove the secret stored at `path`.
    pub fn delete(&self, path: &str) -> Result<()> {
        self.runtime.block_on(async {
            let resp = self
                .client
                .delete(self.url(path))
                .send()
                .await
                .map_err(StorageError::Http)?;
            check(resp, path)?;
            Ok::<_, StorageError>(())
        })?;
        debug!(path = %path, "secret deleted");
        Ok(())
    }
}

fn check(
    resp: reqwest::Response,
    path: &str,
) -> std::result::Result<reqwest::Response, StorageError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Err(StorageError::Unauthorized {
            status: status.as_u16(),
        })
    } else if !status.is_success() {
        Err(StorageError::Status {
            status: status.as_u16(),
            path: path.to_string(),
        })
    } else {
        Ok(resp)
    }
}

#[derive(Debug, Deserialize)]
struct SecretResponse {
    data: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: ListKeys,
}

#[derive(Debug, Deserialize)]
struct ListKeys {
    #[serde(default)]
    keys: Vec<String>,
}
