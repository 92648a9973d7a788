//! GitHub-backed directory resolver.
//!
//! Talks to the REST API with a short per-call timeout so one slow lookup
//! cannot stall the whole fetch. Pagination follows the `Link` header.

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::core::constants;
use crate::core::directory::remote::{Page, Resolver, TeamRef};
use crate::core::directory::Member;
use crate::core::types::{Login, TeamName};
use crate::error::{ConfigError, DirectoryError};

#[derive(Debug, Clone)]
pub struct GitHub {
    client: reqwest::Client,
    base_url: String,
    org: String,
}

impl GitHub {
    /// Build a resolver for `org` authenticated by `token`.
    ///
    /// # Errors
    ///
    /// Fails when the token cannot be used as a header value or the HTTP
    /// client cannot be constructed.
    pub fn new(org: &str, base_url: &str, token: &str) -> crate::error::Result<Self> {
        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("token {token}")).map_err(|_| {
            ConfigError::InvalidValue {
                field: "github_token",
                reason: "not usable as a header value".to_string(),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = reqwest::Client::builder()
            .user_agent(concat!("deaddrop/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(constants::REMOTE_TIMEOUT)
            .build()
            .map_err(DirectoryError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            org: org.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DirectoryError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).send().await?;
        let resp = check(resp, &url)?;
        Ok(resp.json().await?)
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
    ) -> Result<Page<T>, DirectoryError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("per_page", constants::PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?;
        let resp = check(resp, &url)?;

        let next = next_page(resp.headers());
        let items = resp.json().await?;
        Ok(Page { items, next })
    }
}

fn check(resp: reqwest::Response, url: &str) -> Result<reqwest::Response, DirectoryError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Err(DirectoryError::Unauthorized {
            status: status.as_u16(),
        })
    } else if !status.is_success() {
        Err(DirectoryError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        })
    } else {
        Ok(resp)
    }
}

/// Page index advertised by the `Link` header's `rel="next"` entry.
fn next_page(headers: &header::HeaderMap) -> Option<u32> {
    let link = headers.get(header::LINK)?.to_str().ok()?;
    for part in link.split(',') {
        let mut sections = part.split(';');
        let url = match sections.next() {
            Some(url) => url.trim().trim_start_matches('<').trim_end_matches('>'),
            None => continue,
        };
        if !sections.any(|param| param.trim() == r#"rel="next""#) {
            continue;
        }
        let query = match url.split_once('?') {
            Some((_, query)) => query,
            None => continue,
        };
        for pair in query.split('&') {
            if let Some(page) = pair.strip_prefix("page=") {
                return page.parse().ok();
            }
        }
    }
    None
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    login: Login,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TeamRecord {
    id: u64,
    name: TeamName,
    #[serde(default)]
    organization: Option<OrgRecord>,
}

#[derive(Debug, Deserialize)]
struct OrgRecord {
    login: String,
}

#[async_trait]
impl Resolver for GitHub {
    async fn authenticated_login(&self) -> Result<Login, DirectoryError> {
        let user: UserRecord = self.get_json("/user").await?;
        debug!(login = %user.login, "resolved authenticated login");
        Ok(user.login)
    }

    async fn member(&self, login: &str) -> Result<Member, DirectoryError> {
        let user: UserRecord = self.get_json(&format!("/users/{login}")).await?;
        Ok(Member {
            login: user.login,
            name: user.name.unwrap_or_default(),
        })
    }

    async fn member_page(&self, page: u32) -> Result<Page<Login>, DirectoryError> {
        let batch: Page<UserRecord> = self
            .get_page(&format!("/orgs/{}/members", self.org), page)
            .await?;
        Ok(Page {
            items: batch.items.into_iter().map(|u| u.login).collect(),
            next: batch.next,
        })
    }

    async fn team_page(&self, page: u32) -> Result<Page<TeamRef>, DirectoryError> {
        let batch: Page<TeamRecord> = self
            .get_page(&format!("/orgs/{}/teams", self.org), page)
            .await?;
        Ok(Page {
            items: batch
                .items
                .into_iter()
                .map(|t| TeamRef {
                    id: t.id,
                    name: t.name,
                })
                .collect(),
            next: batch.next,
        })
    }

    async fn team_roster(&self, team: &TeamRef) -> Result<Vec<Login>, DirectoryError> {
        let mut logins = Vec::new();
        let mut page = 1;
        loop {
            let batch: Page<UserRecord> = self
                .get_page(&format!("/teams/{}/members", team.id), page)
                .await?;
            logins.extend(batch.items.into_iter().map(|u| u.login));
            match batch.next {
                Some(next) => page = next,
                None => return Ok(logins),
            }
        }
    }

    // The service only reports memberships for the authenticated identity,
    // so the login is implied by the credentials.
    async fn memberships(&self, _login: &str) -> Result<Vec<TeamName>, DirectoryError> {
        let mut names = Vec::new();
        let mut page = 1;
        loop {
            let batch: Page<TeamRecord> = self.get_page("/user/teams", page).await?;
            names.extend(
                batch
                    .items
                    .into_iter()
                    .filter(|t| {
                        t.organization
                            .as_ref()
                            .map(|o| o.login == self.org)
                            .unwrap_or(false)
                    })
                    .map(|t| t.name),
            );
            match batch.next {
                Some(next) => page = next,
                None => return Ok(names),
            }
        }
    }
}
