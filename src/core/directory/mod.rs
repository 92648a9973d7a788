//! Organization directory: who exists, which teams they form, and which
//! teams the active identity belongs to.
//!
//! [`Directory::connect`] serves a cached snapshot when every record is
//! fresh, otherwise it refetches the whole directory and rewrites the
//! cache. Queries are answered from the in-memory snapshot and never touch
//! the network.

mod cache;
mod fetch;
mod github;
mod remote;
mod snapshot;

pub use github::GitHub;
pub use remote::{Page, Resolver, TeamRef};
pub use snapshot::{Matches, Member, Snapshot, Team};

use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use cache::{Record, SnapshotCache};

use crate::core::config::Settings;
use crate::core::types::{Login, TeamName};
use crate::error::{DirectoryError, Result};

/// Synchronous handle over one organization's directory.
///
/// Owns the runtime its network calls run on, so callers stay blocking
/// code end to end.
pub struct Directory {
    snapshot: Snapshot,
    resolver: Arc<dyn Resolver>,
    runtime: tokio::runtime::Runtime,
    active: OnceLock<Login>,
}

impl Directory {
    /// Open the directory for the configured organization.
    ///
    /// # Errors
    ///
    /// Fails when credentials are rejected, the service is unreachable, or
    /// a refetched snapshot cannot be assembled. A cache that cannot be
    /// written is only a warning; the snapshot still serves this run.
    pub fn connect(settings: &Settings) -> Result<Self> {
        let resolver = GitHub::new(&settings.org, &settings.api_url, &settings.github_token)?;
        Self::connect_with(settings, Arc::new(resolver))
    }

    /// [`connect`](Self::connect) with a caller-supplied resolver.
    pub fn connect_with(settings: &Settings, resolver: Arc<dyn Resolver>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let cache = SnapshotCache::with_ttl(&settings.cache_dir, settings.cache_ttl);
        let active = OnceLock::new();

        let mut snapshot = None;
        if !settings.refresh && !cache.any_stale() {
            match load_cached(&cache, &settings.org) {
                Ok(cached) => {
                    debug!("serving directory from cache");
                    snapshot = Some(cached);
                }
                Err(e) => warn!(error = %e, "discarding unreadable directory cache"),
            }
        }

        let snapshot = match snapshot {
            Some(snapshot) => snapshot,
            None => {
                let (snapshot, login) =
                    runtime.block_on(fetch_snapshot(&resolver, &settings.org))?;
                if let Err(e) = persist(&cache, &snapshot) {
                    warn!(error = %e, "snapshot fetched but not cached; next run will refetch");
                }
                let _ = active.set(login);
                snapshot
            }
        };

        Ok(Self {
            snapshot,
            resolver,
            runtime,
            active,
        })
    }

    /// Organization this directory describes.
    pub fn org(&self) -> &str {
        self.snapshot.org()
    }

    /// Every member, sorted by login.
    pub fn members(&self) -> &[Member] {
        self.snapshot.members()
    }

    /// Every team with its roster, sorted by name.
    pub fn teams(&self) -> &[Team] {
        self.snapshot.teams()
    }

    /// Members and teams matching `query`; `"*"` matches everything.
    pub fn matches(&self, query: &str) -> Matches {
        self.snapshot.matches(query)
    }

    /// Canonical login when `lookup` names a member, ignoring case.
    pub fn is_member(&self, lookup: &str) -> Option<&str> {
        self.snapshot.is_member(lookup)
    }

    /// Canonical team name when `lookup` names a team, ignoring case.
    pub fn is_team(&self, lookup: &str) -> Option<&str> {
        self.snapshot.is_team(lookup)
    }

    /// Roster of `name`, or empty when the team is unknown.
    pub fn team_members(&self, name: &str) -> &[Login] {
        self.snapshot.team_members(name)
    }

    /// Teams the active identity belongs to, sorted by name.
    pub fn active_member_teams(&self) -> &[TeamName] {
        self.snapshot.active_member_teams()
    }

    /// Login of the identity behind the configured credentials.
    ///
    /// Resolved during a refetch as a side effect; on a pure cache hit the
    /// first call asks the service directly.
    ///
    /// # Errors
    ///
    /// Fails when the lookup is needed and the service rejects it.
    pub fn whoami(&self) -> Result<Login> {
        if let Some(login) = self.active.get() {
            return Ok(login.clone());
        }
        let login = self.runtime.block_on(self.resolver.authenticated_login())?;
        let _ = self.active.set(login.clone());
        Ok(login)
    }
}

async fn fetch_snapshot(
    resolver: &Arc<dyn Resolver>,
    org: &str,
) -> std::result::Result<(Snapshot, Login), DirectoryError> {
    let login = resolver.authenticated_login().await?;
    let ((members, active_teams), teams) = tokio::try_join!(
        fetch::fetch_members(resolver, &login),
        fetch::fetch_teams(resolver),
    )?;
    Ok((Snapshot::new(org, members, teams, active_teams), login))
}

fn load_cached(cache: &SnapshotCache, org: &str) -> Result<Snapshot> {
    let members: Vec<Member> = cache.load(Record::Members)?;
    let teams: Vec<Team> = cache.load(Record::Teams)?;
    let memberships: Vec<TeamName> = cache.load(Record::Memberships)?;
    Ok(Snapshot::new(org, members, teams, memberships))
}

fn persist(cache: &SnapshotCache, snapshot: &Snapshot) -> Result<()> {
    cache.save(Record::Members, snapshot.members())?;
    cache.save(Record::Teams, snapshot.teams())?;
    cache.save(Record::Memberships, snapshot.active_member_teams())
}
