//! Seam between the fetch engine and the remote directory service.

use async_trait::async_trait;

use crate::core::directory::Member;
use crate::core::types::{Login, TeamName};
use crate::error::DirectoryError;

/// One page of results plus the index of the next page, if any.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<u32>,
}

/// A reference to a team, enough to fetch its roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRef {
    pub id: u64,
    pub name: TeamName,
}

/// Remote directory operations the fetch engine is built on.
///
/// Page-returning methods hand back one page at a time so the engine
/// controls pacing; roster and membership lookups are exhaustive because
/// callers always need the full answer. Tests substitute their own
/// implementation.
#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    /// Login of the identity the credentials belong to.
    async fn authenticated_login(&self) -> Result<Login, DirectoryError>;

    /// Full record for one member.
    async fn member(&self, login: &str) -> Result<Member, DirectoryError>;

    /// One page of organization member logins.
    async fn member_page(&self, page: u32) -> Result<Page<Login>, DirectoryError>;

    /// One page of organization teams.
    async fn team_page(&self, page: u32) -> Result<Page<TeamRef>, DirectoryError>;

    /// Every login on the team's roster.
    async fn team_roster(&self, team: &TeamRef) -> Result<Vec<Login>, DirectoryError>;

    /// Names of this organization's teams the login belongs to.
    async fn memberships(&self, login: &str) -> Result<Vec<TeamName>, DirectoryError>;
}
