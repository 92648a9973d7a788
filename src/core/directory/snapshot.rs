//! Directory records and the queries the rest of the tool runs on them.

use serde::{Deserialize, Serialize};

use crate::core::types::{Login, TeamName};

/// Basic information about an organization member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique login handle.
    pub login: Login,
    /// Display name; empty when the member has not set one.
    #[serde(default)]
    pub name: String,
}

/// A team and its full member roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: TeamName,
    /// Roster logins in the order the directory reports them.
    #[serde(default)]
    pub members: Vec<Login>,
}

/// Members and teams matching a directory search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matches {
    pub members: Vec<Member>,
    pub teams: Vec<Team>,
}

/// A consistent view of one organization at a point in time.
///
/// Collections are sorted on construction so two snapshots built from the
/// same remote state compare equal regardless of fetch interleaving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    org: String,
    members: Vec<Member>,
    teams: Vec<Team>,
    active_member_teams: Vec<TeamName>,
}

impl Snapshot {
    pub fn new(
        org: impl Into<String>,
        mut members: Vec<Member>,
        mut teams: Vec<Team>,
        mut active_member_teams: Vec<TeamName>,
    ) -> Self {
        members.sort_by(|a, b| a.login.cmp(&b.login));
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        active_member_teams.sort();

        Self {
            org: org.into(),
            members,
            teams,
            active_member_teams,
        }
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    /// All members, sorted by login.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// All teams, sorted by name.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Names of the teams the authenticated member belongs to.
    pub fn active_member_teams(&self) -> &[TeamName] {
        &self.active_member_teams
    }

    /// Members and teams matching `query`.
    ///
    /// Matching is a case-insensitive substring test against member logins,
    /// member display names, and team names. The literal query `*` matches
    /// everything. Results keep the snapshot's sorted order.
    pub fn matches(&self, query: &str) -> Matches {
        if query == "*" {
            return Matches {
                members: self.members.clone(),
                teams: self.teams.clone(),
            };
        }

        let needle = query.to_lowercase();
        Matches {
            members: self
                .members
                .iter()
                .filter(|m| {
                    m.login.to_lowercase().contains(&needle)
                        || m.name.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect(),
            teams: self
                .teams
                .iter()
                .filter(|t| t.name.to_lowercase().contains(&needle))
                .cloned()
                .collect(),
        }
    }

    /// Canonical login for `lookup` if it names a member, compared
    /// case-insensitively.
    pub fn is_member(&self, lookup: &str) -> Option<&str> {
        let needle = lookup.to_lowercase();
        self.members
            .iter()
            .find(|m| m.login.to_lowercase() == needle)
            .map(|m| m.login.as_str())
    }

    /// Canonical name for `lookup` if it names a team, compared
    /// case-insensitively.
    pub fn is_team(&self, lookup: &str) -> Option<&str> {
        let needle = lookup.to_lowercase();
        self.teams
            .iter()
            .find(|t| t.name.to_lowercase() == needle)
            .map(|t| t.name.as_str())
    }

    /// Roster of the named team, compared case-insensitively.
    ///
    /// An unknown team yields an empty roster.
    pub fn team_members(&self, name: &str) -> &[Login] {
        let needle = name.to_lowercase();
        self.teams
            .iter()
            .find(|t| t.name.to_lowercase() == needle)
            .map(|t| t.members.as_slice())
            .unwrap_or(&[])
    }
}
