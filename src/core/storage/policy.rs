//! Access policy and role file generation.
//!
//! Writes the general drop policy plus one HCL policy per entity, and
//! keeps the auth backend's role files in sync by appending missing role
//! names. Role files that already carry a role are left untouched, so the
//! generator can run repeatedly as the organization grows.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants;
use crate::core::directory::{Member, Team};
use crate::error::{Result, StorageError};

/// Where generated files land and which team spans the organization.
#[derive(Debug, Clone)]
pub struct PolicyOptions {
    /// Directory receiving the `.hcl` policy files.
    pub policy_dir: PathBuf,
    /// Directory receiving `users/` and `teams/` role files.
    pub role_dir: PathBuf,
    /// Team every member belongs to; its role grants the drop policy.
    pub default_team: String,
}

/// Auth-backend role mapping: comma-separated policy names.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RoleFile {
    #[serde(default)]
    value: String,
}

/// Generate policies and role files for every member and team.
///
/// # Errors
///
/// Fails when a directory cannot be created, a file cannot be written, or
/// an existing role file does not parse.
pub fn generate_policies(
    options: &PolicyOptions,
    members: &[Member],
    teams: &[Team],
) -> Result<()> {
    let users_dir = options.role_dir.join("users");
    let teams_dir = options.role_dir.join("teams");
    fs::create_dir_all(&options.policy_dir)?;
    fs::create_dir_all(&users_dir)?;
    fs::create_dir_all(&teams_dir)?;

    let general = options
        .policy_dir
        .join(format!("{}.hcl", constants::POLICY_PREFIX));
    fs::write(general, general_policy())?;
    append_role(
        &teams_dir.join(format!("{}.json", options.default_team)),
        constants::POLICY_PREFIX,
    )?;

    for member in members {
        write_entity(&options.policy_dir, &users_dir, &member.login)?;
    }
    for team in teams {
        write_entity(&options.policy_dir, &teams_dir, &team.name)?;
    }

    debug!(
        members = members.len(),
        teams = teams.len(),
        "policies and roles generated"
    );
    Ok(())
}

fn write_entity(policy_dir: &Path, roles_dir: &Path, entity: &str) -> Result<()> {
    let role_name = format!("{}-{}", constants::POLICY_PREFIX, entity);
    fs::write(
        policy_dir.join(format!("{role_name}.hcl")),
        entity_policy(entity),
    )?;
    append_role(&roles_dir.join(format!("{entity}.json")), &role_name)
}

/// Append `role_name` to the role file at `path` unless already present.
fn append_role(path: &Path, role_name: &str) -> Result<()> {
    let mut role = match fs::read(path) {
        Ok(bytes) => {
            serde_json::from_slice::<RoleFile>(&bytes).map_err(|source| StorageError::Role {
                path: path.to_path_buf(),
                source,
            })?
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => RoleFile::default(),
        Err(e) => return Err(e.into()),
    };

    if role.value.split(',').any(|existing| existing == role_name) {
        return Ok(());
    }
    if role.value.is_empty() {
        role.value = role_name.to_string();
    } else {
        role.value = format!("{},{}", role.value, role_name);
    }

    let bytes = serde_json::to_vec(&role).map_err(|source| StorageError::Role {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, bytes)?;
    Ok(())
}

fn general_policy() -> String {
    format!(
        "# Allows any member to drop secrets for others.\npath \"{}/*\" {{\n  capabilities = [\"create\", \"update\"]\n}}\n",
        constants::SECRET_PREFIX
    )
}

fn entity_policy(entity: &str) -> String {
    format!(
        "# Allows {entity} to manage secrets in its own drop space.\npath \"{}/{entity}/*\" {{\n  capabilities = [\"read\", \"list\", \"delete\"]\n}}\n",
        constants::SECRET_PREFIX
    )
}
