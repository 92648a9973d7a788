//! Drop a secret for members and teams.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::directory::Directory;
use crate::core::storage::VaultStore;
use crate::error::{DirectoryError, Error, Result};

pub fn run(
    settings: &Settings,
    directory: &Directory,
    filename: &Path,
    name: &str,
    members: &[String],
    teams: &[String],
) -> Result<()> {
    let targets = resolve_targets(directory, members, teams)?;
    let payload =
        Zeroizing::new(
            fs::read_to_string(filename).map_err(|source| Error::ReadSecretFile {
                path: filename.to_path_buf(),
                source,
            })?,
        );

    let store = VaultStore::connect(settings)?;
    store.write(name, &payload, &targets)?;

    let recipients = targets
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    output::success(&format!("dropped {} for {}", name, recipients));
    Ok(())
}

/// Resolve every requested member and team to its canonical directory name,
/// deduplicating targets named more than once.
fn resolve_targets(
    directory: &Directory,
    members: &[String],
    teams: &[String],
) -> Result<BTreeSet<String>> {
    let mut targets = BTreeSet::new();
    for member in members {
        let login = directory
            .is_member(member)
            .ok_or_else(|| DirectoryError::UnknownRecipient(member.clone()))?;
        targets.insert(login.to_string());
    }
    for team in teams {
        let name = directory
            .is_team(team)
            .ok_or_else(|| DirectoryError::UnknownRecipient(team.clone()))?;
        targets.insert(name.to_string());
    }
    Ok(targets)
}
