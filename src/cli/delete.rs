//! Delete a secret from a drop space.

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::directory::Directory;
use crate::core::storage::{self, VaultStore};
use crate::error::{DirectoryError, Result};

pub fn run(
    settings: &Settings,
    directory: &Directory,
    name: &str,
    team: Option<&str>,
) -> Result<()> {
    let entity = match team {
        Some(team) => directory
            .is_team(team)
            .ok_or_else(|| DirectoryError::UnknownRecipient(team.to_string()))?
            .to_string(),
        None => directory.whoami()?,
    };

    let store = VaultStore::connect(settings)?;
    store.delete(&storage::secret_path(&entity, name))?;
    output::success(&format!("deleted {} from {}", name, entity));
    Ok(())
}
