//! List secrets dropped for the active member and their teams.

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::directory::Directory;
use crate::core::storage::VaultStore;
use crate::error::Result;

pub fn run(settings: &Settings, directory: &Directory) -> Result<()> {
    let login = directory.whoami()?;
    let store = VaultStore::connect(settings)?;

    let mut found = list_drop(&store, &login)?;
    for team in directory.active_member_teams() {
        found |= list_drop(&store, team)?;
    }

    if !found {
        output::dimmed("no secrets dropped for you");
    }
    Ok(())
}

/// Print the drop space of one entity; empty spaces print nothing.
fn list_drop(store: &VaultStore, entity: &str) -> Result<bool> {
    let names = store.list(entity)?;
    if names.is_empty() {
        return Ok(false);
    }

    output::header(entity);
    for name in &names {
        output::list_item(name);
    }
    println!();
    Ok(true)
}
