//! Print a secret from the active member's drop.

use crate::core::config::Settings;
use crate::core::directory::Directory;
use crate::core::storage::{self, VaultStore};
use crate::error::Result;

pub fn run(settings: &Settings, directory: &Directory, name: &str) -> Result<()> {
    let login = directory.whoami()?;
    let store = VaultStore::connect(settings)?;
    let payload = store.read(&storage::secret_path(&login, name))?;
    // Raw payload on stdout so the output can be piped.
    println!("{}", payload.as_str());
    Ok(())
}
