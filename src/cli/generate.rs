//! Generate storage policies and auth roles for the organization.

use std::path::PathBuf;

use crate::cli::output;
use crate::core::directory::Directory;
use crate::core::storage::{self, PolicyOptions};
use crate::error::Result;

pub fn run(
    directory: &Directory,
    policy_dir: PathBuf,
    role_dir: PathBuf,
    default_team: String,
) -> Result<()> {
    let options = PolicyOptions {
        policy_dir,
        role_dir,
        default_team,
    };
    storage::generate_policies(&options, directory.members(), directory.teams())?;

    output::success(&format!(
        "generated policies for {} members and {} teams",
        directory.members().len(),
        directory.teams().len()
    ));
    Ok(())
}
