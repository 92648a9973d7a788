//! Print the login the configured credentials resolve to.

use crate::core::directory::Directory;
use crate::error::Result;

pub fn run(directory: &Directory) -> Result<()> {
    println!("{}", directory.whoami()?);
    Ok(())
}
