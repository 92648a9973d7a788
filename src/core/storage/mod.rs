//! Secret storage and the access policies that guard it.

mod policy;
mod vault;

pub use policy::{generate_policies, PolicyOptions};
pub use vault::VaultStore;

use crate::core::constants;

/// Storage path of one named secret dropped for `entity`.
pub fn secret_path(entity: &str, name: &str) -> String {
    format!("{}/{}/{}", constants::SECRET_PREFIX, entity, name)
}
