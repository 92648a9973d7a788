//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A member's login handle, unique within the organization.
pub type Login = String;

/// A team name as the directory reports it.
pub type TeamName = String;
