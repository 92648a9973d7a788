//! Deaddrop - share secrets with members and teams of your organization.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── share         # Drop a secret for members/teams
//! │   ├── get           # Read a secret from your drop
//! │   ├── list          # List your drops and your teams' drops
//! │   ├── delete        # Remove a dropped secret
//! │   ├── search        # Search the organization directory
//! │   ├── generate      # Generate storage policies and roles
//! │   └── whoami        # Print your resolved login
//! └── core/             # Core library components
//!     ├── config        # Settings resolution (flags, file, env)
//!     ├── directory/    # Organization directory
//!     │   ├── snapshot  # Sorted members/teams view and queries
//!     │   ├── cache     # TTL'd on-disk snapshot records
//!     │   ├── remote    # Resolver seam to the directory service
//!     │   ├── github    # GitHub REST implementation
//!     │   └── fetch     # Concurrent page/detail fetch engine
//!     └── storage/      # Secret storage
//!         ├── vault     # Vault KV HTTP client
//!         └── policy    # Policy and role file generation
//! ```
//!
//! # Features
//!
//! - Directory-backed recipient validation with case-insensitive lookup
//! - Hour-long snapshot cache so repeat runs skip the network
//! - Concurrent directory fetch that aborts on the first failure
//! - Per-member and per-team access policy generation

pub mod cli;
pub mod core;
pub mod error;
