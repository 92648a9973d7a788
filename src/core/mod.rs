//! Core library components.
//!
//! This module contains the reusable business logic: settings resolution,
//! the organization directory with its snapshot cache, and secret storage.

pub mod config;
pub mod constants;
pub mod directory;
pub mod storage;
pub mod types;
