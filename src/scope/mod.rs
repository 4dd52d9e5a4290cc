//! Scope handling for the crawler
//!
//! The scope file decides which hosts the crawler is permitted to touch.
//! This module handles:
//! - Validating individual scope entries (domain/IPv4, optional port,
//!   optional `*.` wildcard marker)
//! - Loading and filtering the scope file
//! - Deciding whether a candidate URL is in scope

mod entry;
mod loader;
mod matcher;

pub use entry::ScopeEntry;
pub use loader::load_scope_file;
pub use matcher::{netloc_of, ScopeList};
