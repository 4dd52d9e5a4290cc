//! Scopecrawl: a scope-constrained web crawler
//!
//! This crate implements the crawl engine behind a web vulnerability scanner:
//! given seed URLs and a file of allowed hosts, it discovers and visits every
//! in-scope page, respecting a global request-rate budget and retrying
//! transient failures, and returns the set of visited URLs for a downstream
//! scanner to consume.

pub mod config;
pub mod crawler;
pub mod scope;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scope error: {0}")]
    Scope(#[from] ScopeError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Seed URL is not in scope: {url}")]
    OutOfScopeSeed { url: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
///
/// All of these are fatal: they surface before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),

    #[error("Invalid header (expected 'Name: value'): {0}")]
    InvalidHeader(String),

    #[error("Failed to read user-agent corpus {path}: {source}")]
    AgentCorpus {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Scope file and scope entry errors
#[derive(Debug, Error)]
pub enum ScopeError {
    /// The scope file itself could not be opened or read. Distinct from an
    /// empty or all-invalid file, which loads as an empty scope list.
    #[error("Failed to read scope file {path}: {source}")]
    FileUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Empty scope entry")]
    EmptyEntry,

    #[error("Invalid host in scope entry: {0}")]
    InvalidHost(String),

    #[error("Invalid port in scope entry: {0}")]
    InvalidPort(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for scope operations
pub type ScopeResult<T> = std::result::Result<T, ScopeError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{CrawlConfig, ScanType};
pub use crawler::{crawl, crawl_with_shutdown, CrawlOutcome};
pub use scope::{load_scope_file, ScopeEntry, ScopeList};
