//! Crawl configuration
//!
//! Everything the CLI hands to the crawl entry point: seed URLs, the scope
//! file path, rate-limit and retry knobs, custom headers, and the flags
//! controlling user-agent rotation and plain-HTTP targets.

mod types;
mod validation;

pub use types::{CrawlConfig, ScanType, DEFAULT_AGENT_CORPUS};
pub use validation::validate;
