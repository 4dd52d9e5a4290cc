//! URL handling for the crawler
//!
//! This module canonicalizes discovered links before they enter the
//! frontier: href validation, relative resolution against the page URL,
//! fragment stripping, and the http/https scheme gate.

mod normalize;

pub use normalize::{canonical_seed, canonicalize, scheme_allowed, valid_href};
