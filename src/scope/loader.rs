//! Scope file loading
//!
//! Reads the plain-text scope file (one entry per line), validating each
//! line independently. Invalid lines are logged and skipped; only a file
//! that cannot be read at all is a hard error.

use crate::scope::{ScopeEntry, ScopeList};
use crate::ScopeError;
use std::path::Path;

/// Loads and validates a scope file
///
/// Returns the accepted subset of entries. Blank and malformed lines are
/// skipped with a warning. An unreadable file is an explicit
/// [`ScopeError::FileUnreadable`], distinguishing "file missing" from
/// "file empty or all-invalid" (which yields an empty list).
pub fn load_scope_file(path: &Path) -> Result<ScopeList, ScopeError> {
    let contents =
        std::fs::read_to_string(path).map_err(|source| ScopeError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

    let mut entries = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match ScopeEntry::parse(line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Invalid entry within {}: {line} ({e})", path.display());
            }
        }
    }

    tracing::info!(
        "Loaded {} scope entries from {}",
        entries.len(),
        path.display()
    );
    Ok(ScopeList::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use url::Url;

    fn scope_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_entries() {
        let file = scope_file("example.com\n*.other.com\n10.0.0.1:8080\n");
        let list = load_scope_file(file.path()).unwrap();
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_invalid_lines_are_skipped_not_fatal() {
        let file = scope_file("example.com\nnot a host\nexample.com:99999\n*.ok.com\n");
        let list = load_scope_file(file.path()).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let file = scope_file("\nexample.com\n\n\n");
        let list = load_scope_file(file.path()).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_empty_file_loads_empty_list() {
        let file = scope_file("");
        let list = load_scope_file(file.path()).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_missing_file_is_explicit_error() {
        let result = load_scope_file(Path::new("/nonexistent/scope.txt"));
        assert!(matches!(result, Err(ScopeError::FileUnreadable { .. })));
    }

    #[test]
    fn test_loaded_list_matches() {
        let file = scope_file("*.a.test\n");
        let list = load_scope_file(file.path()).unwrap();
        assert!(list.is_in_scope(&Url::parse("https://x.a.test/").unwrap()));
        assert!(!list.is_in_scope(&Url::parse("https://b.test/").unwrap()));
    }
}
