use crate::config::CrawlConfig;
use crate::url::canonical_seed;
use crate::ConfigError;

/// Validates a crawl configuration before any network activity
///
/// Checks, in order: the concurrency and retry knobs, every seed URL's
/// syntax, and the header lines. Any failure here is fatal and aborts the
/// crawl before it starts.
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_limits(config)?;
    validate_seeds(config)?;
    config.header_map().map(|_| ())
}

/// Validates the rate-limit, retry, and backoff knobs
fn validate_limits(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be >= 1, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.time_period.is_zero() {
        return Err(ConfigError::Validation(
            "time_period must be greater than zero".to_string(),
        ));
    }

    if !config.backoff_factor.is_finite() || config.backoff_factor < 0.0 {
        return Err(ConfigError::Validation(format!(
            "backoff_factor must be a non-negative number, got {}",
            config.backoff_factor
        )));
    }

    Ok(())
}

/// Validates every seed URL's syntax
///
/// The HTTP-versus-HTTPS policy check on seeds belongs to the CLI layer;
/// the engine itself only requires well-formed http/https URLs here and
/// applies the scheme gate to discovered links.
fn validate_seeds(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in &config.seeds {
        canonical_seed(seed).map_err(|e| ConfigError::InvalidSeed(format!("{seed}: {e}")))?;
    }

    Ok(())
}
