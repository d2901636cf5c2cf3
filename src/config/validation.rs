//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits sane, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SurveyConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::SurveyConfig;

/// Smallest request limit that still fits a browser's request headers.
pub const MIN_REQUEST_BYTES: usize = 256;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("listener.max_connections must be greater than 0")]
    ZeroConnections,

    #[error("site.public_url '{0}' must start with http:// or https:// and have no trailing '/'")]
    PublicUrl(String),

    #[error("site.max_request_bytes must be at least {min}, got {0}", min = MIN_REQUEST_BYTES)]
    RequestLimit(usize),

    #[error("timeouts.read_secs must be greater than 0")]
    ZeroReadTimeout,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    LogLevel(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &SurveyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroConnections);
    }

    let url = &config.site.public_url;
    let has_scheme = url.starts_with("http://") || url.starts_with("https://");
    if !has_scheme || url.ends_with('/') {
        errors.push(ValidationError::PublicUrl(url.clone()));
    }
    if config.site.max_request_bytes < MIN_REQUEST_BYTES {
        errors.push(ValidationError::RequestLimit(config.site.max_request_bytes));
    }

    if config.timeouts.read_secs == 0 {
        errors.push(ValidationError::ZeroReadTimeout);
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&SurveyConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let mut config = SurveyConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.listener.max_connections = 0;
        config.site.public_url = "localhost:8000/".into();
        config.site.max_request_bytes = 10;
        config.timeouts.read_secs = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::BindAddress("nowhere".into()),
                ValidationError::ZeroConnections,
                ValidationError::PublicUrl("localhost:8000/".into()),
                ValidationError::RequestLimit(10),
                ValidationError::ZeroReadTimeout,
                ValidationError::LogLevel("loud".into()),
            ]
        );
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = SurveyConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::MetricsAddress("bogus".into())])
        );
    }

    #[test]
    fn trailing_slash_rejected() {
        let mut config = SurveyConfig::default();
        config.site.public_url = "https://survey.example.com/".into();
        assert!(validate_config(&config).is_err());

        config.site.public_url = "https://survey.example.com".into();
        assert!(validate_config(&config).is_ok());
    }
}
