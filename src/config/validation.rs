use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Deepest crawl a configuration may ask for
const MAX_DEPTH_LIMIT: u32 = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_seed(&config.seed)?;

    if config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_depth must be <= {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    if let Some(limit) = config.max_concurrent_fetches {
        if !(1..=1000).contains(&limit) {
            return Err(ConfigError::Validation(format!(
                "max_concurrent_fetches must be between 1 and 1000, got {}",
                limit
            )));
        }
    }

    if !(1..=600).contains(&config.request_timeout) {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be between 1 and 600 seconds, got {}",
            config.request_timeout
        )));
    }

    Ok(())
}

/// Validates the seed address: an absolute HTTP(S) URL
pub(crate) fn validate_seed(seed: &str) -> Result<(), ConfigError> {
    if seed.trim().is_empty() {
        return Err(ConfigError::Validation("seed cannot be empty".to_string()));
    }

    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use HTTP or HTTPS",
            seed
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.summary_path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "summary_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| ConfigError::Validation(format!("Invalid email format: '{}'", email)))?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_seed() {
        assert!(validate_seed("https://example.com/").is_ok());
        assert!(validate_seed("http://127.0.0.1:8080/page").is_ok());

        assert!(validate_seed("").is_err());
        assert!(validate_seed("   ").is_err());
        assert!(validate_seed("not a url").is_err());
        assert!(validate_seed("ftp://example.com/").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::for_seed("https://example.com/", 3);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let config = Config::for_seed("https://example.com/", MAX_DEPTH_LIMIT + 1);
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_concurrency_bounds() {
        let mut config = Config::for_seed("https://example.com/", 2);

        config.crawler.max_concurrent_fetches = Some(0);
        assert!(validate(&config).is_err());

        config.crawler.max_concurrent_fetches = Some(1001);
        assert!(validate(&config).is_err());

        config.crawler.max_concurrent_fetches = Some(8);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_request_timeout_bounds() {
        let mut config = Config::for_seed("https://example.com/", 2);
        config.crawler.request_timeout = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_summary_path_rejected() {
        let mut config = Config::for_seed("https://example.com/", 2);
        config.output.summary_path = Some(String::new());
        assert!(validate(&config).is_err());
    }
}
