use super::{types::Config, types::ScraperBackend, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Orchestrator bounds and timeouts are sane
/// - Apify credentials exist when the apify backend is selected
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Orchestrator validation
    let orch = &config.orchestrator;
    if orch.max_batch_size == 0 {
        return Err(ConfigError::ValidationError(
            "orchestrator.max_batch_size must be at least 1".to_string(),
        ));
    }
    if orch.target_posts == 0 {
        return Err(ConfigError::ValidationError(
            "orchestrator.target_posts must be at least 1".to_string(),
        ));
    }
    if orch.scrape_timeout_secs == 0
        || orch.normalize_timeout_secs == 0
        || orch.selection_timeout_secs == 0
    {
        return Err(ConfigError::ValidationError(
            "orchestrator timeouts must be greater than 0".to_string(),
        ));
    }

    // Scraper validation
    if let Some(scrapers) = &config.scrapers {
        match scrapers.backend {
            ScraperBackend::Apify => {
                let Some(apify) = &scrapers.apify else {
                    return Err(ConfigError::ValidationError(
                        "scrapers.apify section required when backend = \"apify\"".to_string(),
                    ));
                };
                if apify.api_token.is_empty() {
                    return Err(ConfigError::ValidationError(
                        "scrapers.apify.api_token cannot be empty".to_string(),
                    ));
                }
            }
        }
    }

    Ok(())
}
