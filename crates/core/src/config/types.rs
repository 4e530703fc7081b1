use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::orchestrator::OrchestratorConfig;
use crate::platform::Platform;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scrapers: Option<ScrapersConfig>,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8000
}

/// Task storage configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory for per-task JSON files. When unset, tasks live in
    /// memory only and disappear on restart.
    #[serde(default)]
    pub tasks_dir: Option<PathBuf>,
}

/// Scraper backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrapersConfig {
    /// Scraper backend type
    pub backend: ScraperBackend,
    /// Apify-specific configuration (required when backend = "apify")
    #[serde(default)]
    pub apify: Option<ApifyConfig>,
}

/// Available scraper backends
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScraperBackend {
    Apify,
}

/// Apify scraper backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApifyConfig {
    /// Apify API base URL
    #[serde(default = "default_apify_base_url")]
    pub base_url: String,
    /// Apify API token
    pub api_token: String,
    /// Per-request timeout in seconds (default: 240)
    #[serde(default = "default_apify_timeout")]
    pub timeout_secs: u32,
    /// Actor id per platform
    #[serde(default)]
    pub actors: ApifyActors,
}

fn default_apify_base_url() -> String {
    "https://api.apify.com".to_string()
}

fn default_apify_timeout() -> u32 {
    240
}

/// Apify actor ids, one per platform. Set an entry to "" to disable that
/// platform's scraper.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApifyActors {
    #[serde(default = "default_instagram_actor")]
    pub instagram: String,
    #[serde(default = "default_linkedin_actor")]
    pub linkedin: String,
    #[serde(default = "default_twitter_actor")]
    pub twitter: String,
    #[serde(default = "default_youtube_actor")]
    pub youtube: String,
    #[serde(default = "default_tiktok_actor")]
    pub tiktok: String,
}

impl Default for ApifyActors {
    fn default() -> Self {
        Self {
            instagram: default_instagram_actor(),
            linkedin: default_linkedin_actor(),
            twitter: default_twitter_actor(),
            youtube: default_youtube_actor(),
            tiktok: default_tiktok_actor(),
        }
    }
}

impl ApifyActors {
    /// Actor id for a platform; None when that platform is disabled.
    pub fn for_platform(&self, platform: Platform) -> Option<&str> {
        let actor = match platform {
            Platform::Instagram => &self.instagram,
            Platform::Linkedin => &self.linkedin,
            Platform::Twitter => &self.twitter,
            Platform::Youtube => &self.youtube,
            Platform::Tiktok => &self.tiktok,
        };
        if actor.is_empty() {
            None
        } else {
            Some(actor)
        }
    }
}

fn default_instagram_actor() -> String {
    "apify/instagram-reel-scraper".to_string()
}

fn default_linkedin_actor() -> String {
    "supreme_coder/linkedin-post".to_string()
}

fn default_twitter_actor() -> String {
    "scrape.badger/twitter-tweets-scraper".to_string()
}

fn default_youtube_actor() -> String {
    "streamers/youtube-channel-scraper".to_string()
}

fn default_tiktok_actor() -> String {
    "clockworks/tiktok-scraper".to_string()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub orchestrator: OrchestratorConfig,
    pub storage: StorageConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrapers: Option<SanitizedScrapersConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedScrapersConfig {
    pub backend: ScraperBackend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apify: Option<SanitizedApifyConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedApifyConfig {
    pub base_url: String,
    pub timeout_secs: u32,
    pub actors: ApifyActors,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            orchestrator: config.orchestrator.clone(),
            storage: config.storage.clone(),
            scrapers: config.scrapers.as_ref().map(|s| SanitizedScrapersConfig {
                backend: s.backend.clone(),
                apify: s.apify.as_ref().map(|a| SanitizedApifyConfig {
                    base_url: a.base_url.clone(),
                    timeout_secs: a.timeout_secs,
                    actors: a.actors.clone(),
                }),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8000);
        assert!(config.scrapers.is_none());
        assert!(config.storage.tasks_dir.is_none());
        assert_eq!(config.orchestrator.target_posts, 9);
    }

    #[test]
    fn test_actor_defaults_and_disabling() {
        let actors = ApifyActors::default();
        assert_eq!(
            actors.for_platform(Platform::Instagram),
            Some("apify/instagram-reel-scraper")
        );

        let actors = ApifyActors {
            twitter: String::new(),
            ..Default::default()
        };
        assert_eq!(actors.for_platform(Platform::Twitter), None);
    }

    #[test]
    fn test_sanitized_config_redacts_token() {
        let config = Config {
            server: ServerConfig::default(),
            scrapers: Some(ScrapersConfig {
                backend: ScraperBackend::Apify,
                apify: Some(ApifyConfig {
                    base_url: default_apify_base_url(),
                    api_token: "super-secret".to_string(),
                    timeout_secs: 240,
                    actors: ApifyActors::default(),
                }),
            }),
            orchestrator: OrchestratorConfig::default(),
            storage: StorageConfig::default(),
        };

        let sanitized = SanitizedConfig::from(&config);
        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("super-secret"));
        assert!(json.contains("apify"));
    }
}
