//! Apify scraper backend implementation.
//!
//! Each platform maps to one Apify actor; a job runs the actor once per
//! submitted URL via `run-sync-get-dataset-items` and tags every returned
//! item with the URL it was scraped for.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ApifyConfig;
use crate::platform::{extract_handle, Platform};

use super::types::{RawItem, RawScrapeResult, ScrapeError, Scraper, ScrapeRequest};

/// How far back the actors are asked to look.
const LOOKBACK_DAYS: i64 = 7;

/// Result cap per profile, mirroring the actor defaults used upstream.
const RESULTS_LIMIT: u32 = 50;

/// Apify-backed scraper.
pub struct ApifyScraper {
    client: Client,
    config: ApifyConfig,
}

impl ApifyScraper {
    /// Create a new ApifyScraper with the given configuration.
    pub fn new(config: ApifyConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Build the synchronous run URL for an actor.
    ///
    /// Actor ids use `owner/name` form; the API path wants `owner~name`.
    fn build_run_url(&self, actor: &str) -> String {
        format!(
            "{}/v2/acts/{}/run-sync-get-dataset-items?token={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&actor.replace('/', "~")),
            urlencoding::encode(&self.config.api_token)
        )
    }

    /// Build the actor input for one platform/URL pair.
    fn build_actor_input(&self, platform: Platform, url: &str) -> serde_json::Value {
        let today = Utc::now().date_naive();
        let oldest = (today - ChronoDuration::days(LOOKBACK_DAYS)).format("%Y-%m-%d");

        match platform {
            Platform::Instagram => serde_json::json!({
                "username": [url],
                "resultsLimit": RESULTS_LIMIT,
                "onlyPostsNewerThan": format!("{} days", LOOKBACK_DAYS),
            }),
            Platform::Linkedin => serde_json::json!({
                "urls": [url],
                "limitPerSource": RESULTS_LIMIT,
                "scrapeUntil": oldest.to_string(),
            }),
            Platform::Twitter => {
                let handle = extract_handle(url, Platform::Twitter).unwrap_or_default();
                serde_json::json!({
                    "mode": "Advanced Search",
                    "query": format!(
                        "from:{} -filter:replies since:{} until:{}",
                        handle,
                        oldest,
                        today.format("%Y-%m-%d")
                    ),
                    "query_type": "Latest",
                    "max_results": 10,
                })
            }
            Platform::Youtube => serde_json::json!({
                "startUrls": [{ "url": url }],
                "maxResults": RESULTS_LIMIT,
                "maxResultsShorts": RESULTS_LIMIT,
                "maxResultStreams": 0,
                "oldestPostDate": oldest.to_string(),
                "sortVideosBy": "NEWEST",
            }),
            Platform::Tiktok => serde_json::json!({
                "profiles": [url],
                "resultsPerPage": RESULTS_LIMIT,
                "shouldDownloadVideos": false,
            }),
        }
    }

    /// Run the actor for one URL and return its dataset items.
    async fn run_actor(
        &self,
        actor: &str,
        platform: Platform,
        url: &str,
    ) -> Result<Vec<serde_json::Value>, ScrapeError> {
        let run_url = self.build_run_url(actor);
        let input = self.build_actor_input(platform, url);

        debug!(platform = %platform, actor = actor, "Running Apify actor");

        let response = self
            .client
            .post(&run_url)
            .json(&input)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScrapeError::Timeout
                } else if e.is_connect() {
                    ScrapeError::ConnectionFailed(e.to_string())
                } else {
                    ScrapeError::ApiError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScrapeError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(|e| ScrapeError::ApiError(format!("Failed to parse dataset items: {}", e)))
    }
}

#[async_trait]
impl Scraper for ApifyScraper {
    fn name(&self) -> &str {
        "apify"
    }

    async fn scrape(&self, request: &ScrapeRequest) -> Result<RawScrapeResult, ScrapeError> {
        let actor = self
            .config
            .actors
            .for_platform(request.platform)
            .ok_or(ScrapeError::ActorNotConfigured(request.platform))?
            .to_string();

        let mut items = Vec::new();
        let mut last_error: Option<ScrapeError> = None;
        let mut any_url_ok = false;

        // URLs of one platform run sequentially within the job; failures on
        // individual URLs are tolerated as long as one of them produces data.
        for url in &request.urls {
            match self.run_actor(&actor, request.platform, url).await {
                Ok(payloads) => {
                    any_url_ok = true;
                    items.extend(payloads.into_iter().map(|payload| RawItem {
                        url_group: url.clone(),
                        payload,
                    }));
                }
                Err(e) => {
                    warn!(platform = %request.platform, url = url.as_str(), error = %e, "Actor run failed for URL");
                    last_error = Some(e);
                }
            }
        }

        if !any_url_ok {
            return Err(last_error.unwrap_or_else(|| {
                ScrapeError::Internal("scrape request contained no URLs".to_string())
            }));
        }

        Ok(RawScrapeResult {
            platform: request.platform,
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApifyActors, ApifyConfig};

    fn test_config() -> ApifyConfig {
        ApifyConfig {
            base_url: "https://api.apify.example".to_string(),
            api_token: "secret token".to_string(),
            timeout_secs: 30,
            actors: ApifyActors::default(),
        }
    }

    #[test]
    fn test_run_url_encodes_actor_and_token() {
        let scraper = ApifyScraper::new(test_config());
        let url = scraper.build_run_url("apify/instagram-reel-scraper");
        assert!(url.starts_with("https://api.apify.example/v2/acts/apify~instagram-reel-scraper/"));
        assert!(url.contains("token=secret%20token"));
    }

    #[test]
    fn test_instagram_input_shape() {
        let scraper = ApifyScraper::new(test_config());
        let input = scraper.build_actor_input(
            Platform::Instagram,
            "https://www.instagram.com/nasa/",
        );
        assert_eq!(input["username"][0], "https://www.instagram.com/nasa/");
        assert_eq!(input["resultsLimit"], 50);
    }

    #[test]
    fn test_twitter_input_queries_by_handle() {
        let scraper = ApifyScraper::new(test_config());
        let input = scraper.build_actor_input(Platform::Twitter, "https://x.com/rustlang");
        let query = input["query"].as_str().unwrap();
        assert!(query.starts_with("from:rustlang "));
        assert!(query.contains("-filter:replies"));
    }
}
