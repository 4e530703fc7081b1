//! Normalization of raw scraper output into the common post schema.
//!
//! Each platform's raw items go through a platform-specific field mapping;
//! a malformed item is dropped with a log line, never failing the batch.
//! Item order within one platform's result is preserved.

mod mappers;
mod types;

use tracing::debug;

use crate::scraper::RawScrapeResult;

pub use mappers::map_item;
pub use types::{Author, EngagementStats, NormalizedPost};

/// Normalize one platform's raw result.
pub fn normalize_result(result: &RawScrapeResult) -> Vec<NormalizedPost> {
    let mut posts = Vec::with_capacity(result.items.len());
    for item in &result.items {
        match map_item(result.platform, item) {
            Some(post) => posts.push(post),
            None => {
                debug!(
                    platform = %result.platform,
                    url_group = item.url_group.as_str(),
                    "Dropping unmappable raw item"
                );
            }
        }
    }
    posts
}

/// Normalize a batch of per-platform results into one pool.
///
/// Results are processed in the order given; no cross-platform ordering is
/// implied beyond that.
pub fn normalize_batch<'a, I>(results: I) -> Vec<NormalizedPost>
where
    I: IntoIterator<Item = &'a RawScrapeResult>,
{
    results.into_iter().flat_map(normalize_result).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;
    use crate::scraper::RawItem;
    use serde_json::json;

    #[test]
    fn test_normalize_result_drops_malformed_keeps_order() {
        let result = RawScrapeResult {
            platform: Platform::Tiktok,
            items: vec![
                RawItem {
                    url_group: "https://www.tiktok.com/@a".to_string(),
                    payload: json!({ "text": "first", "playCount": 1 }),
                },
                RawItem {
                    url_group: "https://www.tiktok.com/@a".to_string(),
                    payload: json!(42),
                },
                RawItem {
                    url_group: "https://www.tiktok.com/@a".to_string(),
                    payload: json!({ "text": "second", "playCount": 2 }),
                },
            ],
        };

        let posts = normalize_result(&result);
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].text, "first");
        assert_eq!(posts[1].text, "second");
    }

    #[test]
    fn test_normalize_batch_flattens_platforms() {
        let tiktok = RawScrapeResult {
            platform: Platform::Tiktok,
            items: vec![RawItem {
                url_group: "https://www.tiktok.com/@a".to_string(),
                payload: json!({ "text": "t", "playCount": 1 }),
            }],
        };
        let youtube = RawScrapeResult {
            platform: Platform::Youtube,
            items: vec![RawItem {
                url_group: "https://www.youtube.com/@b".to_string(),
                payload: json!({ "title": "y", "viewCount": 2 }),
            }],
        };

        let posts = normalize_batch([&tiktok, &youtube]);
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].platform, Platform::Tiktok);
        assert_eq!(posts[1].platform, Platform::Youtube);
    }
}
