//! Common post schema produced by normalization.

use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Engagement counters for a post.
///
/// Every platform fills a subset of these; absent fields read as zero on
/// both the mapping and serialization side.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngagementStats {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub retweets: u64,
    #[serde(default)]
    pub replies: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
}

/// Author of a post; every field is best-effort.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

/// A platform-agnostic post record, immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedPost {
    /// Originating platform.
    pub platform: Platform,
    /// Platform content kind: "tweet", "thread", "post", "video", "short".
    pub content_type: String,
    /// Media shape of the post: "video", "image", "carousel" or "text".
    pub media_type: String,
    /// Canonical URL of the post, when the platform provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Post text (caption, tweet text, video title).
    #[serde(default)]
    pub text: String,
    /// Engagement counters.
    pub stats: EngagementStats,
    /// Post author.
    #[serde(default)]
    pub author: Author,
    /// The submitted URL this post was scraped for.
    pub url_group: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_absent_fields_default_to_zero() {
        let stats: EngagementStats = serde_json::from_str(r#"{"views": 12}"#).unwrap();
        assert_eq!(stats.views, 12);
        assert_eq!(stats.likes, 0);
        assert_eq!(stats.shares, 0);
    }

    #[test]
    fn test_normalized_post_roundtrip() {
        let post = NormalizedPost {
            platform: Platform::Linkedin,
            content_type: "post".to_string(),
            media_type: "text".to_string(),
            url: Some("https://www.linkedin.com/feed/update/1".to_string()),
            text: "hello".to_string(),
            stats: EngagementStats {
                likes: 10,
                comments: 2,
                ..Default::default()
            },
            author: Author {
                name: Some("Some One".to_string()),
                handle: Some("someone".to_string()),
                profile_url: None,
            },
            url_group: "https://www.linkedin.com/in/someone".to_string(),
        };

        let json = serde_json::to_string(&post).unwrap();
        let parsed: NormalizedPost = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, post);
    }
}
