//! Social media platform detection.
//!
//! Maps submitted URLs to a supported platform and extracts the account
//! handle from the URL path. Pure string matching, no network access.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

/// A supported social media platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Linkedin,
    Twitter,
    Youtube,
    Tiktok,
}

impl Platform {
    /// All supported platforms, in a stable order.
    pub const ALL: [Platform; 5] = [
        Platform::Instagram,
        Platform::Linkedin,
        Platform::Twitter,
        Platform::Youtube,
        Platform::Tiktok,
    ];

    /// Lowercase platform tag, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from URL classification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// The URL does not belong to any supported platform.
    #[error("unsupported platform for url: {0}")]
    UnsupportedPlatform(String),
}

/// Result of classifying one submitted URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformMatch {
    /// Which platform the URL belongs to.
    pub platform: Platform,
    /// Account handle extracted from the URL path, if one was present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
}

/// Classify a URL by domain and extract the account handle.
///
/// Matching is a case-insensitive substring check against a fixed domain
/// table; handle extraction strips path segments and query strings. A URL
/// on a known domain with no recognizable handle still classifies.
pub fn classify(url: &str) -> Result<PlatformMatch, ClassifyError> {
    let lower = url.to_lowercase();

    let platform = if lower.contains("instagram.com") {
        Platform::Instagram
    } else if lower.contains("linkedin.com") {
        Platform::Linkedin
    } else if lower.contains("twitter.com") || lower.contains("x.com") {
        Platform::Twitter
    } else if lower.contains("youtube.com") || lower.contains("youtu.be") {
        Platform::Youtube
    } else if lower.contains("tiktok.com") {
        Platform::Tiktok
    } else {
        return Err(ClassifyError::UnsupportedPlatform(url.to_string()));
    };

    Ok(PlatformMatch {
        platform,
        handle: extract_handle(url, platform),
    })
}

/// Extract the account handle from a platform URL.
///
/// Returns None when the URL carries no handle segment (e.g. a bare
/// domain or an unrecognized path shape).
pub fn extract_handle(url: &str, platform: Platform) -> Option<String> {
    let re = handle_pattern(platform);
    re.captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|h| !h.is_empty())
}

fn handle_pattern(platform: Platform) -> &'static Regex {
    // One compiled pattern per platform, built on first use.
    static PATTERNS: OnceLock<[Regex; 5]> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            Regex::new(r"instagram\.com/([^/?#]+)").unwrap(),
            Regex::new(r"linkedin\.com/(?:in|company)/([^/?#]+)").unwrap(),
            Regex::new(r"(?:twitter|x)\.com/([^/?#]+)").unwrap(),
            Regex::new(r"youtube\.com/(?:c/|@|channel/|user/)([^/?#]+)").unwrap(),
            Regex::new(r"tiktok\.com/@([^/?#]+)").unwrap(),
        ]
    });
    match platform {
        Platform::Instagram => &patterns[0],
        Platform::Linkedin => &patterns[1],
        Platform::Twitter => &patterns[2],
        Platform::Youtube => &patterns[3],
        Platform::Tiktok => &patterns[4],
    }
}
