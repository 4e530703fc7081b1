//! Testing utilities and mock implementations for E2E tests.
//!
//! Provides a mock scraper backend and raw-item fixtures so the full
//! submit -> scrape -> normalize -> select flow can be exercised without
//! real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use postpick_core::testing::{fixtures, MockScraper};
//!
//! let scraper = MockScraper::new();
//! scraper.set_items(
//!     Platform::Twitter,
//!     "https://x.com/rustlang",
//!     vec![fixtures::twitter_item("release day", 15420, 892, 156, 43)],
//! );
//! ```

mod mock_scraper;

pub use mock_scraper::MockScraper;

/// Raw-item fixtures shaped like real scraper output.
pub mod fixtures {
    use serde_json::{json, Value};

    /// Raw Twitter tweet item with the given engagement counters.
    pub fn twitter_item(text: &str, views: u64, likes: u64, retweets: u64, replies: u64) -> Value {
        json!({
            "content_type": "tweet",
            "text": text,
            "tweet_url": format!("https://x.com/someone/status/{}", views + likes),
            "view_count": views,
            "favorite_count": likes,
            "retweet_count": retweets,
            "reply_count": replies,
            "user": { "screen_name": "someone", "name": "Some One" }
        })
    }

    /// Raw Instagram video item with the given view count.
    pub fn instagram_item(caption: &str, views: u64, likes: u64) -> Value {
        json!({
            "type": "Video",
            "caption": caption,
            "url": format!("https://www.instagram.com/p/{}/", views),
            "videoPlayCount": views,
            "likesCount": likes,
            "commentsCount": 0,
            "ownerUsername": "someone"
        })
    }

    /// Raw LinkedIn post item with the given counters.
    pub fn linkedin_item(text: &str, likes: u64, comments: u64) -> Value {
        json!({
            "text": text,
            "url": format!("https://www.linkedin.com/feed/update/{}", likes),
            "numLikes": likes,
            "numComments": comments,
            "numShares": 0,
            "author": { "firstName": "Some", "lastName": "One", "publicId": "someone" }
        })
    }

    /// Raw YouTube video item with the given view count.
    pub fn youtube_item(title: &str, views: u64, duration: &str) -> Value {
        json!({
            "title": title,
            "url": format!("https://www.youtube.com/watch?v=v{}", views),
            "viewCount": views,
            "likeCount": 0,
            "commentCount": 0,
            "duration": duration,
            "channelName": "Some Channel"
        })
    }

    /// Raw TikTok video item with the given view count.
    pub fn tiktok_item(text: &str, views: u64) -> Value {
        json!({
            "text": text,
            "webVideoUrl": format!("https://www.tiktok.com/@someone/video/{}", views),
            "playCount": views,
            "diggCount": 0,
            "commentCount": 0,
            "shareCount": 0,
            "authorMeta": { "name": "someone", "nickName": "Some One" }
        })
    }
}
