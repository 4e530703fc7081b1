//! Per-platform field mappings from raw scraper items to the common schema.

use serde_json::Value;

use crate::platform::Platform;
use crate::scraper::RawItem;

use super::types::{Author, EngagementStats, NormalizedPost};

/// Map one raw item to a normalized post.
///
/// Returns None for items the platform mapping cannot make sense of; a
/// dropped item is never fatal to the batch.
pub fn map_item(platform: Platform, item: &RawItem) -> Option<NormalizedPost> {
    let obj = item.payload.as_object()?;
    match platform {
        Platform::Twitter => map_twitter(obj, &item.url_group),
        Platform::Instagram => map_instagram(obj, &item.url_group),
        Platform::Linkedin => map_linkedin(obj, &item.url_group),
        Platform::Youtube => map_youtube(obj, &item.url_group),
        Platform::Tiktok => map_tiktok(obj, &item.url_group),
    }
}

type Obj = serde_json::Map<String, Value>;

// ============================================================================
// Twitter
// ============================================================================

fn map_twitter(obj: &Obj, url_group: &str) -> Option<NormalizedPost> {
    match obj.get("content_type").and_then(Value::as_str) {
        Some("thread") => map_twitter_thread(obj, url_group),
        _ => map_twitter_tweet(obj, url_group),
    }
}

fn map_twitter_tweet(obj: &Obj, url_group: &str) -> Option<NormalizedPost> {
    let stats = EngagementStats {
        views: safe_int(obj.get("view_count")),
        likes: safe_int(obj.get("favorite_count")),
        retweets: safe_int(obj.get("retweet_count")),
        replies: safe_int(obj.get("reply_count")),
        ..Default::default()
    };

    let text = str_field(obj, "text")
        .or_else(|| str_field(obj, "full_text"))
        .unwrap_or_default()
        .to_string();

    let tweet_url = str_field(obj, "tweet_url");
    let user = obj.get("user").and_then(Value::as_object);
    let handle = user.and_then(|u| str_field(u, "screen_name"));

    Some(NormalizedPost {
        platform: Platform::Twitter,
        content_type: "tweet".to_string(),
        media_type: twitter_media_type(obj.get("media")).to_string(),
        url: tweet_url.map(str::to_string),
        text,
        stats,
        author: Author {
            name: user.and_then(|u| str_field(u, "name")).map(str::to_string),
            handle: handle.map(str::to_string),
            profile_url: twitter_profile_url(tweet_url, handle),
        },
        url_group: url_group.to_string(),
    })
}

fn map_twitter_thread(obj: &Obj, url_group: &str) -> Option<NormalizedPost> {
    let tweets = obj.get("ordered_tweets")?.as_array()?;
    if tweets.is_empty() {
        return None;
    }

    // Thread stats are the sum over every tweet in order; the thread text
    // is every tweet's text joined.
    let mut stats = EngagementStats::default();
    let mut texts = Vec::new();
    let mut media_type = "text";
    for tweet in tweets {
        let Some(t) = tweet.as_object() else { continue };
        stats.views += safe_int(t.get("view_count"));
        stats.likes += safe_int(t.get("favorite_count"));
        stats.retweets += safe_int(t.get("retweet_count"));
        stats.replies += safe_int(t.get("reply_count"));
        if let Some(text) = str_field(t, "text").or_else(|| str_field(t, "full_text")) {
            if !text.is_empty() {
                texts.push(text);
            }
        }
        let tweet_media = twitter_media_type(t.get("media"));
        if tweet_media == "video" || (tweet_media == "image" && media_type == "text") {
            media_type = tweet_media;
        }
    }

    let first = tweets[0].as_object()?;
    let main_url = str_field(first, "tweet_url");
    let user = first.get("user").and_then(Value::as_object);
    let handle = user.and_then(|u| str_field(u, "screen_name"));

    Some(NormalizedPost {
        platform: Platform::Twitter,
        content_type: "thread".to_string(),
        media_type: media_type.to_string(),
        url: main_url.map(str::to_string),
        text: texts.join(" "),
        stats,
        author: Author {
            name: user.and_then(|u| str_field(u, "name")).map(str::to_string),
            handle: handle.map(str::to_string),
            profile_url: twitter_profile_url(main_url, handle),
        },
        url_group: url_group.to_string(),
    })
}

/// "video" beats "image" beats "text", mirroring upstream media detection.
fn twitter_media_type(media: Option<&Value>) -> &'static str {
    let Some(list) = media.and_then(Value::as_array) else {
        return "text";
    };
    let mut media_type = "text";
    for entry in list {
        match entry.get("type").and_then(Value::as_str) {
            Some("video") => return "video",
            Some("photo") => media_type = "image",
            _ => {}
        }
    }
    media_type
}

/// Profile URL is the tweet URL up to `/status/`, falling back to the handle.
fn twitter_profile_url(tweet_url: Option<&str>, handle: Option<&str>) -> Option<String> {
    if let Some(url) = tweet_url {
        if let Some((profile, _)) = url.split_once("/status/") {
            return Some(profile.to_string());
        }
    }
    handle.map(|h| format!("https://x.com/{}", h))
}

// ============================================================================
// Instagram
// ============================================================================

fn map_instagram(obj: &Obj, url_group: &str) -> Option<NormalizedPost> {
    // The reel scraper returns mixed kinds; only video items carry the
    // view counts the selection formulas run on.
    if str_field(obj, "type") != Some("Video") {
        return None;
    }

    let views = match safe_int(obj.get("videoViewCount")) {
        0 => safe_int(obj.get("videoPlayCount")),
        v => v,
    };

    let handle = str_field(obj, "ownerUsername");

    Some(NormalizedPost {
        platform: Platform::Instagram,
        content_type: "post".to_string(),
        media_type: "video".to_string(),
        url: str_field(obj, "url").map(str::to_string),
        text: str_field(obj, "caption").unwrap_or_default().to_string(),
        stats: EngagementStats {
            views,
            likes: safe_int(obj.get("likesCount")),
            comments: safe_int(obj.get("commentsCount")),
            ..Default::default()
        },
        author: Author {
            name: str_field(obj, "ownerFullName").map(str::to_string),
            handle: handle.map(str::to_string),
            profile_url: handle.map(|h| format!("https://instagram.com/{}", h)),
        },
        url_group: url_group.to_string(),
    })
}

// ============================================================================
// LinkedIn
// ============================================================================

fn map_linkedin(obj: &Obj, url_group: &str) -> Option<NormalizedPost> {
    let media_type = if str_field(obj, "type") == Some("linkedinVideo") {
        "video"
    } else if obj
        .get("images")
        .and_then(Value::as_array)
        .is_some_and(|a| !a.is_empty())
    {
        "image"
    } else {
        "text"
    };

    let author = obj.get("author").and_then(Value::as_object);
    let name = author.map(|a| {
        format!(
            "{} {}",
            str_field(a, "firstName").unwrap_or_default(),
            str_field(a, "lastName").unwrap_or_default()
        )
        .trim()
        .to_string()
    });

    Some(NormalizedPost {
        platform: Platform::Linkedin,
        content_type: "post".to_string(),
        media_type: media_type.to_string(),
        url: str_field(obj, "url").map(str::to_string),
        text: str_field(obj, "text").unwrap_or_default().to_string(),
        stats: EngagementStats {
            likes: safe_int(obj.get("numLikes")),
            comments: safe_int(obj.get("numComments")),
            shares: safe_int(obj.get("numShares")),
            ..Default::default()
        },
        author: Author {
            name: name.filter(|n| !n.is_empty()),
            handle: author
                .and_then(|a| str_field(a, "publicId"))
                .map(str::to_string),
            profile_url: author
                .and_then(|a| str_field(a, "profileUrl"))
                .or_else(|| str_field(obj, "authorProfileUrl"))
                .map(str::to_string),
        },
        url_group: url_group.to_string(),
    })
}

// ============================================================================
// YouTube
// ============================================================================

fn map_youtube(obj: &Obj, url_group: &str) -> Option<NormalizedPost> {
    // Shorts run 60 seconds or less.
    let content_type = match str_field(obj, "duration").and_then(parse_iso8601_secs) {
        Some(secs) if secs <= 60 => "short",
        _ => "video",
    };

    Some(NormalizedPost {
        platform: Platform::Youtube,
        content_type: content_type.to_string(),
        media_type: "video".to_string(),
        url: str_field(obj, "url").map(str::to_string),
        text: str_field(obj, "title").unwrap_or_default().to_string(),
        stats: EngagementStats {
            views: safe_int(obj.get("viewCount")),
            likes: safe_int(obj.get("likeCount")),
            comments: safe_int(obj.get("commentCount")),
            ..Default::default()
        },
        author: Author {
            name: str_field(obj, "channelName").map(str::to_string),
            handle: str_field(obj, "channelHandle").map(str::to_string),
            profile_url: str_field(obj, "channelUrl").map(str::to_string),
        },
        url_group: url_group.to_string(),
    })
}

/// Parse the "PT#H#M#S" duration shape into seconds.
fn parse_iso8601_secs(duration: &str) -> Option<u64> {
    let rest = duration.strip_prefix("PT")?;
    let mut total: u64 = 0;
    let mut digits = String::new();
    for c in rest.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            let n: u64 = digits.parse().ok()?;
            digits.clear();
            total += match c {
                'H' => n * 3600,
                'M' => n * 60,
                'S' => n,
                _ => return None,
            };
        }
    }
    Some(total)
}

// ============================================================================
// TikTok
// ============================================================================

fn map_tiktok(obj: &Obj, url_group: &str) -> Option<NormalizedPost> {
    let author = obj.get("authorMeta").and_then(Value::as_object);

    Some(NormalizedPost {
        platform: Platform::Tiktok,
        content_type: "video".to_string(),
        media_type: "video".to_string(),
        url: str_field(obj, "webVideoUrl")
            .or_else(|| str_field(obj, "videoUrl"))
            .map(str::to_string),
        text: str_field(obj, "text").unwrap_or_default().to_string(),
        stats: EngagementStats {
            views: safe_int(obj.get("playCount")),
            likes: safe_int(obj.get("diggCount")),
            comments: safe_int(obj.get("commentCount")),
            shares: safe_int(obj.get("shareCount")),
            ..Default::default()
        },
        author: Author {
            name: author.and_then(|a| str_field(a, "nickName")).map(str::to_string),
            handle: author.and_then(|a| str_field(a, "name")).map(str::to_string),
            profile_url: author
                .and_then(|a| str_field(a, "profileUrl"))
                .map(str::to_string),
        },
        url_group: url_group.to_string(),
    })
}

// ============================================================================
// Field helpers
// ============================================================================

fn str_field<'a>(obj: &'a Obj, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

/// Read a counter that platforms report as a number or a digit string.
/// Anything else counts as zero.
fn safe_int(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().unwrap_or(0)
        }
        _ => 0,
    }
}
