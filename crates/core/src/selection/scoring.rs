//! Engagement scoring formulas.

use crate::normalizer::EngagementStats;
use crate::platform::Platform;

/// Compute the engagement score for a post's stats.
///
/// Pure and deterministic: identical input always yields the identical
/// score. Each platform weighs its own counters:
///
/// | platform  | formula                                          |
/// |-----------|--------------------------------------------------|
/// | twitter   | views*0.3 + likes*2 + retweets*3 + replies*1.5   |
/// | linkedin  | comments*5 + likes*1                             |
/// | youtube   | views*0.1                                        |
/// | tiktok    | views*0.2                                        |
/// | instagram | views*0.5                                        |
pub fn engagement_score(platform: Platform, stats: &EngagementStats) -> f64 {
    let score = match platform {
        Platform::Twitter => {
            stats.views as f64 * 0.3
                + stats.likes as f64 * 2.0
                + stats.retweets as f64 * 3.0
                + stats.replies as f64 * 1.5
        }
        Platform::Linkedin => stats.comments as f64 * 5.0 + stats.likes as f64,
        Platform::Youtube => stats.views as f64 * 0.1,
        Platform::Tiktok => stats.views as f64 * 0.2,
        Platform::Instagram => stats.views as f64 * 0.5,
    };
    score.max(0.0)
}
