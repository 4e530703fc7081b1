//! Balanced top-N selection across URL groups.
//!
//! The pool is grouped by originating submitted URL, every post is scored,
//! and the engine picks a bounded set spread as evenly as possible across
//! the groups, preferring targets that divide into thirds.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::normalizer::NormalizedPost;

use super::scoring::engagement_score;

/// Default total number of posts to select.
pub const DEFAULT_TARGET: usize = 9;

/// A selected post: the normalized record plus its score and final rank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredPost {
    #[serde(flatten)]
    pub post: NormalizedPost,
    /// Platform-weighted engagement score used for ranking.
    pub engagement_score: f64,
    /// "post_1".."post_N", assigned by descending score over the final set.
    pub post_number: String,
}

/// Internal candidate carrying its stable pool position for tie-breaks.
#[derive(Debug, Clone)]
struct Candidate {
    pool_idx: usize,
    score: f64,
    post: NormalizedPost,
}

/// Descending score; ties resolve to the earlier pool position.
fn by_score_desc(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then(a.pool_idx.cmp(&b.pool_idx))
}

/// Select up to `target` posts, evenly distributed across URL groups.
///
/// The effective target steps down through target, two thirds, one third
/// until every group can cover its even share; if no tier fits, whatever
/// the pool holds is returned. The returned list is ordered by descending
/// engagement score (stable on input order) and numbered gaplessly.
/// Deterministic: an unchanged pool always yields the identical result.
pub fn select_top_posts(pool: &[NormalizedPost], target: usize) -> Vec<ScoredPost> {
    if pool.is_empty() || target == 0 {
        return Vec::new();
    }

    // Group candidates by url_group, keeping first-seen group order
    // (submission order) and in-group pool order.
    let mut group_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Candidate>> = HashMap::new();
    for (pool_idx, post) in pool.iter().enumerate() {
        let candidate = Candidate {
            pool_idx,
            score: engagement_score(post.platform, &post.stats),
            post: post.clone(),
        };
        groups
            .entry(post.url_group.clone())
            .or_insert_with(|| {
                group_order.push(post.url_group.clone());
                Vec::new()
            })
            .push(candidate);
    }

    for candidates in groups.values_mut() {
        candidates.sort_by(by_score_desc);
    }

    let group_count = group_order.len();
    let effective_target = match pick_target_tier(target, group_count, &groups) {
        Some(tier) => tier,
        None => {
            // Not even the smallest tier splits evenly; use everything.
            debug!(pool = pool.len(), groups = group_count, "No target tier feasible, selecting all");
            pool.len()
        }
    };

    let base = effective_target / group_count;
    let remainder = effective_target % group_count;

    let mut selected: Vec<Candidate> = Vec::with_capacity(effective_target);
    let mut leftovers: Vec<Candidate> = Vec::new();
    for group in &group_order {
        let candidates = &groups[group];
        let take = base.min(candidates.len());
        selected.extend_from_slice(&candidates[..take]);
        leftovers.extend_from_slice(&candidates[take..]);
    }

    // Remainder slots go to the highest-scoring unused candidates overall,
    // regardless of which group they come from.
    leftovers.sort_by(by_score_desc);
    let extra = remainder.min(leftovers.len());
    selected.extend(leftovers.into_iter().take(extra));

    // Final order and numbering form a global leaderboard.
    selected.sort_by(by_score_desc);
    selected.truncate(effective_target);

    selected
        .into_iter()
        .enumerate()
        .map(|(i, c)| ScoredPost {
            post: c.post,
            engagement_score: c.score,
            post_number: format!("post_{}", i + 1),
        })
        .collect()
}

/// Largest tier of {target, 2/3 target, 1/3 target} for which every group
/// can supply its even share.
fn pick_target_tier(
    target: usize,
    group_count: usize,
    groups: &HashMap<String, Vec<Candidate>>,
) -> Option<usize> {
    let tiers = [target, target * 2 / 3, target / 3];
    tiers
        .into_iter()
        .filter(|t| *t > 0)
        .find(|t| {
            let share = *t / group_count;
            groups.values().all(|g| g.len() >= share)
        })
}
