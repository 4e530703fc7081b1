//! Content selection engine.
//!
//! Scores every normalized post with a platform-weighted formula and picks
//! a bounded, evenly distributed subset of the best content. Both halves
//! are pure functions over the pool; re-running on an unchanged pool gives
//! an identical result.

mod distribution;
mod scoring;

pub use distribution::{select_top_posts, ScoredPost, DEFAULT_TARGET};
pub use scoring::engagement_score;
