//! Platform scraping abstraction.
//!
//! This module provides the `Scraper` trait for opaque per-platform
//! scraper backends, the Apify implementation, and the invoker that fans
//! a batch out into one bounded job per platform.

mod apify;
mod invoker;
mod types;

pub use apify::ApifyScraper;
pub use invoker::{invoke_scrapers, BatchScrapeOutcome, PlatformOutcome};
pub use types::{RawItem, RawScrapeResult, ScrapeError, ScrapeRequest, Scraper};
