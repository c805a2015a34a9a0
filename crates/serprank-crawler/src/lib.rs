//! Rank crawler for Naver search result pages.
//!
//! Drives one long-lived headless Chrome process ([`BrowserPool`]) through
//! the search results page for a keyword, locates the DOM section belonging
//! to an entity kind ([`locator`]), and determines the 1-based position of a
//! target entity among the de-duplicated entries of that section ([`rank`]).
//!
//! The browser is only used to obtain rendered HTML; section location and
//! ranking are pure functions over the captured document, so the algorithmic
//! core is testable without Chrome.

pub mod agents;
pub mod browser;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod locator;
pub mod rank;

pub use browser::BrowserPool;
pub use crawl::{check_rank, rank_in_html, search_url, CrawlConfig};
pub use error::CrawlerError;
pub use extract::{extract_blog_post, extract_forum_post, extract_listing_id, TargetId};
