//! End-to-end rank check: fetch a rendered result page and search it.
//!
//! The browser work here is deliberately thin — navigate, wait, grab the
//! rendered HTML, close the tab. Everything that actually decides a rank
//! ([`rank_in_html`]) is a pure function over the captured document, so the
//! whole decision path is testable without a browser.

use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, Tab};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use scraper::Html;
use serprank_core::EntityKind;

use crate::agents::random_user_agent;
use crate::browser::BrowserPool;
use crate::error::CrawlerError;
use crate::extract::TargetId;
use crate::locator::find_section;
use crate::rank::rank_in_section;

/// Navigation knobs for a single crawl.
#[derive(Debug, Clone, Copy)]
pub struct CrawlConfig {
    /// Upper bound on navigation and page-readiness waits.
    pub nav_timeout: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            nav_timeout: Duration::from_secs(15),
        }
    }
}

/// Builds the result-page URL for a keyword in the vertical that carries
/// the section for `kind`.
#[must_use]
pub fn search_url(kind: EntityKind, keyword: &str) -> String {
    let vertical = match kind {
        EntityKind::Listing => "nexearch",
        EntityKind::BlogPost => "blog",
        EntityKind::ForumPost => "article",
    };
    let query = utf8_percent_encode(keyword, NON_ALPHANUMERIC);
    format!("https://search.naver.com/search.naver?where={vertical}&query={query}")
}

/// Locates the section for `kind` in a rendered page and ranks `target`
/// within it.
///
/// Returns `None` both when the section is absent from the page and when
/// the target is not listed in it; the two are indistinguishable to
/// callers on purpose, since either way the target is not exposed.
#[must_use]
pub fn rank_in_html(html: &str, kind: EntityKind, target: &TargetId) -> Option<u32> {
    let document = Html::parse_document(html);
    let Some(section) = find_section(&document, kind) else {
        tracing::debug!(kind = %kind, "section not found on result page");
        return None;
    };
    rank_in_section(section, target)
}

/// Fetches the result page for `keyword` and ranks `target` in its section.
///
/// Blocking: drives a headless browser synchronously. Async callers run
/// this on a blocking thread.
///
/// # Errors
///
/// Returns [`CrawlerError`] when the browser cannot be launched, the page
/// cannot be reached, or the rendered content cannot be read. A reachable
/// page without the target is `Ok(None)`, not an error.
pub fn check_rank(
    pool: &BrowserPool,
    config: &CrawlConfig,
    kind: EntityKind,
    keyword: &str,
    target: &TargetId,
) -> Result<Option<u32>, CrawlerError> {
    let browser = pool.acquire()?;
    let url = search_url(kind, keyword);

    let tab = open_tab(&browser, config)?;
    let result = fetch_rendered(&tab, &url, kind, target);
    // Best-effort close; a failed close leaks one tab, not the crawl.
    if let Err(e) = tab.close(true) {
        tracing::warn!(error = %e, "failed to close tab");
    }
    result
}

fn open_tab(browser: &Browser, config: &CrawlConfig) -> Result<Arc<Tab>, CrawlerError> {
    let tab = browser.new_tab().map_err(|e| CrawlerError::Page {
        reason: e.to_string(),
    })?;
    tab.set_default_timeout(config.nav_timeout);
    tab.set_user_agent(random_user_agent(), None, None)
        .map_err(|e| CrawlerError::Page {
            reason: e.to_string(),
        })?;
    Ok(tab)
}

fn fetch_rendered(
    tab: &Arc<Tab>,
    url: &str,
    kind: EntityKind,
    target: &TargetId,
) -> Result<Option<u32>, CrawlerError> {
    tab.navigate_to(url).map_err(|e| CrawlerError::Navigation {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;
    tab.wait_until_navigated()
        .map_err(|e| CrawlerError::Navigation {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
    let html = tab.get_content().map_err(|e| CrawlerError::Page {
        reason: e.to_string(),
    })?;

    let rank = rank_in_html(&html, kind, target);
    tracing::debug!(url, kind = %kind, rank = ?rank, "crawl finished");
    Ok(rank)
}

#[cfg(test)]
#[path = "crawl_test.rs"]
mod crawl_test;
