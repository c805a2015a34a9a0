//! Shared headless-browser process.
//!
//! Launching Chrome dominates the cost of a single crawl, so one process is
//! amortized across all sequential crawls of a batch run. Every crawl opens
//! its own tab with a freshly picked user-agent and closes it when done.
//!
//! The pool is an explicit resource object constructed by the orchestrator
//! and passed by reference into crawl calls — its lifetime is scoped to a
//! batch run or a realtime check, not to the process.

use std::ffi::OsStr;
use std::sync::{Arc, Mutex, PoisonError};

use headless_chrome::{Browser, LaunchOptions};

use crate::error::CrawlerError;

const LAUNCH_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-infobars",
    "--window-position=0,0",
];

/// Owns at most one headless Chrome process and hands out shared handles.
#[derive(Default)]
pub struct BrowserPool {
    browser: Mutex<Option<Arc<Browser>>>,
}

impl BrowserPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the running browser, launching it on first use.
    ///
    /// Idempotent: concurrent callers are serialized on the internal lock,
    /// so two browser processes are never launched.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlerError::Launch`] if the Chrome process cannot be
    /// started; callers treat that as fatal for the whole run.
    pub fn acquire(&self) -> Result<Arc<Browser>, CrawlerError> {
        let mut guard = self
            .browser
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(browser) = guard.as_ref() {
            return Ok(Arc::clone(browser));
        }

        tracing::info!("launching headless browser");
        let browser = Arc::new(launch()?);
        *guard = Some(Arc::clone(&browser));
        Ok(browser)
    }

    /// Tears the browser process down and clears the cache.
    ///
    /// Safe to call when nothing is running; in-flight handles keep the
    /// process alive until they are dropped.
    pub fn release(&self) {
        let mut guard = self
            .browser
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            tracing::info!("released headless browser");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.browser
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

fn launch() -> Result<Browser, CrawlerError> {
    let args: Vec<&OsStr> = LAUNCH_ARGS.iter().map(OsStr::new).collect();
    Browser::new(LaunchOptions {
        headless: true,
        window_size: Some((1920, 1080)),
        args,
        ..Default::default()
    })
    .map_err(|e| CrawlerError::Launch {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Launching Chrome is out of scope for unit tests; only the idle-state
    // bookkeeping is covered here.
    #[test]
    fn release_is_safe_when_nothing_is_running() {
        let pool = BrowserPool::new();
        assert!(!pool.is_running());
        pool.release();
        assert!(!pool.is_running());
    }
}
