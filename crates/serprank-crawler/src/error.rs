use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlerError {
    /// The headless browser process could not be started. Fatal for the
    /// whole batch run or realtime check — no crawling is possible.
    #[error("failed to launch headless browser: {reason}")]
    Launch { reason: String },

    /// The search page did not load within the navigation timeout, or the
    /// navigation itself failed. Recoverable at batch granularity.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// A browser context/tab operation failed after navigation.
    #[error("browser page operation failed: {reason}")]
    Page { reason: String },
}
