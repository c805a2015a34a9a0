use serde::{Deserialize, Serialize};

mod app_config;
mod config;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};

/// The three result categories the engine tracks on the search results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A map listing (local business entry in the place section).
    Listing,
    /// A single post on a blog, identified by (blog id, post number).
    BlogPost,
    /// A single post on a forum/cafe, identified by (club id, article id).
    ForumPost,
}

impl EntityKind {
    /// All kinds, in the order a batch run processes them.
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Listing,
        EntityKind::BlogPost,
        EntityKind::ForumPost,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Listing => "listing",
            EntityKind::BlogPost => "blog_post",
            EntityKind::ForumPost => "forum_post",
        }
    }

    /// Parses the wire/database representation produced by [`Self::as_str`].
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "listing" => Some(EntityKind::Listing),
            "blog_post" => Some(EntityKind::BlogPost),
            "forum_post" => Some(EntityKind::ForumPost),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a tracking subscription.
///
/// `Stopped` is terminal as far as the engine is concerned: the batch path
/// never reactivates a stopped tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    Active,
    Stopped,
}

impl TrackingStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TrackingStatus::Active => "active",
            TrackingStatus::Stopped => "stopped",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(TrackingStatus::Active),
            "stopped" => Some(TrackingStatus::Stopped),
            _ => None,
        }
    }
}

impl std::fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
