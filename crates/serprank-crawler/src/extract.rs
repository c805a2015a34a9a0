//! Identifier extraction from target URLs.
//!
//! Parses the heterogeneous URL shapes operators paste in (desktop/mobile
//! permalinks, legacy query-parameter forms) into canonical entity
//! identifiers. All extractors are pure, synchronous, total functions:
//! unparseable input yields `None`, never an error.

use std::sync::LazyLock;

use regex::Regex;

use serprank_core::EntityKind;

/// Patterns a map-listing URL may carry its numeric id under, tried in
/// order: path segment, `place=` query parameter, generic `id=` parameter.
static LISTING_ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"/place/(\d+)").expect("valid regex"),
        Regex::new(r"[?&]place=(\d+)").expect("valid regex"),
        Regex::new(r"[?&]id=(\d+)").expect("valid regex"),
    ]
});

/// Canonical identifier of one tracked entity, as derived from its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetId {
    Listing {
        listing_id: String,
    },
    BlogPost {
        blog_id: String,
        log_no: String,
    },
    ForumPost {
        club_id: String,
        article_id: String,
    },
}

impl TargetId {
    /// Parses `url` into the identifier shape for `kind`.
    ///
    /// Returns `None` when the URL does not carry a recognizable id, which
    /// callers treat as "crawl not attempted, rank not present".
    #[must_use]
    pub fn from_url(kind: EntityKind, url: &str) -> Option<Self> {
        match kind {
            EntityKind::Listing => extract_listing_id(url).map(|listing_id| TargetId::Listing {
                listing_id,
            }),
            EntityKind::BlogPost => extract_blog_post(url),
            EntityKind::ForumPost => extract_forum_post(url),
        }
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            TargetId::Listing { .. } => EntityKind::Listing,
            TargetId::BlogPost { .. } => EntityKind::BlogPost,
            TargetId::ForumPost { .. } => EntityKind::ForumPost,
        }
    }

    /// The key result entries are de-duplicated on while ranking.
    ///
    /// For composite ids this is the owner (blog id / club id), not the
    /// post: a blogger or cafe appearing with several links in the same
    /// section consumes exactly one rank slot.
    #[must_use]
    pub fn dedup_key(&self) -> &str {
        match self {
            TargetId::Listing { listing_id } => listing_id,
            TargetId::BlogPost { blog_id, .. } => blog_id,
            TargetId::ForumPost { club_id, .. } => club_id,
        }
    }

    /// Full-identity match: composite ids must agree on both parts.
    #[must_use]
    pub fn matches(&self, candidate: &TargetId) -> bool {
        self == candidate
    }
}

/// Extracts the numeric listing id from a map URL.
///
/// Tries, in order: a `/place/{id}` path segment, a `place={id}` query
/// parameter, a generic `id={id}` query parameter. First numeric match wins.
#[must_use]
pub fn extract_listing_id(url: &str) -> Option<String> {
    LISTING_ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(url)
            .and_then(|cap| cap.get(1).map(|m| m.as_str().to_string()))
    })
}

/// Extracts `(blog id, post number)` from a blog post URL.
///
/// Accepted shapes:
/// - `…/PostView.naver?blogId={blog_id}&logNo={log_no}` (also `.nhn`) —
///   query form, preferred when the `PostView` sentinel segment is present;
/// - `…/{blog_id}/{log_no}` — path form, where the post segment must be
///   all digits.
#[must_use]
pub fn extract_blog_post(url: &str) -> Option<TargetId> {
    if let Some(id) = composite_from_query(url, "PostView", "blogId", "logNo") {
        return Some(TargetId::BlogPost {
            blog_id: id.0,
            log_no: id.1,
        });
    }

    composite_from_path(url).map(|(blog_id, log_no)| TargetId::BlogPost { blog_id, log_no })
}

/// Extracts `(club id, article id)` from a forum/cafe post URL.
///
/// Mirrors the blog contract: `…/ArticleRead.nhn?clubid={club_id}&articleid={article_id}`
/// query form preferred, `…/{club_id}/{article_id}` path form (all-digit
/// article segment) as fallback.
#[must_use]
pub fn extract_forum_post(url: &str) -> Option<TargetId> {
    if let Some(id) = composite_from_query(url, "ArticleRead", "clubid", "articleid") {
        return Some(TargetId::ForumPost {
            club_id: id.0,
            article_id: id.1,
        });
    }

    composite_from_path(url).map(|(club_id, article_id)| TargetId::ForumPost {
        club_id,
        article_id,
    })
}

/// Query-parameter form of a composite id: the URL path must contain
/// `sentinel`, and both parameters must be present and non-empty.
fn composite_from_query(
    url: &str,
    sentinel: &str,
    owner_param: &str,
    post_param: &str,
) -> Option<(String, String)> {
    if !url_path(url).contains(sentinel) {
        return None;
    }
    let owner = query_param(url, owner_param)?;
    let post = query_param(url, post_param)?;
    Some((owner.to_string(), post.to_string()))
}

/// Path form of a composite id: `/{owner}/{post}` where the post segment is
/// all digits.
fn composite_from_path(url: &str) -> Option<(String, String)> {
    let path = url_path(url);
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let post = segments.next()?;
    if post.is_empty() || !post.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((owner.to_string(), post.to_string()))
}

/// The path component of a URL, without scheme/host, query or fragment.
/// Tolerates scheme-less and path-only inputs.
fn url_path(url: &str) -> &str {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    match without_query.find("://") {
        Some(scheme_end) => {
            let after_scheme = &without_query[scheme_end + 3..];
            after_scheme
                .find('/')
                .map_or("", |slash| &after_scheme[slash..])
        }
        None => without_query,
    }
}

/// Value of the first non-empty occurrence of `name` in the query string.
/// Parameter names compare case-insensitively (Naver mixes `clubid` and
/// `clubId` across page generations).
fn query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    let query = query.split_once('#').map_or(query, |(q, _)| q);
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        (key.eq_ignore_ascii_case(name) && !value.is_empty()).then_some(value)
    })
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod extract_test;
