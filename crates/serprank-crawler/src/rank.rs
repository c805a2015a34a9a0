//! Rank determination within a located section.
//!
//! Candidate entries are the section's anchor elements whose link target
//! matches the kind's canonical link pattern, processed in document order.
//! Entries de-duplicate on the entity key — the same place or blogger can
//! carry several links but consumes one rank slot — and enumeration stops
//! at the first match of the target.

use std::collections::HashSet;

use scraper::{ElementRef, Selector};

use serprank_core::EntityKind;

use crate::extract::TargetId;

/// Substrings an anchor's href must all contain to count as an entry of the
/// kind's section.
fn link_markers(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Listing => &["map.naver.com", "place"],
        EntityKind::BlogPost => &["blog.naver.com"],
        EntityKind::ForumPost => &["cafe.naver.com"],
    }
}

/// Returns the 1-based position of `target` among the de-duplicated entries
/// of `section`, or `None` when the target is not present.
///
/// Anchors that do not parse to an entity id are skipped without consuming
/// a rank slot; repeated entity keys likewise. Enumeration short-circuits
/// as soon as the target matches.
#[must_use]
pub fn rank_in_section(section: ElementRef<'_>, target: &TargetId) -> Option<u32> {
    let kind = target.kind();
    let markers = link_markers(kind);
    let anchor_selector = Selector::parse("a[href]").expect("valid selector");

    let mut seen: HashSet<String> = HashSet::new();
    let mut rank: u32 = 0;

    for anchor in section.select(&anchor_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !markers.iter().all(|marker| href.contains(marker)) {
            continue;
        }
        let Some(candidate) = TargetId::from_url(kind, href) else {
            continue;
        };
        if !seen.insert(candidate.dedup_key().to_string()) {
            continue;
        }
        rank += 1;
        if target.matches(&candidate) {
            return Some(rank);
        }
    }

    None
}

#[cfg(test)]
#[path = "rank_test.rs"]
mod rank_test;
