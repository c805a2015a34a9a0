//! Section location inside a rendered search results page.
//!
//! The results page interleaves many modules (ads, news, maps, posts); each
//! entity kind is ranked only within its own section. Location is a
//! two-tier strategy:
//!
//! 1. Find a heading-like element whose text contains the kind's
//!    human-readable label, then ascend at most [`MAX_ANCESTOR_DEPTH`]
//!    parents to the nearest structural container.
//! 2. Fall back to an ordered list of CSS selectors that have denoted the
//!    section in past page generations; first match wins.
//!
//! Both heuristics are site-specific and fragile by nature, which is why
//! they are isolated here: the ranking algorithm in [`crate::rank`] never
//! looks at how the section was found.

use scraper::{ElementRef, Html, Selector};

use serprank_core::EntityKind;

/// How far above a matched heading the structural container is searched for.
const MAX_ANCESTOR_DEPTH: usize = 5;

/// Site-specific knowledge for locating one kind's section.
pub(crate) struct SectionProfile {
    /// Localized label shown in the section heading.
    pub heading_label: &'static str,
    /// Tokens an ancestor's id/class may carry to qualify as the section
    /// container.
    pub container_tokens: &'static [&'static str],
    /// Historical selectors for the section, tried in order when no heading
    /// matches.
    pub fallback_selectors: &'static [&'static str],
}

static LISTING_PROFILE: SectionProfile = SectionProfile {
    heading_label: "플레이스",
    container_tokens: &["place", "loc"],
    fallback_selectors: &[
        "#loc-main-section-root",
        "div[data-hveid=\"place\"]",
        "section.sc_new.cs_common_module.case_place",
        "div.place_section",
    ],
};

static BLOG_PROFILE: SectionProfile = SectionProfile {
    heading_label: "인기글",
    container_tokens: &["sc_new", "blog"],
    fallback_selectors: &[
        "section.sc_new.cs_common_module.case_normal",
        "div.fds-collection-root",
    ],
};

static FORUM_PROFILE: SectionProfile = SectionProfile {
    heading_label: "카페",
    container_tokens: &["sc_new", "cafe"],
    fallback_selectors: &[
        "section.sc_new.cs_common_module.case_cafe",
        "div.cafe_section",
    ],
};

pub(crate) fn profile(kind: EntityKind) -> &'static SectionProfile {
    match kind {
        EntityKind::Listing => &LISTING_PROFILE,
        EntityKind::BlogPost => &BLOG_PROFILE,
        EntityKind::ForumPost => &FORUM_PROFILE,
    }
}

/// Locates the section root for `kind` in a parsed results page.
///
/// Returns `None` when neither tier matches; callers treat that as a valid
/// "entity not observed" outcome, not an error.
#[must_use]
pub fn find_section(document: &Html, kind: EntityKind) -> Option<ElementRef<'_>> {
    let profile = profile(kind);

    let heading_selector = Selector::parse("h2, h3, strong, span").expect("valid selector");
    let heading = document.select(&heading_selector).find(|el| {
        el.text()
            .any(|fragment| fragment.contains(profile.heading_label))
    });
    if let Some(heading) = heading {
        if let Some(section) = ascend_to_container(heading, profile) {
            return Some(section);
        }
    }

    profile.fallback_selectors.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        document.select(&selector).next()
    })
}

/// Walks up from a matched heading to the first ancestor that looks like a
/// structural section container. If no qualifying ancestor exists within
/// [`MAX_ANCESTOR_DEPTH`] levels, the deepest ancestor reached is used as a
/// best-effort section root; running out of parents yields `None` so the
/// fallback selectors get a chance.
fn ascend_to_container<'a>(
    heading: ElementRef<'a>,
    profile: &SectionProfile,
) -> Option<ElementRef<'a>> {
    let mut current = heading;
    for _ in 0..MAX_ANCESTOR_DEPTH {
        let parent = current.parent().and_then(ElementRef::wrap)?;
        current = parent;
        if is_container(current, profile) {
            return Some(current);
        }
    }
    Some(current)
}

fn is_container(element: ElementRef<'_>, profile: &SectionProfile) -> bool {
    let value = element.value();
    if value.name().eq_ignore_ascii_case("section") {
        return true;
    }
    let id_matches = value
        .id()
        .is_some_and(|id| profile.container_tokens.iter().any(|t| id.contains(t)));
    let class_matches = value.attr("class").is_some_and(|classes| {
        profile.container_tokens.iter().any(|t| classes.contains(t))
    });
    id_matches || class_matches
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod locator_test;
