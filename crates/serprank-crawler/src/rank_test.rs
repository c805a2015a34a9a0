use scraper::{Html, Selector};

use super::*;

fn listing_section_html(ids: &[u64]) -> String {
    let links: String = ids
        .iter()
        .map(|id| format!(r#"<li><a href="https://map.naver.com/place/{id}">업체 {id}</a></li>"#))
        .collect();
    format!("<html><body><section id=\"results\"><ul>{links}</ul></section></body></html>")
}

fn section_of(document: &Html) -> ElementRef<'_> {
    let selector = Selector::parse("#results").unwrap();
    document.select(&selector).next().expect("section present")
}

fn listing_target(id: &str) -> TargetId {
    TargetId::Listing {
        listing_id: id.to_string(),
    }
}

#[test]
fn duplicate_entity_consumes_one_rank_slot() {
    // Document order 5, 3, 5, 7: the second 5 does not advance the counter,
    // so 7 ranks third.
    let document = Html::parse_document(&listing_section_html(&[5, 3, 5, 7]));
    let rank = rank_in_section(section_of(&document), &listing_target("7"));
    assert_eq!(rank, Some(3));
}

#[test]
fn absent_target_yields_none() {
    let document = Html::parse_document(&listing_section_html(&[5, 3, 5, 7]));
    let rank = rank_in_section(section_of(&document), &listing_target("9"));
    assert_eq!(rank, None);
}

#[test]
fn first_entry_ranks_one() {
    let document = Html::parse_document(&listing_section_html(&[42, 1, 2]));
    let rank = rank_in_section(section_of(&document), &listing_target("42"));
    assert_eq!(rank, Some(1));
}

#[test]
fn unparseable_anchors_do_not_consume_rank_slots() {
    let html = r#"
        <html><body><section id="results">
          <a href="https://map.naver.com/place-home">no id</a>
          <a href="https://map.naver.com/place/10">first</a>
          <a href="https://example.com/place/99">wrong domain</a>
          <a href="https://map.naver.com/place/20">second</a>
        </section></body></html>
    "#;
    let document = Html::parse_document(html);
    let rank = rank_in_section(section_of(&document), &listing_target("20"));
    assert_eq!(rank, Some(2));
}

#[test]
fn blog_dedup_is_per_blogger_and_match_is_per_post() {
    // Two posts from the same blogger: the second link does not consume a
    // slot, and because de-dup keys on the blogger, the target post only
    // matches if it is that blogger's first-seen link.
    let html = r#"
        <html><body><section id="results">
          <a href="https://blog.naver.com/alpha/100">alpha 100</a>
          <a href="https://blog.naver.com/beta/200">beta 200</a>
          <a href="https://blog.naver.com/alpha/300">alpha 300</a>
          <a href="https://blog.naver.com/gamma/400">gamma 400</a>
        </section></body></html>
    "#;
    let document = Html::parse_document(html);

    let beta = TargetId::BlogPost {
        blog_id: "beta".to_string(),
        log_no: "200".to_string(),
    };
    assert_eq!(rank_in_section(section_of(&document), &beta), Some(2));

    let gamma = TargetId::BlogPost {
        blog_id: "gamma".to_string(),
        log_no: "400".to_string(),
    };
    assert_eq!(rank_in_section(section_of(&document), &gamma), Some(3));

    // alpha/300 is shadowed by alpha/100, which claimed the blogger's slot.
    let shadowed = TargetId::BlogPost {
        blog_id: "alpha".to_string(),
        log_no: "300".to_string(),
    };
    assert_eq!(rank_in_section(section_of(&document), &shadowed), None);
}

#[test]
fn forum_entries_rank_like_blog_entries() {
    let html = r#"
        <html><body><section id="results">
          <a href="https://cafe.naver.com/ArticleRead.nhn?clubid=111&articleid=1">one</a>
          <a href="https://cafe.naver.com/ArticleRead.nhn?clubid=222&articleid=2">two</a>
        </section></body></html>
    "#;
    let document = Html::parse_document(html);

    let target = TargetId::ForumPost {
        club_id: "222".to_string(),
        article_id: "2".to_string(),
    };
    assert_eq!(rank_in_section(section_of(&document), &target), Some(2));
}
