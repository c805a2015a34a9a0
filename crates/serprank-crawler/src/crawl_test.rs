use serprank_core::EntityKind;

use crate::crawl::{rank_in_html, search_url};
use crate::extract::TargetId;

#[test]
fn search_url_picks_the_vertical_for_the_kind() {
    assert_eq!(
        search_url(EntityKind::Listing, "맛집"),
        "https://search.naver.com/search.naver?where=nexearch&query=%EB%A7%9B%EC%A7%91"
    );
    assert!(search_url(EntityKind::BlogPost, "x").contains("where=blog"));
    assert!(search_url(EntityKind::ForumPost, "x").contains("where=article"));
}

#[test]
fn search_url_escapes_reserved_characters() {
    let url = search_url(EntityKind::Listing, "a&b c");
    assert!(url.ends_with("query=a%26b%20c"));
}

#[test]
fn rank_in_html_finds_target_inside_located_section() {
    let html = r#"
        <html><body>
          <section id="loc-area">
            <h2>플레이스</h2>
            <a href="https://map.naver.com/place/11">one</a>
            <a href="https://map.naver.com/place/22">two</a>
            <a href="https://map.naver.com/place/33">three</a>
          </section>
          <div>
            <a href="https://map.naver.com/place/22">decoy outside the section</a>
          </div>
        </body></html>
    "#;
    let target = TargetId::Listing {
        listing_id: "22".to_owned(),
    };
    assert_eq!(rank_in_html(html, EntityKind::Listing, &target), Some(2));
}

#[test]
fn rank_in_html_without_the_section_is_none() {
    let html = "<html><body><p>no results</p></body></html>";
    let target = TargetId::Listing {
        listing_id: "22".to_owned(),
    };
    assert_eq!(rank_in_html(html, EntityKind::Listing, &target), None);
}

#[test]
fn rank_in_html_ignores_entries_in_other_sections() {
    // The blog section is present but the target only appears in an
    // unrelated part of the page.
    let html = r#"
        <html><body>
          <div class="sc_new blog">
            <h2>인기글</h2>
            <a href="https://blog.naver.com/alpha/100">listed</a>
          </div>
          <a href="https://blog.naver.com/target/200">elsewhere</a>
        </body></html>
    "#;
    let target = TargetId::BlogPost {
        blog_id: "target".to_owned(),
        log_no: "200".to_owned(),
    };
    assert_eq!(rank_in_html(html, EntityKind::BlogPost, &target), None);
}
