use scraper::Html;

use serprank_core::EntityKind;

use super::find_section;

#[test]
fn heading_ascends_to_nearest_section_element() {
    let html = r#"
        <html><body>
          <section id="news">뉴스</section>
          <section>
            <div><div><h2>플레이스</h2></div></div>
            <a href="https://map.naver.com/place/1">첫번째 업체</a>
          </section>
        </body></html>
    "#;
    let document = Html::parse_document(html);

    let section = find_section(&document, EntityKind::Listing).expect("section located");
    assert_eq!(section.value().name(), "section");
    let text: String = section.text().collect();
    assert!(text.contains("첫번째 업체"));
}

#[test]
fn heading_stops_at_ancestor_with_kind_token_in_class() {
    let html = r#"
        <html><body>
          <div class="api_subject_bx blog_wrap">
            <div class="title_area"><strong>인기글</strong></div>
            <ul><li><a href="https://blog.naver.com/writer/1">post</a></li></ul>
          </div>
        </body></html>
    "#;
    let document = Html::parse_document(html);

    let section = find_section(&document, EntityKind::BlogPost).expect("section located");
    assert!(section.value().attr("class").unwrap().contains("blog_wrap"));
}

#[test]
fn deep_heading_uses_best_effort_ancestor_at_max_depth() {
    // Five nested divs with no qualifying container: the 5th-level ancestor
    // is used as the section root.
    let html = r#"
        <html><body>
          <div id="outermost">
            <div><div><div><div>
              <span>카페</span>
              <a href="https://cafe.naver.com/club/1">글</a>
            </div></div></div></div>
          </div>
        </body></html>
    "#;
    let document = Html::parse_document(html);

    let section = find_section(&document, EntityKind::ForumPost).expect("section located");
    assert_eq!(section.value().id(), Some("outermost"));
}

#[test]
fn fallback_selectors_apply_when_no_heading_matches() {
    let html = r#"
        <html><body>
          <div id="loc-main-section-root">
            <a href="https://map.naver.com/place/9">업체</a>
          </div>
        </body></html>
    "#;
    let document = Html::parse_document(html);

    let section = find_section(&document, EntityKind::Listing).expect("fallback located");
    assert_eq!(section.value().id(), Some("loc-main-section-root"));
}

#[test]
fn missing_section_is_a_clean_none() {
    let html = "<html><body><p>관련 검색 결과가 없습니다.</p></body></html>";
    let document = Html::parse_document(html);

    assert!(find_section(&document, EntityKind::Listing).is_none());
    assert!(find_section(&document, EntityKind::BlogPost).is_none());
    assert!(find_section(&document, EntityKind::ForumPost).is_none());
}
