//! Extraction of links from the store profile markup.

use crate::locator::models::StoreLinks;
use crate::locator::selectors::{DIRECTIONS_LINK, HREF_ATTR, WEBSITE_LINK};
use scraper::{Html, Selector};
use tracing::trace;

/// Pulls the website and directions links out of a store card fragment.
///
/// Never fails: anything that does not match leaves the link empty.
pub fn extract_links(html: &str) -> StoreLinks {
    if html.trim().is_empty() {
        return StoreLinks::default();
    }

    let fragment = Html::parse_fragment(html);
    let links = StoreLinks {
        website_url: first_href(&fragment, &WEBSITE_LINK),
        maps_url: first_href(&fragment, &DIRECTIONS_LINK),
    };

    trace!("Extracted links: website={:?} maps={:?}", links.website_url, links.maps_url);
    links
}

fn first_href(fragment: &Html, selector: &Selector) -> String {
    fragment
        .select(selector)
        .next()
        .and_then(|e| e.value().attr(HREF_ATTR))
        .map(String::from)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORE_CARD: &str = r#"
        <div class="store-info">
            <h3 class="store-info-name">Deportes Montaña</h3>
            <span class="store-info-subtitle">
                <a href="https://deportesmontana.es" target="_blank">deportesmontana.es</a>
            </span>
            <div class="store-info-actions">
                <a class="btn js-get-directions" href="https://maps.google.com/?daddr=40.41,-3.70">Get directions</a>
            </div>
        </div>
    "#;

    #[test]
    fn test_extract_both_links() {
        let links = extract_links(STORE_CARD);

        assert_eq!(links.website_url, "https://deportesmontana.es");
        assert_eq!(links.maps_url, "https://maps.google.com/?daddr=40.41,-3.70");
    }

    #[test]
    fn test_no_matching_anchors() {
        let html = r#"<div><a href="/elsewhere">x</a><span class="other"><a href="/y">y</a></span></div>"#;
        let links = extract_links(html);

        assert_eq!(links.website_url, "");
        assert_eq!(links.maps_url, "");
    }

    #[test]
    fn test_empty_markup() {
        assert_eq!(extract_links(""), StoreLinks::default());
        assert_eq!(extract_links("   \n"), StoreLinks::default());
    }

    #[test]
    fn test_first_match_wins() {
        let html = r#"
            <span class="store-info-subtitle"><a href="https://first.example">1</a></span>
            <span class="store-info-subtitle"><a href="https://second.example">2</a></span>
            <a class="js-get-directions" href="https://maps.example/1">go</a>
            <a class="js-get-directions" href="https://maps.example/2">go</a>
        "#;
        let links = extract_links(html);

        assert_eq!(links.website_url, "https://first.example");
        assert_eq!(links.maps_url, "https://maps.example/1");
    }

    #[test]
    fn test_anchor_without_href() {
        let html = r#"<span class="store-info-subtitle"><a>no link</a></span>"#;
        assert_eq!(extract_links(html).website_url, "");
    }

    #[test]
    fn test_only_directions() {
        let html = r#"<a class="js-get-directions" href="https://maps.example/5">go</a>"#;
        let links = extract_links(html);

        assert_eq!(links.website_url, "");
        assert_eq!(links.maps_url, "https://maps.example/5");
    }

    #[test]
    fn test_malformed_markup_degrades() {
        let html = r#"<span class="store-info-subtitle"><a href="https://ok.example">ok</span><div><<"#;
        assert_eq!(extract_links(html).website_url, "https://ok.example");
    }
}
