//! CSS selectors for the store profile markup embedded in markers.
//!
//! Update this file when the locator changes its store card template.

use scraper::Selector;
use std::sync::LazyLock;

/// Link inside the store card subtitle; points at the retailer's own site.
pub static WEBSITE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.store-info-subtitle a").unwrap());

/// "Get directions" button; points at a maps provider.
pub static DIRECTIONS_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.js-get-directions").unwrap());

/// Attribute holding the link target.
pub static HREF_ATTR: &str = "href";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_compile() {
        LazyLock::force(&WEBSITE_LINK);
        LazyLock::force(&DIRECTIONS_LINK);
    }
}
