//! Article link extraction from rendered article markup.

use percent_encoding::percent_decode_str;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::debug;

// Namespaced pages, anchors and query variants never match.
static ARTICLE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/wiki/([^:?#]+)$").unwrap());

/// Collect the distinct article titles linked from `html`, excluding links back
/// to `current_title` (compared case-insensitively).
///
/// Titles are percent-decoded and have underscores replaced by spaces before
/// comparison and insertion, so `/wiki/Programming_language` yields
/// `"Programming language"`.
pub fn extract_links(html: &str, current_title: &str) -> BTreeSet<String> {
    let document = Html::parse_fragment(html);
    let link_selector = Selector::parse("a[href]").unwrap();
    let current = current_title.to_lowercase();

    let mut links = BTreeSet::new();
    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(title) = article_title_from_href(href) else {
            continue;
        };
        if title.to_lowercase() == current {
            debug!("Skipping self link {}", href);
            continue;
        }
        links.insert(title);
    }

    links
}

/// Turn an intra-wiki href into an article title, if it points at an article.
pub fn article_title_from_href(href: &str) -> Option<String> {
    let captures = ARTICLE_LINK.captures(href)?;
    let segment = captures.get(1)?.as_str();
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    Some(decoded.replace('_', " "))
}
