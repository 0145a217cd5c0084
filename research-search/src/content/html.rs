//! DOM helpers shared by the extraction strategies.

use scraper::{ElementRef, Html, Selector};

/// Elements removed (with their content) before content strategies run.
const CHROME_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "noscript", "svg", "iframe",
];

/// Elements that start a new line when flattening to text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure", "h1",
    "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section", "table",
    "td", "th", "tr", "ul",
];

/// Class/id fragments that mark navigation, promotion or consent widgets.
const NOISE_MARKERS: &[&str] = &[
    "nav", "menu", "sidebar", "footer", "header", "banner", "cookie", "consent", "advert",
    "promo", "subscribe", "newsletter", "share", "social", "comment", "related",
];

/// Parse a CSS selector that is known at compile time.
pub(crate) fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// First element matching any of `selectors`, tried in order.
pub(crate) fn first_match<'a>(document: &'a Html, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .filter_map(|css| selector(css))
        .find_map(|sel| document.select(&sel).next())
}

/// Text of the first element matching `css`, whitespace-collapsed.
pub(crate) fn first_text(document: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    document
        .select(&sel)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .find(|t| !t.is_empty())
}

/// `content` attribute of the first `<meta>` matching `css`.
pub(crate) fn meta_content(document: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    document
        .select(&sel)
        .filter_map(|el| el.value().attr("content"))
        .map(collapse_whitespace)
        .find(|c| !c.is_empty())
}

/// Flatten an element to text, one line per block-level element.
///
/// Inline markup stays on its line, so `<p>a <b>b</b> c</p>` yields `a b c`.
/// Chrome elements inside `element` are skipped.
pub(crate) fn block_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_block_text(element, &mut out);
    out
}

fn push_block_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if CHROME_TAGS.contains(&name) {
                continue;
            }
            if name == "br" {
                out.push('\n');
                continue;
            }
            let block = BLOCK_TAGS.contains(&name);
            if block {
                out.push('\n');
            }
            push_block_text(child_el, out);
            if block {
                out.push('\n');
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

/// Text directly inside `element`, ignoring child elements except `<br>`
/// and inline formatting.
pub(crate) fn own_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if name == "br" {
                out.push('\n');
            } else if !BLOCK_TAGS.contains(&name) && !CHROME_TAGS.contains(&name) {
                out.push_str(&child_el.text().collect::<String>());
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
    out
}

/// Lowercased `class` and `id` attributes of `element`.
pub(crate) fn class_and_id(element: &ElementRef<'_>) -> String {
    let value = element.value();
    let mut out = String::new();
    if let Some(class) = value.attr("class") {
        out.push_str(class);
        out.push(' ');
    }
    if let Some(id) = value.attr("id") {
        out.push_str(id);
    }
    out.to_ascii_lowercase()
}

/// `true` when the class or id of `element` names a page-chrome widget.
pub(crate) fn is_noise_container(element: &ElementRef<'_>) -> bool {
    let marks = class_and_id(element);
    !marks.is_empty() && NOISE_MARKERS.iter().any(|m| marks.contains(m))
}

/// Share of `element`'s characters that sit inside links, in `[0, 1]`.
pub(crate) fn link_density(element: &ElementRef<'_>) -> f64 {
    let total: usize = element.text().map(|t| t.chars().count()).sum();
    if total == 0 {
        return 0.0;
    }
    let Some(anchor) = selector("a") else {
        return 0.0;
    };
    let linked: usize = element
        .select(&anchor)
        .map(|a| a.text().map(|t| t.chars().count()).sum::<usize>())
        .sum();
    (linked as f64 / total as f64).min(1.0)
}

/// Collapse every whitespace run to a single space and trim.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove chrome elements and their content before parsing.
pub(crate) fn strip_chrome(html: &str) -> String {
    CHROME_TAGS
        .iter()
        .fold(html.to_owned(), |acc, tag| strip_tag(&acc, tag))
}

/// Remove all instances of `tag` and its content (case-insensitive).
fn strip_tag(html: &str, tag: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let open_tag = format!("<{tag}");
    let close_tag = format!("</{tag}>");
    let mut result = String::with_capacity(html.len());

    let mut pos = 0;
    while let Some(offset) = lower[pos..].find(&open_tag) {
        let start = pos + offset;
        let after = start + open_tag.len();

        // `<nav` must not match `<navigation-bar>`.
        let boundary = lower
            .as_bytes()
            .get(after)
            .map_or(true, |b| matches!(b, b' ' | b'>' | b'/' | b'\n' | b'\r' | b'\t'));
        if !boundary {
            result.push_str(&html[pos..after]);
            pos = after;
            continue;
        }

        result.push_str(&html[pos..start]);
        pos = match lower[start..].find(&close_tag) {
            Some(end) => start + end + close_tag.len(),
            None => lower[start..]
                .find('>')
                .map_or(html.len(), |end| start + end + 1),
        };
    }
    result.push_str(&html[pos..]);
    result
}
