//! Page metadata: title, description, authors and publish date.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use scraper::Html;

use super::html::{first_text, meta_content, selector};

/// Author bylines longer than this are treated as prose, not names.
const MAX_AUTHOR_CHARS: usize = 80;

/// Authors kept per page.
const MAX_AUTHORS: usize = 10;

const AUTHOR_META: &[&str] = &[
    r#"meta[name="author"]"#,
    r#"meta[property="article:author"]"#,
    r#"meta[name="dc.creator"]"#,
    r#"meta[name="parsely-author"]"#,
];

const AUTHOR_ELEMENTS: &[&str] = &[
    r#"[itemprop="author"] [itemprop="name"]"#,
    r#"[itemprop="author"]"#,
    r#"[rel="author"]"#,
    ".byline",
    ".author",
];

const DATE_META: &[&str] = &[
    r#"meta[property="article:published_time"]"#,
    r#"meta[itemprop="datePublished"]"#,
    r#"meta[name="pubdate"]"#,
    r#"meta[name="publish-date"]"#,
    r#"meta[name="date"]"#,
    r#"meta[name="dc.date"]"#,
];

/// Title preferring social metadata, then `<title>`, then the first `<h1>`.
pub(crate) fn article_title(document: &Html) -> String {
    meta_content(document, r#"meta[property="og:title"]"#)
        .or_else(|| document_title(document))
        .unwrap_or_default()
}

/// `<title>` text, falling back to the first `<h1>`.
pub(crate) fn document_title(document: &Html) -> Option<String> {
    first_text(document, "title").or_else(|| first_text(document, "h1"))
}

/// Meta or OpenGraph description.
pub(crate) fn description(document: &Html) -> Option<String> {
    meta_content(document, r#"meta[name="description"]"#)
        .or_else(|| meta_content(document, r#"meta[property="og:description"]"#))
}

/// Author names from meta tags or byline markup, deduplicated in order.
pub(crate) fn authors(document: &Html) -> Vec<String> {
    let mut raw: Vec<String> = Vec::new();

    for css in AUTHOR_META {
        if let Some(content) = meta_content(document, css) {
            if !content.starts_with("http") {
                raw.push(content);
            }
        }
    }
    if raw.is_empty() {
        for css in AUTHOR_ELEMENTS {
            let Some(sel) = selector(css) else {
                continue;
            };
            raw.extend(
                document
                    .select(&sel)
                    .map(|el| el.text().collect::<Vec<_>>().join(" ")),
            );
            if !raw.is_empty() {
                break;
            }
        }
    }

    let mut names: Vec<String> = Vec::new();
    for entry in &raw {
        for name in split_byline(entry) {
            if names.len() == MAX_AUTHORS {
                return names;
            }
            if !names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
                names.push(name);
            }
        }
    }
    names
}

/// Split a byline such as `"By Ada Lovelace and Alan Turing"` into names.
fn split_byline(byline: &str) -> Vec<String> {
    let collapsed = byline.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = ["By ", "by ", "BY "]
        .iter()
        .find_map(|p| collapsed.strip_prefix(p))
        .unwrap_or(collapsed.as_str());

    trimmed
        .replace(" and ", ",")
        .replace(" & ", ",")
        .split([',', ';', '|'])
        .map(str::trim)
        .filter(|n| {
            let len = n.chars().count();
            len > 1 && len <= MAX_AUTHOR_CHARS && n.chars().any(char::is_alphabetic)
        })
        .map(str::to_owned)
        .collect()
}

/// Publish date from article metadata or a `<time datetime>` element.
pub(crate) fn publish_date(document: &Html) -> Option<String> {
    let from_meta = DATE_META
        .iter()
        .find_map(|css| meta_content(document, css));

    let raw = from_meta.or_else(|| {
        let sel = selector("time[datetime]")?;
        document
            .select(&sel)
            .filter_map(|el| el.value().attr("datetime"))
            .map(str::trim)
            .find(|d| !d.is_empty())
            .map(str::to_owned)
    })?;

    Some(normalize_date(&raw))
}

/// Normalise a date string to ISO-8601 when one of the known formats
/// parses, otherwise return it trimmed.
pub fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.to_rfc3339();
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.to_rfc3339();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.format("%Y-%m-%dT%H:%M:%S").to_string();
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    raw.to_owned()
}
