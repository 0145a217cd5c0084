//! The four extraction strategies, dispatched by [`ExtractionMethod`].
//!
//! A strategy either locates candidate text on the page or explains why it
//! could not. Length thresholds are applied by the caller after cleaning,
//! so every strategy is judged on the same cleaned text.

use scraper::{ElementRef, Html};

use super::html::{
    block_text, class_and_id, collapse_whitespace, first_match, is_noise_container,
    link_density, own_text, selector, strip_chrome,
};
use super::metadata;
use crate::types::ExtractionMethod;

/// Containers that mark the body of a news or blog article.
const ARTICLE_CONTAINERS: &[&str] = &[
    "article",
    r#"[itemprop="articleBody"]"#,
    ".article-body",
    ".article-content",
    ".post-content",
    ".entry-content",
    ".story-body",
];

/// Main-content containers for the raw scrape, in preference order.
const RAW_CONTAINERS: &[&str] = &["main", "article", ".content", ".post", ".entry", "body"];

/// Class/id fragments that suggest a main-content container.
const POSITIVE_MARKERS: &[&str] = &[
    "article", "body", "content", "entry", "main", "page", "post", "story", "text",
];

/// Paragraph-like nodes shorter than this do not contribute to readability scores.
const MIN_PARAGRAPH_CHARS: usize = 25;

/// Boilerplate blocks whose text is mostly links are dropped.
const MAX_BLOCK_LINK_DENSITY: f64 = 0.5;

/// A parsed page: the original document for metadata and a copy with
/// chrome elements removed for text.
pub(crate) struct Page {
    source: Html,
    body: Html,
}

impl Page {
    pub(crate) fn parse(html: &str) -> Self {
        Self {
            source: Html::parse_document(html),
            body: Html::parse_document(&strip_chrome(html)),
        }
    }
}

/// Uncleaned output of one strategy.
#[derive(Debug, Default)]
pub(crate) struct Candidate {
    pub title: String,
    pub text: String,
    pub summary: Option<String>,
    pub authors: Vec<String>,
    pub publish_date: Option<String>,
}

/// Run one strategy over `page`. `Err` carries the reason it found nothing.
pub(crate) fn run(method: ExtractionMethod, page: &Page) -> Result<Candidate, String> {
    match method {
        ExtractionMethod::Article => article(page),
        ExtractionMethod::Boilerplate => boilerplate(page),
        ExtractionMethod::Readability => readability(page),
        ExtractionMethod::Raw => raw(page),
    }
}

fn article(page: &Page) -> Result<Candidate, String> {
    let container = first_match(&page.body, ARTICLE_CONTAINERS)
        .ok_or_else(|| "no article container".to_owned())?;

    let paragraphs: Vec<String> = match selector("p") {
        Some(p) => container
            .select(&p)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .collect(),
        None => Vec::new(),
    };
    let text = if paragraphs.is_empty() {
        block_text(container)
    } else {
        paragraphs.join("\n")
    };

    Ok(Candidate {
        title: metadata::article_title(&page.source),
        text,
        summary: metadata::description(&page.source),
        authors: metadata::authors(&page.source),
        publish_date: metadata::publish_date(&page.source),
    })
}

fn boilerplate(page: &Page) -> Result<Candidate, String> {
    let blocks_sel =
        selector("p, li, blockquote, pre").ok_or_else(|| "invalid block selector".to_owned())?;

    let mut blocks: Vec<String> = Vec::new();
    for block in page.body.select(&blocks_sel) {
        if inside_block(&block) || inside_noise(&block) {
            continue;
        }
        if link_density(&block) > MAX_BLOCK_LINK_DENSITY {
            continue;
        }
        let text = collapse_whitespace(&block.text().collect::<String>());
        if !text.is_empty() {
            blocks.push(text);
        }
    }

    if blocks.is_empty() {
        return Err("no content blocks".to_owned());
    }

    Ok(Candidate {
        title: metadata::article_title(&page.source),
        text: blocks.join("\n"),
        summary: None,
        authors: metadata::authors(&page.source),
        publish_date: metadata::publish_date(&page.source),
    })
}

/// `true` when a block sits inside another paragraph-level block, which is
/// selected on its own.
fn inside_block(element: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| matches!(a.value().name(), "p" | "li" | "blockquote" | "pre"))
}

/// `true` when the element or a container below `<body>` is page chrome.
fn inside_noise(element: &ElementRef<'_>) -> bool {
    is_noise_container(element)
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .take_while(|a| !matches!(a.value().name(), "body" | "html"))
            .any(|a| is_noise_container(&a))
}

fn readability(page: &Page) -> Result<Candidate, String> {
    let paragraph_sel =
        selector("p, pre, td, div").ok_or_else(|| "invalid paragraph selector".to_owned())?;

    let mut scores = Vec::new();
    for node in page.body.select(&paragraph_sel) {
        let raw = if node.value().name() == "div" {
            own_text(node)
        } else {
            node.text().collect::<String>()
        };
        let text = collapse_whitespace(&raw);
        let len = text.chars().count();
        if len < MIN_PARAGRAPH_CHARS {
            continue;
        }

        let score = 1.0 + text.matches(',').count() as f64 + (len / 100).min(3) as f64;

        let Some(parent) = node.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        bump(&mut scores, parent.id(), || initial_score(&parent), score);

        if let Some(grandparent) = parent.parent().and_then(ElementRef::wrap) {
            bump(
                &mut scores,
                grandparent.id(),
                || initial_score(&grandparent),
                score / 2.0,
            );
        }
    }

    let best = scores
        .into_iter()
        .filter_map(|(id, score)| {
            let element = page.body.tree.get(id).and_then(ElementRef::wrap)?;
            Some((element, score * (1.0 - link_density(&element))))
        })
        .fold(None::<(ElementRef<'_>, f64)>, |best, (el, score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((el, score)),
        });

    let (container, score) = best.ok_or_else(|| "no scoring candidates".to_owned())?;
    tracing::trace!(
        tag = container.value().name(),
        score,
        "readability candidate selected"
    );

    Ok(Candidate {
        title: metadata::document_title(&page.source).unwrap_or_default(),
        text: block_text(container),
        ..Candidate::default()
    })
}

/// Add `delta` to `key`'s score, initialising it first if absent.
fn bump<K: PartialEq + Copy>(
    scores: &mut Vec<(K, f64)>,
    key: K,
    initial: impl FnOnce() -> f64,
    delta: f64,
) {
    match scores.iter_mut().find(|(k, _)| *k == key) {
        Some((_, score)) => *score += delta,
        None => scores.push((key, initial() + delta)),
    }
}

/// Starting score of a container from its tag and class/id.
fn initial_score(element: &ElementRef<'_>) -> f64 {
    let tag = match element.value().name() {
        "article" => 10.0,
        "div" | "section" | "main" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    };
    tag + class_weight(element)
}

fn class_weight(element: &ElementRef<'_>) -> f64 {
    let marks = class_and_id(element);
    if marks.is_empty() {
        return 0.0;
    }
    let mut weight = 0.0;
    if is_noise_container(element) {
        weight -= 25.0;
    }
    if POSITIVE_MARKERS.iter().any(|m| marks.contains(m)) {
        weight += 25.0;
    }
    weight
}

fn raw(page: &Page) -> Result<Candidate, String> {
    let root = first_match(&page.body, RAW_CONTAINERS)
        .ok_or_else(|| "document has no body".to_owned())?;

    Ok(Candidate {
        title: metadata::document_title(&page.source).unwrap_or_default(),
        text: block_text(root),
        ..Candidate::default()
    })
}
