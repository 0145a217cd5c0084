//! Search orchestration: provider fallback, result cleaning, URL keys.
//!
//! [`search::Searcher`] tries one provider at a time until one answers,
//! then [`clean::clean_results`] trims, filters and dedups the hits by
//! their [`url_normalize::normalize_url`] key.

pub mod clean;
pub mod search;
pub mod url_normalize;

pub use search::{Provider, Searcher};
