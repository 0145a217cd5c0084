//! Research topic validation.

use crate::error::{AgentError, Result};

const MIN_TOPIC_CHARS: usize = 3;
const MAX_TOPIC_CHARS: usize = 500;

/// Longest allowed run of the first character at the start of a topic.
const MAX_LEADING_REPEAT: usize = 10;

/// This many consecutive uppercase letters is shouting spam.
const MAX_UPPERCASE_RUN: usize = 20;

/// Validate a topic, returning it trimmed.
///
/// Accepted topics are 3 to 500 characters after trimming, consist only of
/// ASCII letters, digits, punctuation and spaces, and match none of the
/// spam patterns (a leading run of eleven or more identical characters, an
/// embedded URL, a run of twenty or more capitals).
///
/// # Errors
///
/// Returns [`AgentError::InvalidTopic`] naming the first failed check.
///
/// # Examples
///
/// ```
/// use research_agent::validate_topic;
///
/// assert_eq!(validate_topic("  climate change mitigation ").unwrap(), "climate change mitigation");
/// assert!(validate_topic("see https://example.com").is_err());
/// ```
pub fn validate_topic(topic: &str) -> Result<&str> {
    let topic = topic.trim();
    let len = topic.chars().count();
    if len < MIN_TOPIC_CHARS || len > MAX_TOPIC_CHARS {
        return Err(AgentError::InvalidTopic(format!(
            "topic must be between {MIN_TOPIC_CHARS} and {MAX_TOPIC_CHARS} characters"
        )));
    }
    if let Some(bad) = topic
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || c.is_ascii_punctuation() || *c == ' '))
    {
        return Err(AgentError::InvalidTopic(format!(
            "unsupported character {bad:?}"
        )));
    }
    if leading_repeat(topic) > MAX_LEADING_REPEAT {
        return Err(AgentError::InvalidTopic("repeated characters".into()));
    }
    if topic.contains("http://") || topic.contains("https://") {
        return Err(AgentError::InvalidTopic("topics may not contain URLs".into()));
    }
    if longest_uppercase_run(topic) >= MAX_UPPERCASE_RUN {
        return Err(AgentError::InvalidTopic("too many consecutive capitals".into()));
    }
    Ok(topic)
}

/// Whether `topic` would pass [`validate_topic`].
pub fn is_valid_topic(topic: &str) -> bool {
    validate_topic(topic).is_ok()
}

fn leading_repeat(topic: &str) -> usize {
    let mut chars = topic.chars();
    match chars.next() {
        Some(first) => 1 + chars.take_while(|c| *c == first).count(),
        None => 0,
    }
}

fn longest_uppercase_run(topic: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in topic.chars() {
        if c.is_ascii_uppercase() {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
