//! LLM summarization over the OpenAI Chat Completions and Anthropic
//! Messages APIs (non-streaming).

use serde::Deserialize;
use serde_json::json;

use super::SummaryError;
use crate::config::LlmSettings;

/// Characters of the combined buffer sent in the prompt.
const PROMPT_CONTENT_CHARS: usize = 3000;
const MAX_TOKENS: u32 = 800;
const TEMPERATURE: f64 = 0.3;
const ANTHROPIC_VERSION: &str = "2023-06-01";

const SYSTEM_PROMPT: &str =
    "You are a research assistant that creates structured summaries from academic and web content.";

/// Summary text and key points parsed from an LLM answer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LlmSummary {
    pub main_summary: String,
    pub key_points: Vec<String>,
}

fn prompt(text: &str, topic: &str) -> String {
    let content = research_search::content::truncate_chars(text, PROMPT_CONTENT_CHARS);
    format!(
        "Research Topic: {topic}\n\n\
         Please analyze the following research content and provide:\n\
         1. A comprehensive summary (2-3 paragraphs)\n\
         2. Key findings (bullet points)\n\
         3. Different viewpoints or debates (if any)\n\
         4. Gaps or limitations mentioned\n\n\
         Content:\n{content}\n\n\
         Please structure your response as a clear, academic summary."
    )
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Ask an OpenAI-compatible Chat Completions endpoint for a summary.
pub(crate) async fn openai(
    client: &reqwest::Client,
    settings: &LlmSettings,
    text: &str,
    topic: &str,
) -> Result<String, SummaryError> {
    const PROVIDER: &str = "OpenAI";
    let key = settings.key().ok_or(SummaryError::MissingKey(PROVIDER))?;
    let url = format!("{}/chat/completions", settings.endpoint.trim_end_matches('/'));
    let body = json!({
        "model": settings.model,
        "messages": [
            {"role": "system", "content": SYSTEM_PROMPT},
            {"role": "user", "content": prompt(text, topic)},
        ],
        "max_tokens": MAX_TOKENS,
        "temperature": TEMPERATURE,
    });

    let response = client
        .post(&url)
        .bearer_auth(key)
        .json(&body)
        .send()
        .await
        .map_err(|source| SummaryError::Request { provider: PROVIDER, source })?;
    let status = response.status();
    if !status.is_success() {
        return Err(SummaryError::Status { provider: PROVIDER, status });
    }
    let parsed: ChatResponse = response
        .json()
        .await
        .map_err(|source| SummaryError::Response { provider: PROVIDER, source })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(SummaryError::EmptyAnswer(PROVIDER))
}

/// Ask the Anthropic Messages endpoint for a summary.
pub(crate) async fn anthropic(
    client: &reqwest::Client,
    settings: &LlmSettings,
    text: &str,
    topic: &str,
) -> Result<String, SummaryError> {
    const PROVIDER: &str = "Anthropic";
    let key = settings.key().ok_or(SummaryError::MissingKey(PROVIDER))?;
    let url = format!("{}/v1/messages", settings.endpoint.trim_end_matches('/'));
    let body = json!({
        "model": settings.model,
        "max_tokens": MAX_TOKENS,
        "temperature": TEMPERATURE,
        "system": SYSTEM_PROMPT,
        "messages": [{"role": "user", "content": prompt(text, topic)}],
    });

    let response = client
        .post(&url)
        .header("x-api-key", key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&body)
        .send()
        .await
        .map_err(|source| SummaryError::Request { provider: PROVIDER, source })?;
    let status = response.status();
    if !status.is_success() {
        return Err(SummaryError::Status { provider: PROVIDER, status });
    }
    let parsed: MessagesResponse = response
        .json()
        .await
        .map_err(|source| SummaryError::Response { provider: PROVIDER, source })?;

    let text: Vec<String> = parsed
        .content
        .into_iter()
        .filter(|b| b.kind == "text")
        .filter_map(|b| b.text)
        .collect();
    if text.is_empty() {
        return Err(SummaryError::EmptyAnswer(PROVIDER));
    }
    Ok(text.join("\n"))
}

/// Split an LLM answer into summary prose and key points.
///
/// Lines before a "key findings" or "key points" heading (other than
/// markdown headings) form the summary; `- ` and `• ` bullets after it are
/// key points. Bullets before the heading and prose after it are dropped.
pub(crate) fn parse_response(
    answer: &str,
    max_key_points: usize,
) -> Result<LlmSummary, SummaryError> {
    let mut summary_lines: Vec<&str> = Vec::new();
    let mut key_points: Vec<String> = Vec::new();
    let mut in_points = false;

    for line in answer.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();
        if lower.contains("key findings") || lower.contains("key points") {
            in_points = true;
        } else if let Some(point) = line.strip_prefix("- ").or_else(|| line.strip_prefix("• ")) {
            if in_points {
                key_points.push(point.trim().to_owned());
            }
        } else if !in_points && !line.starts_with('#') {
            summary_lines.push(line);
        }
    }

    if summary_lines.is_empty() {
        return Err(SummaryError::NoSummaryText);
    }
    key_points.truncate(max_key_points);
    Ok(LlmSummary {
        main_summary: summary_lines.join(" "),
        key_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANSWER: &str = "## Summary\n\
        Mitigation requires deep cuts in emissions.\n\
        Renewables are now the cheapest source of new power.\n\
        \n\
        ## Key Findings\n\
        - Solar costs fell sharply\n\
        • Methane cuts act fastest\n\
        Some trailing prose.\n\
        - Forests matter";

    #[test]
    fn parses_summary_and_bullets() {
        let parsed = parse_response(ANSWER, 8).expect("parse");
        assert_eq!(
            parsed.main_summary,
            "Mitigation requires deep cuts in emissions. Renewables are now the cheapest source of new power."
        );
        assert_eq!(
            parsed.key_points,
            vec!["Solar costs fell sharply", "Methane cuts act fastest", "Forests matter"]
        );
    }

    #[test]
    fn key_points_are_capped() {
        let parsed = parse_response(ANSWER, 2).expect("parse");
        assert_eq!(parsed.key_points.len(), 2);
    }

    #[test]
    fn bullets_before_heading_are_not_summary() {
        let parsed = parse_response("Intro line.\n- stray bullet\nMore prose.", 8).expect("parse");
        assert_eq!(parsed.main_summary, "Intro line. More prose.");
        assert!(parsed.key_points.is_empty());
    }

    #[test]
    fn empty_answer_is_error() {
        assert!(matches!(
            parse_response("## Key points\n- only bullets", 8),
            Err(SummaryError::NoSummaryText)
        ));
        assert!(matches!(parse_response("", 8), Err(SummaryError::NoSummaryText)));
    }

    #[test]
    fn prompt_bounds_content() {
        let long = "z".repeat(5000);
        let text = prompt(&long, "topic");
        assert!(text.starts_with("Research Topic: topic"));
        assert!(text.contains(&"z".repeat(3000)));
        assert!(!text.contains(&"z".repeat(3001)));
    }
}
