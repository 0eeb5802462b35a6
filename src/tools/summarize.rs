//! Summarize tool - naive extractive summary of pasted notes

use super::{Tool, ToolContext, ToolOutput};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

/// Summarize tool
pub struct SummarizeTool;

#[derive(Debug, Deserialize)]
struct SummarizeInput {
    text: String,
}

/// Summary with word statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub original_words: usize,
    pub summary_words: usize,
    /// Negative when the summary came out longer than the input
    pub reduction_percent: i64,
}

/// Keep the leading sentences of `text`.
///
/// Up to three sentences are kept whole; up to ten yield three; longer
/// texts yield 30% of their sentences, capped at five.
pub fn summarize(text: &str) -> Result<Summary, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("Please enter some text to summarize.".to_string());
    }

    let sentences: Vec<&str> = text
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.is_empty() {
        return Err("No valid sentences found.".to_string());
    }

    let keep = match sentences.len() {
        n @ 0..=3 => n,
        4..=10 => 3,
        n => (n * 3).div_ceil(10).min(5),
    };

    let summary = format!("{}.", sentences[..keep].join(". "));
    let original_words = text.split_whitespace().count();
    let summary_words = summary.split_whitespace().count();

    Ok(Summary {
        reduction_percent: reduction_percent(original_words, summary_words),
        text: summary,
        original_words,
        summary_words,
    })
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)] // word counts are small
fn reduction_percent(original: usize, summary: usize) -> i64 {
    ((1.0 - summary as f64 / original as f64) * 100.0).round() as i64
}

#[async_trait]
impl Tool for SummarizeTool {
    fn name(&self) -> &'static str {
        "summarize"
    }

    fn description(&self) -> String {
        "Condense notes to their leading sentences and report how much shorter the result is."
            .to_string()
    }

    fn usage(&self) -> &'static str {
        "/summarize <text>"
    }

    async fn run(&self, input: Value, _ctx: ToolContext) -> ToolOutput {
        let input: SummarizeInput = match serde_json::from_value(input) {
            Ok(i) => i,
            Err(e) => return ToolOutput::error(format!("Invalid input: {e}")),
        };

        match summarize(&input.text) {
            Ok(summary) => ToolOutput::success(format!(
                "{}\n\nOriginal: {} words | Summary: {} words | Reduced by: {}%",
                summary.text, summary.original_words, summary.summary_words, summary.reduction_percent
            ))
            .with_display(json!({
                "summary": summary.text,
                "original_words": summary.original_words,
                "summary_words": summary.summary_words,
                "reduction_percent": summary.reduction_percent,
            })),
            Err(message) => ToolOutput::error(message),
        }
    }
}
