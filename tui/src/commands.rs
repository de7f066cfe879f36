//! One-shot Commands
//!
//! `ask`, `retrieve` and `health` talk to the service once, print the result
//! and exit. They share the client and citation formatting with the widget.

use std::io::Write;

use anyhow::{bail, Context};
use serde_json::Value;

use docs_chat_core::api::{AnswerRequest, RagApi, RetrieveFilter};
use docs_chat_core::format::sanitize;
use docs_chat_core::transcript::{CitationEntry, TranscriptUi};

/// Parse one `key=value` retrieve filter
///
/// The value is read as JSON when it parses (numbers, booleans), otherwise
/// it is taken as a plain string.
pub fn parse_filter(raw: &str) -> anyhow::Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("Filter '{raw}' is not in key=value form");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Filter '{raw}' has an empty key");
    }
    let value = value.trim();
    let value = serde_json::from_str::<Value>(value)
        .ok()
        .filter(|v| !v.is_object() && !v.is_array())
        .unwrap_or_else(|| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Collect `key=value` arguments into a filter, `None` when there are none
pub fn build_filter(raw: &[String]) -> anyhow::Result<Option<RetrieveFilter>> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.iter()
        .map(|r| parse_filter(r))
        .collect::<anyhow::Result<RetrieveFilter>>()
        .map(Some)
}

fn write_citation(out: &mut impl Write, entry: &CitationEntry) -> std::io::Result<()> {
    writeln!(out, "  [{}] {} ({})", entry.number, entry.label, entry.score_label)?;
    writeln!(out, "      {}", entry.excerpt)?;
    if let Some(link) = &entry.link {
        writeln!(out, "      {link}")?;
    }
    Ok(())
}

/// Ask one question and print the answer with its sources
pub async fn run_ask(
    api: &dyn RagApi,
    ui: &TranscriptUi,
    question: &str,
    module: Option<String>,
    selection: Option<&str>,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let question = question.trim();
    if question.is_empty() {
        bail!("Question is empty");
    }

    let mut request = AnswerRequest::new(question).with_module(module);
    if let Some(text) = selection.filter(|t| !t.trim().is_empty()) {
        request = request.with_selection(text);
    }

    let response = api.answer_question(&request).await?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&response)?)?;
        return Ok(());
    }

    writeln!(out, "{}", sanitize(response.answer.trim()))?;
    if !response.sources.is_empty() {
        writeln!(out)?;
        writeln!(out, "Sources ({}):", response.sources.len())?;
        for (i, source) in response.sources.iter().enumerate() {
            write_citation(out, &ui.citation(i + 1, source))?;
        }
    }
    let meta = &response.metadata;
    writeln!(out)?;
    writeln!(
        out,
        "model {} · retrieval {:.0} ms · generation {:.0} ms",
        if meta.model.is_empty() { "unknown" } else { &meta.model },
        meta.retrieval_time_ms,
        meta.generation_time_ms
    )?;
    Ok(())
}

/// Retrieve chunks without generating an answer
pub async fn run_retrieve(
    api: &dyn RagApi,
    ui: &TranscriptUi,
    query: &str,
    top_k: u32,
    filters: &[String],
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let filter = build_filter(filters)?;
    let chunks = api
        .retrieve_chunks(query, top_k, filter.as_ref())
        .await?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&chunks)?)?;
        return Ok(());
    }
    if chunks.is_empty() {
        writeln!(out, "No matching chunks.")?;
        return Ok(());
    }
    for (i, source) in chunks.iter().enumerate() {
        let entry = ui.citation(i + 1, source);
        writeln!(out, "  [{}] {} ({}) {}", entry.number, entry.label, entry.score_label, entry.chunk_id)?;
        writeln!(out, "      {}", entry.excerpt)?;
    }
    Ok(())
}

/// Check service health; `Ok(false)` when the service is unavailable
pub async fn run_health(api: &dyn RagApi, out: &mut impl Write) -> anyhow::Result<bool> {
    match api.check_health().await {
        Ok(health) => {
            let version = health
                .version
                .map(|v| format!(" (version {v})"))
                .unwrap_or_default();
            writeln!(out, "{}{version}", health.status).context("Failed to write output")?;
            Ok(true)
        }
        Err(e) => {
            writeln!(out, "unavailable: {}", e.message()).context("Failed to write output")?;
            Ok(false)
        }
    }
}
