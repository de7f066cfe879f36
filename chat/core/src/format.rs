//! Text Formatting
//!
//! Pure helpers used when rendering the transcript:
//!
//! - [`segments`]: split message text into plain text and code spans
//! - [`format_relative`]: "5 minutes ago" style timestamps
//! - [`truncate_excerpt`] / [`score_percent`]: citation display rules
//!
//! Message text comes from a remote service, so every segment is passed
//! through [`sanitize`] and can never smuggle terminal control sequences.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};

/// Character budget for source excerpts
pub const EXCERPT_CHARS: usize = 150;

/// A run of message text with its rendering style
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Ordinary text
    Text(String),
    /// `inline code`
    InlineCode(String),
    /// A fenced block
    CodeBlock {
        /// Language hint from the opening fence, if any
        language: Option<String>,
        /// Block contents, trimmed
        code: String,
    },
}

impl Segment {
    /// The text this segment displays
    pub fn text(&self) -> &str {
        match self {
            Self::Text(s) | Self::InlineCode(s) => s,
            Self::CodeBlock { code, .. } => code,
        }
    }

    /// Whether this segment is rendered monospace
    pub fn is_code(&self) -> bool {
        !matches!(self, Self::Text(_))
    }
}

/// Split `content` into text, inline code and fenced code blocks
///
/// Fenced blocks are found first; inline spans are then looked for in the
/// text between them. An unmatched fence or backtick stays literal.
pub fn segments(content: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut rest = content;

    while let Some(start) = rest.find("```") {
        let after = &rest[start + 3..];
        let Some(end) = after.find("```") else {
            break;
        };
        push_inline(&mut out, &rest[..start]);
        out.push(code_block(&after[..end]));
        rest = &after[end + 3..];
    }

    push_inline(&mut out, rest);
    out
}

fn code_block(body: &str) -> Segment {
    // ```lang\n... : a bare word on the fence line is a language hint
    let (language, code) = match body.split_once('\n') {
        Some((first, remainder))
            if !first.trim().is_empty()
                && first
                    .trim()
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "+-#_.".contains(c)) =>
        {
            (Some(first.trim().to_string()), remainder)
        }
        _ => (None, body),
    };
    Segment::CodeBlock {
        language,
        code: sanitize(code.trim()),
    }
}

fn push_inline(out: &mut Vec<Segment>, text: &str) {
    let mut rest = text;
    while let Some(open) = rest.find('`') {
        let after = &rest[open + 1..];
        match after.find('`') {
            // "``" has nothing inside; the first backtick is literal
            Some(0) => {
                push_text(out, &rest[..=open]);
                rest = after;
            }
            Some(close) => {
                push_text(out, &rest[..open]);
                out.push(Segment::InlineCode(sanitize(&after[..close])));
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    push_text(out, rest);
}

fn push_text(out: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    let clean = sanitize(text);
    if let Some(Segment::Text(prev)) = out.last_mut() {
        prev.push_str(&clean);
    } else {
        out.push(Segment::Text(clean));
    }
}

/// Neutralize terminal control characters
///
/// Newlines and tabs are kept, carriage returns dropped, and every other
/// control character is written out as a visible escape (`\u{1b}`).
pub fn sanitize(text: &str) -> String {
    if !text.chars().any(|c| c.is_control() && c != '\n' && c != '\t') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' | '\t' => out.push(c),
            '\r' => {}
            c if c.is_control() => out.extend(c.escape_unicode()),
            c => out.push(c),
        }
    }
    out
}

/// Relative label for `timestamp` as seen at `now`, wall clock in local time
pub fn format_relative(now: DateTime<Utc>, timestamp: DateTime<Utc>) -> String {
    format_relative_in(now, timestamp, &Local)
}

/// [`format_relative`] with an explicit zone for the wall-clock fallback
pub fn format_relative_in<Tz>(now: DateTime<Utc>, timestamp: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let minutes = (now - timestamp).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes == 1 {
        return "1 minute ago".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} minutes ago");
    }

    let hours = minutes / 60;
    if hours == 1 {
        return "1 hour ago".to_string();
    }
    if hours < 24 {
        return format!("{hours} hours ago");
    }

    timestamp.with_timezone(tz).format("%H:%M").to_string()
}

/// First `budget` characters of `text`, with `...` appended iff anything was cut
pub fn truncate_excerpt(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Relevance score as a whole percentage, `round(score * 100)`
#[allow(clippy::cast_possible_truncation)]
pub fn score_percent(score: f64) -> i64 {
    (score * 100.0).round() as i64
}
