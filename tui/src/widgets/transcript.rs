//! Transcript Lines
//!
//! Turns the core's [`ViewItem`] list into styled, wrapped terminal lines.
//! All display rules live in the core; this module only decides glyphs,
//! colors and where lines break.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use textwrap::core::{break_words, display_width, Fragment, Word};
use textwrap::wrap_algorithms::wrap_first_fit;
use textwrap::WordSeparator;

use docs_chat_core::format::Segment;
use docs_chat_core::transcript::{Bubble, BubbleKind, CitationPanel, ViewItem};

use crate::theme::{self, ASSISTANT_TEXT, CODE, CODE_BG, ERROR_RED, USER_TEXT};

/// Left indent of message bodies
const INDENT: usize = 2;

/// Extra indent of citation details
const CITATION_INDENT: usize = 6;

/// Tab stop used for prose and code
const TAB: &str = "    ";

/// Build the transcript as wrapped lines for a `width`-column viewport
///
/// `tick` drives the typing indicator animation.
pub fn transcript_lines(items: &[ViewItem], width: usize, tick: u64) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if width <= CITATION_INDENT + 4 {
        return lines;
    }

    for item in items {
        match item {
            ViewItem::Welcome {
                title,
                subtitle,
                prompts,
            } => {
                push_wrapped(&mut lines, &[(title.to_string(), theme::accent())], width, 0);
                push_wrapped(&mut lines, &[(subtitle.to_string(), theme::panel())], width, 0);
                for prompt in prompts.iter() {
                    push_wrapped(&mut lines, &[(format!("• {prompt}"), theme::dim())], width, INDENT);
                }
            }
            ViewItem::Bubble(bubble) => push_bubble(&mut lines, bubble, width),
            ViewItem::Typing => {
                let dots = ["●  ", "●● ", "●●●"][usize::try_from(tick % 3).unwrap_or(0)];
                lines.push(Line::from(vec![
                    Span::styled("Assistant ", theme::panel().fg(ASSISTANT_TEXT).add_modifier(Modifier::BOLD)),
                    Span::styled(dots, theme::accent()),
                ]));
            }
        }
        lines.push(Line::styled("", theme::panel()));
    }

    lines
}

fn push_bubble(lines: &mut Vec<Line<'static>>, bubble: &Bubble, width: usize) {
    let (who, color) = match bubble.kind {
        BubbleKind::User => ("You", USER_TEXT),
        BubbleKind::Assistant => ("Assistant", ASSISTANT_TEXT),
        BubbleKind::Error => ("Assistant", ERROR_RED),
    };
    let marker = if bubble.selected { "› " } else { "" };
    lines.push(Line::from(vec![
        Span::styled(marker, theme::accent()),
        Span::styled(who, theme::panel().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {}", bubble.timestamp), theme::dim()),
    ]));

    let body_style = theme::panel().fg(color);
    let mut spans: Vec<(String, Style)> = Vec::new();
    if let Some(heading) = bubble.heading() {
        spans.push((format!("{heading} "), body_style.add_modifier(Modifier::BOLD)));
    }

    for segment in &bubble.segments {
        match segment {
            Segment::Text(text) => spans.push((text.clone(), body_style)),
            Segment::InlineCode(code) => spans.push((code.clone(), theme::panel().fg(CODE))),
            Segment::CodeBlock { language, code } => {
                push_wrapped(lines, &spans, width, INDENT);
                spans.clear();
                push_code_block(lines, language.as_deref(), code, width);
            }
        }
    }
    push_wrapped(lines, &spans, width, INDENT);

    if let Some(panel) = &bubble.citations {
        push_citations(lines, panel, width);
    }
}

fn push_code_block(lines: &mut Vec<Line<'static>>, language: Option<&str>, code: &str, width: usize) {
    let style = Style::default().fg(CODE).bg(CODE_BG);
    if let Some(lang) = language {
        lines.push(Line::from(vec![
            Span::styled(" ".repeat(INDENT), theme::panel()),
            Span::styled(format!(" {lang} "), theme::dim().add_modifier(Modifier::ITALIC)),
        ]));
    }
    let inner = width.saturating_sub(INDENT + 1).max(1);
    for raw in code.lines() {
        let raw = raw.replace('\t', TAB);
        // code is hard-wrapped at the column limit, never at word boundaries
        for chunk in break_words(std::iter::once(Word::from(raw.as_str())), inner) {
            let pad = inner.saturating_sub(display_width(chunk.word));
            lines.push(Line::from(vec![
                Span::styled(" ".repeat(INDENT), theme::panel()),
                Span::styled(format!("{}{}", chunk.word, " ".repeat(pad)), style),
            ]));
        }
    }
}

fn push_citations(lines: &mut Vec<Line<'static>>, panel: &CitationPanel, width: usize) {
    let chevron = if panel.expanded { "▾" } else { "▸" };
    lines.push(Line::from(vec![
        Span::styled(" ".repeat(INDENT), theme::panel()),
        Span::styled(format!("{chevron} {}", panel.toggle_label()), theme::accent()),
    ]));
    if !panel.expanded {
        return;
    }

    for entry in &panel.entries {
        push_wrapped(
            lines,
            &[
                (format!("[{}] ", entry.number), theme::accent()),
                (entry.label.clone(), theme::panel().add_modifier(Modifier::BOLD)),
                (format!("  {}", entry.score_label), theme::dim()),
            ],
            width,
            INDENT + 2,
        );
        push_wrapped(
            lines,
            &[(entry.excerpt.clone(), theme::dim().add_modifier(Modifier::ITALIC))],
            width,
            CITATION_INDENT,
        );
        if let Some(link) = &entry.link {
            push_wrapped(
                lines,
                &[(format!("View full chapter → {link}"), theme::accent().add_modifier(Modifier::UNDERLINED))],
                width,
                CITATION_INDENT,
            );
        }
    }
}

/// A wrapped word carrying the style of the run it came from
#[derive(Debug)]
struct StyledWord<'a> {
    word: Word<'a>,
    style: Style,
}

impl Fragment for StyledWord<'_> {
    fn width(&self) -> f64 {
        self.word.width()
    }

    fn whitespace_width(&self) -> f64 {
        self.word.whitespace_width()
    }

    fn penalty_width(&self) -> f64 {
        self.word.penalty_width()
    }
}

fn push_span(spans: &mut Vec<Span<'static>>, text: &str, style: Style) {
    if !text.is_empty() {
        spans.push(Span::styled(text.to_string(), style));
    }
}

/// Word-wrap styled spans into lines with a fixed left indent
///
/// Newlines inside spans start a new line, tabs expand to spaces. Words
/// wider than the line are split by character.
pub fn push_wrapped(lines: &mut Vec<Line<'static>>, spans: &[(String, Style)], width: usize, indent: usize) {
    if spans.iter().all(|(t, _)| t.is_empty()) {
        return;
    }
    let avail = width.saturating_sub(indent).max(1);
    let runs: Vec<(String, Style)> = spans.iter().map(|(t, s)| (t.replace('\t', TAB), *s)).collect();

    let mut paragraphs: Vec<Vec<StyledWord<'_>>> = vec![Vec::new()];
    for (text, style) in &runs {
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                paragraphs.push(Vec::new());
            }
            let words = break_words(WordSeparator::AsciiSpace.find_words(part), avail);
            if let Some(paragraph) = paragraphs.last_mut() {
                paragraph.extend(words.into_iter().map(|word| StyledWord { word, style: *style }));
            }
        }
    }
    if paragraphs.len() > 1 && paragraphs.last().is_some_and(Vec::is_empty) {
        paragraphs.pop();
    }

    let line_widths = [avail as f64];
    for paragraph in &paragraphs {
        if paragraph.is_empty() {
            lines.push(Line::styled(" ".repeat(indent), theme::panel()));
            continue;
        }
        for fragments in wrap_first_fit(paragraph, &line_widths) {
            let mut spans = vec![Span::styled(" ".repeat(indent), theme::panel())];
            let last = fragments.len().saturating_sub(1);
            for (i, fragment) in fragments.iter().enumerate() {
                push_span(&mut spans, fragment.word.word, fragment.style);
                if i < last {
                    push_span(&mut spans, fragment.word.whitespace, fragment.style);
                } else {
                    push_span(&mut spans, fragment.word.penalty, fragment.style);
                }
            }
            lines.push(Line::from(spans));
        }
    }
}

/// Plain text of a line, for tests and search
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}
