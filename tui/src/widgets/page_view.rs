//! Page View
//!
//! The documentation page the widget floats over: a borderless, scrollable
//! Markdown text region.

use std::path::{Path, PathBuf};

use anyhow::Context;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

use docs_chat_core::format::sanitize;
use docs_chat_core::page::PageContext;

/// Shown when no page file is given
const LANDING_PAGE: &str = "\
# Course Documentation

Welcome! This terminal view stands in for the documentation site.

Open a chapter with `docs-chat --page docs/<module>/<chapter>.md` and the
assistant will know which module you are reading.

## Using the assistant

- Press `c` to open the chat panel in the bottom-right corner.
- Ask a question and press Enter. Answers cite the passages they are based on.
- Press `s` to ask about the part of the page currently on screen.
- Press Esc to minimize the panel again; a badge appears when a new answer arrives.
";

/// A loaded documentation page
#[derive(Clone, Debug)]
pub struct PageDocument {
    /// File the page was read from
    pub path: Option<PathBuf>,
    /// Markdown body, front matter removed
    pub body: String,
    /// Module/chapter/title
    pub context: PageContext,
}

impl PageDocument {
    /// Read a page from disk
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read page {}", path.display()))?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            body: strip_front_matter(&contents).to_string(),
            context: PageContext::from_document(path, &contents),
        })
    }

    /// The built-in landing page
    pub fn landing() -> Self {
        Self {
            path: None,
            body: LANDING_PAGE.to_string(),
            context: PageContext::from_document(Path::new(""), LANDING_PAGE),
        }
    }

    /// Title for the status bar
    pub fn title(&self) -> String {
        self.context
            .title
            .clone()
            .or_else(|| self.context.chapter.clone())
            .unwrap_or_else(|| "Documentation".to_string())
    }
}

fn strip_front_matter(contents: &str) -> &str {
    let Some(rest) = contents.strip_prefix("---\n") else {
        return contents;
    };
    match rest.find("\n---") {
        Some(end) => rest[end + 4..].trim_start_matches(['\r', '\n']),
        None => contents,
    }
}

/// Scroll state of the page
#[derive(Default)]
pub struct PageViewState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total wrapped lines
    pub total_lines: usize,
    /// Height of the last render
    pub viewport_height: usize,
    /// Text currently on screen
    pub visible_text: String,
}

impl PageViewState {
    /// Scroll by delta (positive = down)
    pub fn scroll(&mut self, delta: i32) {
        let magnitude = usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX);
        self.scroll_offset = if delta < 0 {
            self.scroll_offset.saturating_sub(magnitude)
        } else {
            self.scroll_offset.saturating_add(magnitude)
        };
    }

    /// Scroll by most of a screen
    pub fn page(&mut self, down: bool) {
        let step = i32::try_from(self.viewport_height.saturating_sub(2).max(1)).unwrap_or(1);
        self.scroll(if down { step } else { -step });
    }
}

/// Renders a [`PageDocument`] body
pub struct PageView<'a> {
    body: &'a str,
}

impl<'a> PageView<'a> {
    /// View over a Markdown body
    pub fn new(body: &'a str) -> Self {
        Self { body }
    }
}

fn wrapped_lines(body: &str, width: usize) -> Vec<(String, Style)> {
    let mut out = Vec::new();
    let mut in_code = false;
    for raw in body.lines() {
        let line = sanitize(raw);
        if line.trim_start().starts_with("```") {
            in_code = !in_code;
            continue;
        }

        let style = if in_code {
            Style::default().fg(Color::Yellow)
        } else if line.starts_with('#') {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        if line.is_empty() {
            out.push((String::new(), style));
        } else if in_code {
            out.push((line.chars().take(width).collect(), style));
        } else {
            out.extend(wrap(&line, width).into_iter().map(|c| (c.into_owned(), style)));
        }
    }
    out
}

impl StatefulWidget for PageView<'_> {
    type State = PageViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let wrapped = wrapped_lines(self.body, area.width as usize);
        let height = area.height as usize;

        state.total_lines = wrapped.len();
        state.viewport_height = height;

        // Clamp scroll
        let max_scroll = state.total_lines.saturating_sub(height);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        let visible: Vec<&(String, Style)> =
            wrapped.iter().skip(state.scroll_offset).take(height).collect();
        state.visible_text = visible
            .iter()
            .map(|(l, _)| l.as_str())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();

        for (y, (line, style)) in (area.y..).zip(visible) {
            buf.set_string(area.x, y, line, *style);
        }
    }
}
