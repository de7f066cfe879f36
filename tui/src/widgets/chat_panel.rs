//! Chat Panel
//!
//! The expanded widget, stacked top to bottom:
//!
//! ```text
//! ╭─ Title ───────────────────────────╮
//! │● online v1.0  module / chapter    │  header
//! │Failed to get response... (Esc)    │  banner, when set
//! │                                   │
//! │ transcript (bottom-anchored)      │
//! │                                   │
//! │Selected: "..."  Ctrl+X clears     │  chip, when set
//! │───────────────────────────────────│
//! │> question_                        │  input
//! │Press Enter to send, ...           │  help or counter
//! ╰──────────────────── Powered by RAG╯
//! ```

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, StatefulWidget, Widget};

use docs_chat_core::format::truncate_excerpt;
use docs_chat_core::input::{ChatInput, HELP_TEXT};
use docs_chat_core::shell::HealthState;
use docs_chat_core::transcript::ViewItem;

use crate::theme::{self, BORDER, ERROR_RED, SUCCESS_GREEN, USER_TEXT, WARNING};
use crate::widgets::transcript::{push_wrapped, transcript_lines};

/// Footer attribution
pub const FOOTER: &str = "Powered by RAG";

/// Most input lines shown at once
const MAX_INPUT_LINES: usize = 3;

/// Characters of the selection shown in the chip
const CHIP_CHARS: usize = 40;

/// Transcript scroll position, counted from the bottom
#[derive(Default)]
pub struct ChatPanelState {
    /// Lines scrolled up from the latest message (0 = latest)
    pub scroll_offset: usize,
    /// Transcript lines at the last render
    pub total_lines: usize,
    /// Transcript viewport height at the last render
    pub transcript_height: usize,
}

impl ChatPanelState {
    /// Scroll towards older messages
    pub fn scroll_up(&mut self, lines: usize) {
        let max_scroll = self.total_lines.saturating_sub(self.transcript_height);
        self.scroll_offset = (self.scroll_offset + lines).min(max_scroll);
    }

    /// Scroll towards the latest message
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Jump to the latest message
    pub fn scroll_to_latest(&mut self) {
        self.scroll_offset = 0;
    }

    /// Half the transcript viewport, at least one line
    pub fn page_size(&self) -> usize {
        (self.transcript_height / 2).max(1)
    }
}

/// Everything the panel draws, borrowed for one frame
pub struct ChatPanel<'a> {
    /// Border title
    pub title: &'a str,
    /// Health check result
    pub health: &'a HealthState,
    /// Current page, e.g. `module-01-ros2 / 01-intro`
    pub page_label: Option<String>,
    /// Error banner
    pub banner: Option<&'a str>,
    /// Transcript view
    pub items: &'a [ViewItem],
    /// Input control
    pub input: &'a ChatInput,
    /// Whether a submit would be accepted
    pub send_enabled: bool,
    /// Page text the next question is scoped to
    pub selection: Option<&'a str>,
    /// Animation tick
    pub tick: u64,
}

impl ChatPanel<'_> {
    fn header(&self) -> Line<'static> {
        let color = match self.health {
            HealthState::Checking => WARNING,
            HealthState::Healthy { .. } => SUCCESS_GREEN,
            HealthState::Unavailable(_) => ERROR_RED,
        };
        let mut spans = vec![
            Span::styled("● ", theme::panel().fg(color)),
            Span::styled(self.health.describe(), theme::panel().fg(color)),
        ];
        if let Some(label) = &self.page_label {
            spans.push(Span::styled(format!("  {label}"), theme::dim()));
        }
        Line::from(spans)
    }

    fn banner_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        if let Some(banner) = self.banner {
            push_wrapped(
                &mut lines,
                &[
                    (banner.to_string(), theme::panel().fg(ERROR_RED).add_modifier(Modifier::BOLD)),
                    (" (Esc to dismiss)".to_string(), theme::dim()),
                ],
                width,
                0,
            );
        }
        lines
    }

    fn chip_line(&self) -> Option<Line<'static>> {
        let selection = self.selection?;
        let preview = truncate_excerpt(&selection.split_whitespace().collect::<Vec<_>>().join(" "), CHIP_CHARS);
        Some(Line::from(vec![
            Span::styled("Selected: ", theme::accent()),
            Span::styled(format!("\"{preview}\""), theme::dim().add_modifier(Modifier::ITALIC)),
            Span::styled("  Ctrl+X clears", theme::dim()),
        ]))
    }

    fn input_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        if self.input.is_empty() {
            let hint = if self.health.is_healthy() || matches!(self.health, HealthState::Checking) {
                self.input.placeholder().to_string()
            } else {
                "The assistant is offline".to_string()
            };
            lines.push(Line::from(vec![
                Span::styled("> ", theme::accent()),
                Span::styled(hint, theme::dim()),
            ]));
            return lines;
        }

        let style = theme::panel().fg(USER_TEXT);
        let cursor = if self.input.is_sending() { "" } else { "_" };
        push_wrapped(
            &mut lines,
            &[
                ("> ".to_string(), theme::accent()),
                (self.input.value().to_string(), style),
                (cursor.to_string(), theme::accent()),
            ],
            width,
            0,
        );
        let skip = lines.len().saturating_sub(MAX_INPUT_LINES);
        lines.drain(..skip);
        lines
    }

    fn status_line(&self) -> Line<'static> {
        if self.input.is_sending() {
            Line::styled("Sending...", theme::dim())
        } else if let Some(counter) = self.input.char_counter() {
            Line::styled(counter, theme::panel().fg(WARNING))
        } else if self.send_enabled || self.input.is_empty() {
            Line::styled(HELP_TEXT, theme::dim())
        } else {
            Line::styled("Waiting for the assistant...", theme::dim())
        }
    }
}

fn draw_line(buf: &mut Buffer, area: Rect, y: u16, line: &Line<'_>) {
    if y < area.y + area.height {
        buf.set_line(area.x, y, line, area.width);
    }
}

impl StatefulWidget for ChatPanel<'_> {
    type State = ChatPanelState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        buf.set_style(area, theme::panel());

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::panel().fg(BORDER))
            .title(Line::styled(format!(" {} ", self.title), theme::accent()))
            .title_bottom(
                Line::styled(format!(" {FOOTER} "), theme::dim()).alignment(Alignment::Right),
            );
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width as usize;
        if width < 12 || inner.height < 6 {
            return;
        }

        // Top: header and banner
        let mut y = inner.y;
        draw_line(buf, inner, y, &self.header());
        y += 1;
        for line in self.banner_lines(width) {
            draw_line(buf, inner, y, &line);
            y += 1;
        }

        // Bottom: chip, separator, input, status
        let chip = self.chip_line();
        let input = self.input_lines(width);
        let bottom_height = u16::try_from(input.len()).unwrap_or(1) + 2 + u16::from(chip.is_some());
        let bottom_top = (inner.y + inner.height).saturating_sub(bottom_height).max(y);

        let mut by = bottom_top;
        if let Some(chip) = &chip {
            draw_line(buf, inner, by, chip);
            by += 1;
        }
        draw_line(buf, inner, by, &Line::styled("─".repeat(width), theme::panel().fg(BORDER)));
        by += 1;
        for line in &input {
            draw_line(buf, inner, by, line);
            by += 1;
        }
        draw_line(buf, inner, by, &self.status_line());

        // Middle: transcript, anchored to the bottom
        let height = usize::from(bottom_top.saturating_sub(y));
        let lines = transcript_lines(self.items, width, self.tick);
        state.total_lines = lines.len();
        state.transcript_height = height;

        let max_scroll = state.total_lines.saturating_sub(height);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        let visible_end = state.total_lines.saturating_sub(state.scroll_offset);
        let visible_start = visible_end.saturating_sub(height);
        for (ty, line) in (y..).zip(&lines[visible_start..visible_end]) {
            draw_line(buf, inner, ty, line);
        }

        if state.scroll_offset > 0 && height > 0 {
            let marker = format!("↓ {} more", state.scroll_offset);
            let x = inner.x + inner.width.saturating_sub(u16::try_from(marker.chars().count()).unwrap_or(0));
            buf.set_string(x, bottom_top - 1, marker, Style::default().fg(WARNING).bg(theme::PANEL_BG));
        }
    }
}
