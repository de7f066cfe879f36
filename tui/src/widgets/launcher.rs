//! Floating launcher button with the unread badge

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Widget};

use crate::theme::{self, ACCENT, BADGE, PANEL_BG};

/// Launcher width in cells
pub const LAUNCHER_WIDTH: u16 = 13;
/// Launcher height in cells
pub const LAUNCHER_HEIGHT: u16 = 3;

const LABEL: &str = " ? Ask AI";

/// The minimized widget
pub struct Launcher {
    unread: bool,
}

impl Launcher {
    /// Launcher showing the badge when `unread`
    pub fn new(unread: bool) -> Self {
        Self { unread }
    }
}

impl Widget for Launcher {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 3 {
            return;
        }
        buf.set_style(area, theme::panel());

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT).bg(PANEL_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        buf.set_stringn(
            inner.x,
            inner.y,
            LABEL,
            inner.width as usize,
            theme::accent(),
        );

        if self.unread {
            buf.set_string(
                area.x + area.width - 1,
                area.y,
                "●",
                Style::default()
                    .fg(BADGE)
                    .bg(PANEL_BG)
                    .add_modifier(Modifier::BOLD),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(unread: bool) -> Buffer {
        let area = Rect::new(0, 0, LAUNCHER_WIDTH, LAUNCHER_HEIGHT);
        let mut buf = Buffer::empty(area);
        Launcher::new(unread).render(area, &mut buf);
        buf
    }

    #[test]
    fn test_badge_only_when_unread() {
        assert_eq!(render(true)[(LAUNCHER_WIDTH - 1, 0)].symbol(), "●");
        assert_eq!(render(false)[(LAUNCHER_WIDTH - 1, 0)].symbol(), "╮");
    }

    #[test]
    fn test_label_inside_border() {
        let buf = render(false);
        let row: String = (1..LAUNCHER_WIDTH - 1).map(|x| buf[(x, 1)].symbol()).collect();
        assert_eq!(row.trim_end(), LABEL);
    }
}
