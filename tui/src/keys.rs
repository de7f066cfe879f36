//! Key Bindings
//!
//! Maps terminal key events to widget actions. The mapping depends on the
//! shell state: the minimized widget leaves most keys to the page, the
//! expanded panel owns the keyboard.
//!
//! | Key                          | Expanded              | Minimized      |
//! |------------------------------|-----------------------|----------------|
//! | Enter                        | send                  | open           |
//! | Shift/Alt+Enter, Ctrl+J      | newline               |                |
//! | Esc                          | dismiss banner / min. |                |
//! | Ctrl+W                       | close                 |                |
//! | Tab                          | select next answer    |                |
//! | Ctrl+O                       | toggle sources        |                |
//! | Ctrl+Y / Ctrl+N              | thumbs up / down      |                |
//! | Ctrl+L                       | clear conversation    |                |
//! | Ctrl+X                       | clear selection       |                |
//! | PgUp / PgDn                  | scroll transcript     | scroll page    |
//! | c                            | (typed)               | open           |
//! | s                            | (typed)               | ask about view |
//! | q                            | (typed)               | quit           |
//! | Ctrl+C                       | quit                  | quit           |

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use docs_chat_core::api::FeedbackType;
use docs_chat_core::input::InputKey;
use docs_chat_core::shell::ShellState;

/// What a key press asks the app to do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Nothing bound
    None,
    /// Leave the program
    Quit,
    /// Expand the panel
    Open,
    /// Collapse to the launcher
    Minimize,
    /// Close the panel
    Close,
    /// Edit or submit the input
    Input(InputKey),
    /// Hide the error banner
    DismissBanner,
    /// Scroll the transcript (positive = towards older)
    ScrollTranscript(i32),
    /// Scroll the page by screens (positive = down)
    ScrollPage(i32),
    /// Scroll the page by lines (positive = down)
    ScrollPageLines(i32),
    /// Select the next answer
    SelectNextAnswer,
    /// Open or close the citations of the target answer
    ToggleSources,
    /// Rate the target answer
    Feedback(FeedbackType),
    /// Empty the transcript
    Clear,
    /// Scope the next question to the visible page text
    CaptureSelection,
    /// Drop the selection
    ClearSelection,
}

fn ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Map a key press for the given shell state
pub fn map_key(key: KeyEvent, shell: ShellState, banner_shown: bool) -> Action {
    if ctrl(&key) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }
    match shell {
        ShellState::Expanded => expanded(key, banner_shown),
        ShellState::Minimized => minimized(key),
    }
}

fn expanded(key: KeyEvent, banner_shown: bool) -> Action {
    match key.code {
        KeyCode::Esc if banner_shown => Action::DismissBanner,
        KeyCode::Esc => Action::Minimize,

        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            Action::Input(InputKey::ShiftEnter)
        }
        KeyCode::Enter => Action::Input(InputKey::Enter),
        // Many terminals can't report Shift+Enter; Ctrl+J is the fallback
        KeyCode::Char('j') if ctrl(&key) => Action::Input(InputKey::ShiftEnter),

        KeyCode::Char('w') if ctrl(&key) => Action::Close,
        KeyCode::Char('o') if ctrl(&key) => Action::ToggleSources,
        KeyCode::Char('y') if ctrl(&key) => Action::Feedback(FeedbackType::ThumbsUp),
        KeyCode::Char('n') if ctrl(&key) => Action::Feedback(FeedbackType::ThumbsDown),
        KeyCode::Char('l') if ctrl(&key) => Action::Clear,
        KeyCode::Char('x') if ctrl(&key) => Action::ClearSelection,
        KeyCode::Char(_) if ctrl(&key) => Action::None,
        KeyCode::Char(c) => Action::Input(InputKey::Char(c)),
        KeyCode::Backspace => Action::Input(InputKey::Backspace),

        KeyCode::Tab => Action::SelectNextAnswer,
        KeyCode::PageUp => Action::ScrollTranscript(1),
        KeyCode::PageDown => Action::ScrollTranscript(-1),
        _ => Action::None,
    }
}

fn minimized(key: KeyEvent) -> Action {
    if ctrl(&key) {
        return Action::None;
    }
    match key.code {
        KeyCode::Char('c') | KeyCode::Enter => Action::Open,
        KeyCode::Char('s') => Action::CaptureSelection,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::PageDown | KeyCode::Char(' ') => Action::ScrollPage(1),
        KeyCode::PageUp => Action::ScrollPage(-1),
        KeyCode::Down | KeyCode::Char('j') => Action::ScrollPageLines(1),
        KeyCode::Up | KeyCode::Char('k') => Action::ScrollPageLines(-1),
        _ => Action::None,
    }
}
