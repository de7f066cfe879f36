//! Input Control
//!
//! The text box the reader types into. Surfaces translate their own key
//! events into [`InputKey`] and render from the accessors here.

/// Default maximum input length, in characters
pub const DEFAULT_MAX_LENGTH: usize = 500;

/// Placeholder shown in an empty input
pub const DEFAULT_PLACEHOLDER: &str = "Ask a question about the course...";

/// Hint shown under the input
pub const HELP_TEXT: &str = "Press Enter to send, Shift+Enter for new line";

/// Surface-independent key events the input understands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKey {
    /// A printable character
    Char(char),
    /// Enter without Shift: submit
    Enter,
    /// Shift+Enter: line break
    ShiftEnter,
    /// Delete the last character
    Backspace,
}

/// What the surface should do after a key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    /// Nothing beyond a redraw
    None,
    /// The value changed
    Edited,
    /// The reader asked to send
    Submit,
}

/// State of the chat input box
#[derive(Clone, Debug)]
pub struct ChatInput {
    value: String,
    max_length: usize,
    placeholder: String,
    is_sending: bool,
}

impl Default for ChatInput {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH)
    }
}

impl ChatInput {
    /// Create an empty input capped at `max_length` characters
    pub fn new(max_length: usize) -> Self {
        Self {
            value: String::new(),
            max_length,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            is_sending: false,
        }
    }

    /// Replace the placeholder text
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Current value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Placeholder text
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Configured maximum length
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Length of the value in characters
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Whether the value is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// A submission from this control is in flight
    pub fn is_sending(&self) -> bool {
        self.is_sending
    }

    /// Replace the whole value, capped at the maximum length
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().take(self.max_length).collect();
    }

    /// Append one character unless the input is full
    pub fn insert_char(&mut self, c: char) -> bool {
        if self.len() >= self.max_length {
            return false;
        }
        self.value.push(c);
        true
    }

    /// Append text (e.g. a paste), dropping whatever does not fit
    pub fn insert_str(&mut self, text: &str) {
        let room = self.max_length.saturating_sub(self.len());
        self.value.extend(text.chars().take(room));
    }

    /// Remove the last character
    pub fn backspace(&mut self) -> bool {
        self.value.pop().is_some()
    }

    /// Empty the value
    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Apply a key
    pub fn handle_key(&mut self, key: InputKey) -> InputAction {
        let edited = match key {
            InputKey::Enter => return InputAction::Submit,
            InputKey::ShiftEnter => self.insert_char('\n'),
            InputKey::Char(c) => self.insert_char(c),
            InputKey::Backspace => self.backspace(),
        };
        if edited {
            InputAction::Edited
        } else {
            InputAction::None
        }
    }

    /// Whether the send affordance should look active
    pub fn can_send(&self, disabled: bool) -> bool {
        !disabled && !self.is_sending && !self.value.trim().is_empty()
    }

    /// Start a submission
    ///
    /// Returns the trimmed text to send, or `None` when the value is blank, a
    /// submission is already in flight, or the caller has disabled the
    /// control. The value is kept until [`ChatInput::finish_submit`].
    pub fn begin_submit(&mut self, disabled: bool) -> Option<String> {
        if !self.can_send(disabled) {
            return None;
        }
        self.is_sending = true;
        Some(self.value.trim().to_string())
    }

    /// End a submission: clear on success, keep the text for a retry otherwise
    pub fn finish_submit(&mut self, succeeded: bool) {
        self.is_sending = false;
        if succeeded {
            self.value.clear();
        }
    }

    /// "N characters remaining", once more than 80% of the budget is used
    pub fn char_counter(&self) -> Option<String> {
        let len = self.len();
        // len > 0.8 * max, in integers
        if len * 5 > self.max_length * 4 {
            Some(format!(
                "{} characters remaining",
                self.max_length.saturating_sub(len)
            ))
        } else {
            None
        }
    }
}
