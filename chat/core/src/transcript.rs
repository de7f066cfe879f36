//! Transcript View Model
//!
//! Turns a [`ConversationState`] into the list of things a surface draws:
//! the welcome card, one bubble per message, and the typing indicator.
//! Surfaces only style what they get here; every display rule (labels,
//! percentages, truncation, timestamps) lives in this module.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::api::Source;
use crate::format::{
    format_relative, sanitize, score_percent, segments, truncate_excerpt, Segment, EXCERPT_CHARS,
};
use crate::message::{Message, MessageId, Role};
use crate::store::ConversationState;

/// Welcome card heading
pub const WELCOME_TITLE: &str = "Welcome to the AI Learning Assistant!";

/// Welcome card subtitle
pub const WELCOME_SUBTITLE: &str = "Ask me anything about the course content:";

/// Example prompts on the welcome card
pub const EXAMPLE_PROMPTS: [&str; 4] = [
    "What is ROS 2 and how is it different from ROS 1?",
    "How do I create a publisher node?",
    "Explain QoS settings in ROS 2",
    "What are the best practices for URDF modeling?",
];

/// Label used when a source has no module
const UNKNOWN_MODULE: &str = "Unknown Module";

/// One drawable item, in display order
#[derive(Clone, Debug, PartialEq)]
pub enum ViewItem {
    /// Empty transcript, nothing pending
    Welcome {
        /// Heading
        title: &'static str,
        /// Subtitle
        subtitle: &'static str,
        /// Suggested questions
        prompts: &'static [&'static str],
    },
    /// A message
    Bubble(Bubble),
    /// A reply is pending
    Typing,
}

/// How a bubble is styled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BubbleKind {
    /// Reader's question
    User,
    /// Service answer
    Assistant,
    /// Synthesized error notice
    Error,
}

/// A rendered message
#[derive(Clone, Debug, PartialEq)]
pub struct Bubble {
    /// Message this bubble shows
    pub id: MessageId,
    /// Styling
    pub kind: BubbleKind,
    /// Content, split for code styling
    pub segments: Vec<Segment>,
    /// "5 minutes ago" etc., computed at build time
    pub timestamp: String,
    /// Citations, for answers that have sources
    pub citations: Option<CitationPanel>,
    /// Keyboard selection marker
    pub selected: bool,
}

impl Bubble {
    /// Bold lead-in shown before the content
    pub fn heading(&self) -> Option<&'static str> {
        match self.kind {
            BubbleKind::Error => Some("Error:"),
            _ => None,
        }
    }
}

/// The collapsible "Sources (N)" section of an answer
#[derive(Clone, Debug, PartialEq)]
pub struct CitationPanel {
    /// Number of sources
    pub count: usize,
    /// Whether the list is open
    pub expanded: bool,
    /// Entries in service order
    pub entries: Vec<CitationEntry>,
}

impl CitationPanel {
    /// Toggle line, e.g. `Sources (3)`
    pub fn toggle_label(&self) -> String {
        format!("Sources ({})", self.count)
    }
}

/// One cited source
#[derive(Clone, Debug, PartialEq)]
pub struct CitationEntry {
    /// 1-based position
    pub number: usize,
    /// Chunk the excerpt came from
    pub chunk_id: String,
    /// `module - chapter`
    pub label: String,
    /// `round(score * 100)`
    pub score_percent: i64,
    /// `NN% match`
    pub score_label: String,
    /// Quoted, truncated excerpt
    pub excerpt: String,
    /// Link to the full document, when the source names one
    pub link: Option<String>,
}

/// Surface-side transcript state: open citation panels and selection
#[derive(Clone, Debug)]
pub struct TranscriptUi {
    expanded_sources: HashSet<MessageId>,
    selected: Option<MessageId>,
    excerpt_chars: usize,
    docs_base_url: String,
}

impl Default for TranscriptUi {
    fn default() -> Self {
        Self::new(EXCERPT_CHARS, "")
    }
}

impl TranscriptUi {
    /// Create with an excerpt budget and the base URL for "full chapter" links
    pub fn new(excerpt_chars: usize, docs_base_url: &str) -> Self {
        Self {
            expanded_sources: HashSet::new(),
            selected: None,
            excerpt_chars,
            docs_base_url: docs_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Open or close the citation panel of `id`; returns the new state
    pub fn toggle_sources(&mut self, id: &MessageId) -> bool {
        if self.expanded_sources.remove(id) {
            false
        } else {
            self.expanded_sources.insert(id.clone());
            true
        }
    }

    /// Whether the citation panel of `id` is open
    pub fn is_expanded(&self, id: &MessageId) -> bool {
        self.expanded_sources.contains(id)
    }

    /// Currently selected answer
    pub fn selected(&self) -> Option<&MessageId> {
        self.selected.as_ref()
    }

    /// Move the selection to the next answer, wrapping to the first
    ///
    /// With nothing selected, the latest answer is picked.
    pub fn select_next(&mut self, messages: &[Message]) -> Option<MessageId> {
        let answers: Vec<&MessageId> = messages
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .map(|m| &m.id)
            .collect();
        if answers.is_empty() {
            self.selected = None;
            return None;
        }

        let next = match self
            .selected
            .as_ref()
            .and_then(|sel| answers.iter().position(|id| *id == sel))
        {
            Some(i) => answers[(i + 1) % answers.len()],
            None => answers[answers.len() - 1],
        };
        self.selected = Some(next.clone());
        self.selected.clone()
    }

    /// The selected answer, falling back to the latest one
    pub fn target(&self, messages: &[Message]) -> Option<MessageId> {
        self.selected
            .as_ref()
            .filter(|sel| messages.iter().any(|m| &m.id == *sel))
            .cloned()
            .or_else(|| {
                messages
                    .iter()
                    .rev()
                    .find(|m| m.role == Role::Assistant)
                    .map(|m| m.id.clone())
            })
    }

    /// Forget panel and selection state (after the transcript is cleared)
    pub fn reset(&mut self) {
        self.expanded_sources.clear();
        self.selected = None;
    }

    fn link_for(&self, source: &Source) -> Option<String> {
        source
            .metadata
            .source
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| format!("{}/docs/{}", self.docs_base_url, s.trim_start_matches('/')))
    }

    /// Display entry for the `number`-th source of an answer
    pub fn citation(&self, number: usize, source: &Source) -> CitationEntry {
        let module = source
            .metadata
            .module
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(UNKNOWN_MODULE);
        let label = match source.metadata.chapter.as_deref() {
            Some(chapter) if !chapter.is_empty() => format!("{module} - {chapter}"),
            _ => module.to_string(),
        };
        let percent = score_percent(source.score);

        CitationEntry {
            number,
            chunk_id: source.chunk_id.clone(),
            label: sanitize(&label),
            score_percent: percent,
            score_label: format!("{percent}% match"),
            excerpt: format!(
                "\"{}\"",
                truncate_excerpt(&sanitize(&source.text), self.excerpt_chars)
            ),
            link: self.link_for(source).map(|l| sanitize(&l)),
        }
    }

    fn bubble(&self, message: &Message, now: DateTime<Utc>) -> Bubble {
        let kind = match (message.role, message.is_error) {
            (Role::User, _) => BubbleKind::User,
            (Role::Assistant, true) => BubbleKind::Error,
            (Role::Assistant, false) => BubbleKind::Assistant,
        };

        let segments = if kind == BubbleKind::Error {
            vec![Segment::Text(sanitize(&message.content))]
        } else {
            segments(&message.content)
        };

        let citations = message.has_sources().then(|| CitationPanel {
            count: message.sources().len(),
            expanded: self.is_expanded(&message.id),
            entries: message
                .sources()
                .iter()
                .enumerate()
                .map(|(i, s)| self.citation(i + 1, s))
                .collect(),
        });

        Bubble {
            id: message.id.clone(),
            kind,
            segments,
            timestamp: format_relative(now, message.timestamp),
            citations,
            selected: self.selected.as_ref() == Some(&message.id),
        }
    }
}

/// Build the drawable transcript as of `now`
pub fn build_view(state: &ConversationState, ui: &TranscriptUi, now: DateTime<Utc>) -> Vec<ViewItem> {
    let mut items = Vec::with_capacity(state.messages.len() + 1);

    if state.messages.is_empty() && !state.is_loading {
        items.push(ViewItem::Welcome {
            title: WELCOME_TITLE,
            subtitle: WELCOME_SUBTITLE,
            prompts: &EXAMPLE_PROMPTS,
        });
    }

    items.extend(
        state
            .messages
            .iter()
            .map(|m| ViewItem::Bubble(ui.bubble(m, now))),
    );

    if state.is_loading {
        items.push(ViewItem::Typing);
    }
    items
}
