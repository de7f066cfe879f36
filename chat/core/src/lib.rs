//! Docs Chat Core - Headless Documentation Assistant
//!
//! This crate holds everything the documentation chat widget does apart
//! from drawing: talking to the RAG service, keeping the conversation,
//! editing the question, and deciding what the transcript looks like. It can
//! drive the terminal surface, a one-shot CLI, or run headless in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Surfaces                             │
//! │   ┌──────────────────────┐      ┌──────────────────────┐     │
//! │   │  Terminal widget     │      │  One-shot CLI        │     │
//! │   │  (ratatui)           │      │  ask/retrieve/health │     │
//! │   └──────────┬───────────┘      └──────────┬───────────┘     │
//! │              │  build_view / ChatInput     │                 │
//! └──────────────┼─────────────────────────────┼─────────────────┘
//!                │                             │
//! ┌──────────────┼─────────────────────────────┼─────────────────┐
//! │              ▼          DOCS CHAT CORE      ▼                 │
//! │   ┌───────────────┐   ┌──────────────┐   ┌────────────────┐   │
//! │   │  WidgetShell  │   │  ChatStore   │──▶│  RagApi        │   │
//! │   │  (min / exp)  │   │  (messages)  │   │  (RagClient)   │   │
//! │   └───────────────┘   └──────────────┘   └───────┬────────┘   │
//! └──────────────────────────────────────────────────┼────────────┘
//!                                                    │ HTTP/JSON
//!                                            ┌───────▼────────┐
//!                                            │  RAG service   │
//!                                            └────────────────┘
//! ```
//!
//! # Module Overview
//!
//! - [`api`]: HTTP client, wire types and error normalization
//! - [`store`]: the conversation store and its send/feedback operations
//! - [`input`]: the question input box
//! - [`transcript`]: view model for the message list
//! - [`format`]: code-span tokenizer, sanitizer, relative time
//! - [`shell`]: minimized/expanded state machine and health gate
//! - [`page`]: metadata about the page the widget sits on
//! - [`config`]: TOML/env/CLI configuration
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod config;
pub mod format;
pub mod input;
pub mod message;
pub mod page;
pub mod shell;
pub mod store;
pub mod transcript;

pub use api::{
    AnswerMetadata, AnswerRequest, AnswerResponse, ApiError, ApiErrorKind, ClientConfig,
    FeedbackPayload, FeedbackResponse, FeedbackType, HealthResponse, RagApi, RagClient,
    RetrieveFilter, Source, SourceMetadata,
};
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, WidgetConfig,
};
pub use input::{ChatInput, InputAction, InputKey};
pub use message::{Message, MessageId, Role};
pub use page::PageContext;
pub use shell::{HealthState, ShellState, WidgetShell};
pub use store::{ChatStore, ConversationState, FeedbackOutcome, FeedbackSkip, SendOutcome};
pub use transcript::{build_view, Bubble, BubbleKind, CitationEntry, CitationPanel, TranscriptUi, ViewItem};
