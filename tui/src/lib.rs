//! docs-chat TUI - terminal surface for the documentation assistant
//!
//! Shows a documentation page full-screen with the chat widget floating in
//! the bottom-right corner, the way the widget sits on the docs site.
//!
//! # Architecture
//!
//! - **Compositor**: Layered rendering; page below, launcher and panel above
//! - **Widgets**: Page view, launcher button, chat panel, transcript lines
//! - **Keys**: Key events to widget actions, per shell state
//! - **Commands**: One-shot `ask`, `retrieve` and `health`
//!
//! Conversation logic lives in `docs_chat_core`; nothing here talks HTTP.

pub mod app;
pub mod commands;
pub mod compositor;
pub mod keys;
pub mod theme;
pub mod widgets;

pub use app::App;
