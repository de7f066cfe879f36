//! Widgets
//!
//! - [`page_view`]: the docs page underneath everything
//! - [`launcher`]: the minimized floating button
//! - [`chat_panel`]: the expanded panel
//! - [`transcript`]: message list rendering shared by the panel

pub mod chat_panel;
pub mod launcher;
pub mod page_view;
pub mod transcript;

pub use chat_panel::{ChatPanel, ChatPanelState};
pub use launcher::Launcher;
pub use page_view::{PageDocument, PageView, PageViewState};
