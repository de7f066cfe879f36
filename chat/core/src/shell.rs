//! Widget Shell
//!
//! The floating-button / expanded-panel state machine.
//!
//! ```text
//!            open / toggle
//!   ┌───────────┐ ───────────────▶ ┌──────────┐
//!   │ Minimized │                  │ Expanded │
//!   └───────────┘ ◀─────────────── └──────────┘
//!         minimize / close / toggle
//! ```
//!
//! There is no hidden state: closing the panel leaves the floating button.
//! The shell also holds the mount-time health check result, which gates the
//! send action.

use crate::message::Role;

/// Where the widget is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellState {
    /// Floating button only
    Minimized,
    /// Full chat panel
    Expanded,
}

/// Result of the one-time health check
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HealthState {
    /// Check still running
    Checking,
    /// Service answered
    Healthy {
        /// Reported service version
        version: Option<String>,
    },
    /// Service unreachable or unhealthy
    Unavailable(String),
}

impl HealthState {
    /// Whether sends are allowed
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }

    /// Short status line for the panel header
    pub fn describe(&self) -> String {
        match self {
            Self::Checking => "connecting...".to_string(),
            Self::Healthy { version: Some(v) } => format!("online v{v}"),
            Self::Healthy { version: None } => "online".to_string(),
            Self::Unavailable(_) => "offline".to_string(),
        }
    }
}

/// Floating widget state
#[derive(Clone, Debug)]
pub struct WidgetShell {
    expanded: bool,
    minimized: bool,
    has_unread: bool,
    health: HealthState,
}

impl Default for WidgetShell {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetShell {
    /// A shell in its initial state: minimized, health unknown
    pub fn new() -> Self {
        Self {
            expanded: false,
            minimized: true,
            has_unread: false,
            health: HealthState::Checking,
        }
    }

    /// Current state
    pub fn state(&self) -> ShellState {
        if self.expanded {
            ShellState::Expanded
        } else {
            ShellState::Minimized
        }
    }

    /// Whether the panel is showing
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether only the floating button is showing
    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    /// Whether the floating button shows the unread badge
    pub fn has_unread(&self) -> bool {
        self.has_unread
    }

    /// Open the panel from the floating button
    pub fn open(&mut self) {
        self.minimized = false;
        self.expanded = true;
        self.has_unread = false;
    }

    /// Collapse to the floating button
    pub fn minimize(&mut self) {
        self.minimized = true;
        self.expanded = false;
    }

    /// Close the panel; same as minimizing
    pub fn close(&mut self) {
        self.minimize();
    }

    /// Open when minimized, minimize when open
    pub fn toggle(&mut self) {
        if self.minimized {
            self.open();
        } else {
            self.minimize();
        }
    }

    /// Recompute the unread badge from the last transcript role
    ///
    /// Call whenever the transcript or the minimized flag may have changed.
    pub fn sync_unread(&mut self, last_role: Option<Role>) {
        self.has_unread = self.minimized && last_role == Some(Role::Assistant);
    }

    /// Health check result
    pub fn health(&self) -> &HealthState {
        &self.health
    }

    /// Record the health check result
    pub fn set_health(&mut self, health: HealthState) {
        self.health = health;
    }

    /// Whether the input should accept submissions
    pub fn send_enabled(&self, awaiting_response: bool) -> bool {
        self.health.is_healthy() && !awaiting_response
    }
}
