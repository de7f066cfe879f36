//! Main Application
//!
//! The App owns the widget for one page:
//! - Event loop (keyboard, mouse, paste, resize)
//! - Background tasks for the health check, sends and feedback
//! - Compositor layers: page at the bottom, launcher and panel floating
//!   over its bottom-right corner
//!
//! Conversation state lives in the core's [`ChatStore`]; this module only
//! routes input to it and draws snapshots of it.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{Event, EventStream, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::widgets::{StatefulWidget, Widget};
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use docs_chat_core::api::{FeedbackType, RagApi};
use docs_chat_core::config::WidgetConfig;
use docs_chat_core::input::{ChatInput, InputAction};
use docs_chat_core::shell::{HealthState, WidgetShell};
use docs_chat_core::store::{ChatStore, FeedbackOutcome, SendOutcome};
use docs_chat_core::transcript::{build_view, TranscriptUi};

use crate::compositor::{Compositor, LayerId};
use crate::keys::{map_key, Action};
use crate::theme;
use crate::widgets::launcher::{LAUNCHER_HEIGHT, LAUNCHER_WIDTH};
use crate::widgets::{ChatPanel, ChatPanelState, Launcher, PageDocument, PageView, PageViewState};

/// Preferred panel size; shrinks to fit small terminals
const PANEL_WIDTH: u16 = 64;
const PANEL_HEIGHT: u16 = 30;

/// Gap between the floating widget and the screen edge
const MARGIN_X: u16 = 2;
const MARGIN_Y: u16 = 1;

/// Redraw interval
const FRAME: Duration = Duration::from_millis(16);

/// Typing indicator step
const TICK: Duration = Duration::from_millis(400);

/// Lines per mouse wheel notch
const WHEEL_LINES: usize = 3;

/// Results of background work, delivered to the event loop
#[derive(Debug)]
enum AppEvent {
    Health(HealthState),
    Sent(SendOutcome),
    Feedback(FeedbackOutcome),
}

/// Layer IDs for UI regions
struct AppLayers {
    page: LayerId,
    launcher: LayerId,
    panel: LayerId,
}

/// Launcher position: bottom-right corner, above the status bar
pub fn launcher_bounds(area: Rect) -> Rect {
    let width = LAUNCHER_WIDTH.min(area.width);
    let height = LAUNCHER_HEIGHT.min(area.height);
    Rect::new(
        area.width.saturating_sub(width + MARGIN_X),
        area.height.saturating_sub(height + MARGIN_Y + 1),
        width,
        height,
    )
}

/// Panel position: bottom-right corner, clamped to the screen
pub fn panel_bounds(area: Rect) -> Rect {
    let width = PANEL_WIDTH.min(area.width.saturating_sub(MARGIN_X));
    let height = PANEL_HEIGHT.min(area.height.saturating_sub(MARGIN_Y + 1));
    Rect::new(
        area.width.saturating_sub(width + MARGIN_X),
        area.height.saturating_sub(height + MARGIN_Y + 1),
        width,
        height,
    )
}

/// Main application state
pub struct App {
    // === Core State ===
    running: bool,
    config: WidgetConfig,
    store: ChatStore,
    shell: WidgetShell,
    input: ChatInput,
    transcript: TranscriptUi,
    /// Page text the next question is grounded in
    selection: Option<String>,

    // === Page ===
    page: PageDocument,
    page_state: PageViewState,

    // === UI Components ===
    compositor: Compositor,
    layers: AppLayers,
    panel_state: ChatPanelState,

    // === Background Work ===
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,

    // === Misc State ===
    /// Transcript length at the last update, to follow new messages
    seen_len: usize,
    tick: u64,
    last_tick: Instant,
}

impl App {
    /// Create an App sized to the current terminal
    pub fn new(config: WidgetConfig, page: PageDocument, api: Arc<dyn RagApi>) -> anyhow::Result<Self> {
        let (w, h) = crossterm::terminal::size()?;
        Ok(Self::with_area(config, page, api, Rect::new(0, 0, w, h)))
    }

    /// Create an App for a given screen area
    pub fn with_area(config: WidgetConfig, page: PageDocument, api: Arc<dyn RagApi>, area: Rect) -> Self {
        let mut compositor = Compositor::new(area);
        let page_layer = compositor.create_layer(area, 0, false);
        let launcher = compositor.create_layer(launcher_bounds(area), 50, true);
        let panel = compositor.create_layer(panel_bounds(area), 100, true);
        compositor.set_visible(panel, false);

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            running: true,
            input: ChatInput::new(config.max_input_length),
            transcript: TranscriptUi::new(config.excerpt_chars, &config.docs_base_url),
            store: ChatStore::new(api),
            shell: WidgetShell::new(),
            selection: None,
            config,
            page,
            page_state: PageViewState::default(),
            compositor,
            layers: AppLayers {
                page: page_layer,
                launcher,
                panel,
            },
            panel_state: ChatPanelState::default(),
            events_tx,
            events_rx,
            seen_len: 0,
            tick: 0,
            last_tick: Instant::now(),
        }
    }

    /// Main event loop
    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        self.start_health_check();
        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events first
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_terminal_event(event),
                        Some(Err(e)) => warn!(error = %e, "Terminal event error"),
                        None => self.running = false,
                    }
                }

                Some(event) = self.events_rx.recv() => self.handle_app_event(event),

                _ = tokio::time::sleep(FRAME) => {}
            }

            self.update();
            self.render(terminal)?;
        }

        info!("Widget closed");
        Ok(())
    }

    // ========================================================================
    // Background Work
    // ========================================================================

    /// Run the one-time health check
    fn start_health_check(&self) {
        let api = self.store.api();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let health = match api.check_health().await {
                Ok(response) => {
                    info!(status = %response.status, version = ?response.version, "RAG service healthy");
                    HealthState::Healthy {
                        version: response.version,
                    }
                }
                Err(e) => {
                    warn!(error = %e, "RAG service unavailable");
                    HealthState::Unavailable(e.message())
                }
            };
            let _ = tx.send(AppEvent::Health(health));
        });
    }

    /// Send the input, if the input and shell allow it
    fn submit(&mut self) {
        let disabled = !self.shell.send_enabled(self.store.is_loading());
        let Some(question) = self.input.begin_submit(disabled) else {
            debug!(disabled, "Submit ignored");
            return;
        };

        let module = if self.config.scope_to_page {
            self.page.context.module.clone()
        } else {
            None
        };
        let selection = self.selection.take();
        let store = self.store.clone();
        let tx = self.events_tx.clone();
        info!(module = ?module, with_selection = selection.is_some(), "Sending question");

        tokio::spawn(async move {
            let outcome = match selection {
                Some(text) => store.send_message_with_selection(&question, &text, module).await,
                None => store.send_message(&question, module).await,
            };
            let _ = tx.send(AppEvent::Sent(outcome));
        });
        self.panel_state.scroll_to_latest();
    }

    /// Rate the selected (or latest) answer
    fn feedback(&mut self, feedback_type: FeedbackType) {
        let Some(target) = self.transcript.target(&self.store.messages()) else {
            debug!("No answer to rate");
            return;
        };
        let store = self.store.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = store.send_feedback(&target, feedback_type, None).await;
            let _ = tx.send(AppEvent::Feedback(outcome));
        });
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Health(health) => self.shell.set_health(health),
            AppEvent::Sent(outcome) => {
                debug!(?outcome, "Send finished");
                self.input.finish_submit(outcome == SendOutcome::Answered);
            }
            AppEvent::Feedback(outcome) => debug!(?outcome, "Feedback finished"),
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    fn handle_terminal_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let action = map_key(key, self.shell.state(), self.store.error().is_some());
                self.handle_action(action);
            }
            Event::Paste(text) if self.shell.is_expanded() => self.input.insert_str(&text),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.handle_resize(w, h),
            _ => {}
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Quit => self.running = false,
            Action::Open => {
                self.shell.open();
                self.panel_state.scroll_to_latest();
            }
            Action::Minimize => self.shell.minimize(),
            Action::Close => self.shell.close(),
            Action::Input(key) => {
                if self.input.handle_key(key) == InputAction::Submit {
                    self.submit();
                }
            }
            Action::DismissBanner => self.store.clear_error(),
            Action::ScrollTranscript(direction) => {
                let step = self.panel_state.page_size();
                if direction > 0 {
                    self.panel_state.scroll_up(step);
                } else {
                    self.panel_state.scroll_down(step);
                }
            }
            Action::ScrollPage(screens) => self.page_state.page(screens > 0),
            Action::ScrollPageLines(lines) => self.page_state.scroll(lines),
            Action::SelectNextAnswer => {
                self.transcript.select_next(&self.store.messages());
            }
            Action::ToggleSources => {
                if let Some(id) = self.transcript.target(&self.store.messages()) {
                    self.transcript.toggle_sources(&id);
                }
            }
            Action::Feedback(kind) => self.feedback(kind),
            Action::Clear => {
                self.store.clear_messages();
                self.transcript.reset();
                self.panel_state.scroll_to_latest();
            }
            Action::CaptureSelection => {
                let visible = self.page_state.visible_text.trim();
                if !visible.is_empty() {
                    debug!(chars = visible.chars().count(), "Selection captured");
                    self.selection = Some(visible.to_string());
                }
                self.shell.open();
            }
            Action::ClearSelection => self.selection = None,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let over = self.compositor.layer_at(mouse.column, mouse.row);
        let over_panel = over == Some(self.layers.panel);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if over == Some(self.layers.launcher) => {
                self.handle_action(Action::Open);
            }
            MouseEventKind::ScrollUp if over_panel => self.panel_state.scroll_up(WHEEL_LINES),
            MouseEventKind::ScrollDown if over_panel => self.panel_state.scroll_down(WHEEL_LINES),
            MouseEventKind::ScrollUp => self.page_state.scroll(-3),
            MouseEventKind::ScrollDown => self.page_state.scroll(3),
            _ => {}
        }
    }

    fn handle_resize(&mut self, width: u16, height: u16) {
        let area = Rect::new(0, 0, width, height);
        self.compositor.resize(area);
        self.compositor.place_layer(self.layers.page, area);
        self.compositor.place_layer(self.layers.launcher, launcher_bounds(area));
        self.compositor.place_layer(self.layers.panel, panel_bounds(area));
    }

    // ========================================================================
    // Update & Render
    // ========================================================================

    fn update(&mut self) {
        if self.last_tick.elapsed() >= TICK {
            self.tick = self.tick.wrapping_add(1);
            self.last_tick = Instant::now();
        }

        // Follow new messages
        let len = self.store.len();
        if len != self.seen_len {
            if len > self.seen_len {
                self.panel_state.scroll_to_latest();
            }
            self.seen_len = len;
        }

        self.shell.sync_unread(self.store.last_role());

        let expanded = self.shell.is_expanded();
        self.compositor.set_visible(self.layers.panel, expanded);
        self.compositor.set_visible(self.layers.launcher, !expanded);
    }

    fn render(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        self.draw_layers();

        terminal.draw(|frame| {
            let output = self.compositor.composite();
            let area = frame.area();
            let buf = frame.buffer_mut();

            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    let idx = output.index_of(x, y);
                    if idx < output.content.len() {
                        buf[(x, y)] = output.content[idx].clone();
                    }
                }
            }
        })?;

        Ok(())
    }

    /// Draw every visible layer into its buffer
    fn draw_layers(&mut self) {
        self.draw_page();
        if self.shell.is_expanded() {
            self.draw_panel();
        } else {
            self.draw_launcher();
        }
    }

    fn draw_page(&mut self) {
        let title = self.page.title();
        let label = self.page.context.label();
        let Some(buf) = self.compositor.layer_buffer_mut(self.layers.page) else {
            return;
        };
        buf.reset();
        let area = buf.area;
        if area.height < 2 {
            return;
        }

        let body = Rect::new(area.x, area.y, area.width, area.height - 1);
        PageView::new(&self.page.body).render(body, buf, &mut self.page_state);

        let mut status = format!(" {title}");
        if let Some(label) = label {
            status.push_str(&format!(" · {label}"));
        }
        status.push_str("  │ c chat · s ask about view · PgUp/PgDn scroll · q quit");
        if self.config.dev_mode {
            status.push_str(" [DEV]");
        }
        let style = theme::dim().add_modifier(Modifier::REVERSED);
        let y = area.y + area.height - 1;
        buf.set_style(Rect::new(area.x, y, area.width, 1), style);
        buf.set_stringn(area.x, y, status, area.width as usize, style);
    }

    fn draw_launcher(&mut self) {
        let unread = self.shell.has_unread();
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.launcher) {
            buf.reset();
            let area = buf.area;
            Launcher::new(unread).render(area, buf);
        }
    }

    fn draw_panel(&mut self) {
        let state = self.store.snapshot();
        let items = build_view(&state, &self.transcript, Utc::now());
        let page_label = self.page.context.label();
        let send_enabled = self.shell.send_enabled(self.store.is_loading());

        let Some(buf) = self.compositor.layer_buffer_mut(self.layers.panel) else {
            return;
        };
        buf.reset();
        let area = buf.area;
        ChatPanel {
            title: &self.config.title,
            health: self.shell.health(),
            page_label,
            banner: state.error.as_deref(),
            items: &items,
            input: &self.input,
            send_enabled,
            selection: self.selection.as_deref(),
            tick: self.tick,
        }
        .render(area, buf, &mut self.panel_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docs_chat_core::api::{
        AnswerMetadata, AnswerRequest, AnswerResponse, ApiError, FeedbackPayload,
        FeedbackResponse, HealthResponse, RetrieveFilter, Source,
    };
    use docs_chat_core::input::InputKey;
    use docs_chat_core::message::Role;
    use docs_chat_core::shell::ShellState;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct EchoApi {
        requests: Mutex<Vec<AnswerRequest>>,
        feedback: Mutex<Vec<FeedbackPayload>>,
        fail: bool,
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl RagApi for EchoApi {
        async fn retrieve_chunks(
            &self,
            _query: &str,
            _top_k: u32,
            _filter: Option<&RetrieveFilter>,
        ) -> Result<Vec<Source>, ApiError> {
            Ok(Vec::new())
        }

        async fn answer_question(&self, request: &AnswerRequest) -> Result<AnswerResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(ApiError::Status {
                    context: "Failed to get answer",
                    status: 500,
                    detail: "boom".into(),
                });
            }
            Ok(AnswerResponse {
                answer: format!("echo: {}", request.question),
                sources: Vec::new(),
                metadata: AnswerMetadata::default(),
            })
        }

        async fn submit_feedback(&self, feedback: &FeedbackPayload) -> Result<FeedbackResponse, ApiError> {
            self.feedback.lock().unwrap().push(feedback.clone());
            Ok(FeedbackResponse { status: "ok".into() })
        }

        async fn check_health(&self) -> Result<HealthResponse, ApiError> {
            Ok(HealthResponse {
                status: "healthy".into(),
                version: None,
            })
        }
    }

    fn page() -> PageDocument {
        let mut page = PageDocument::landing();
        page.context.module = Some("module-01-ros2".into());
        page
    }

    fn app(api: Arc<EchoApi>, config: WidgetConfig) -> App {
        let mut app = App::with_area(config, page(), api, Rect::new(0, 0, 100, 40));
        app.shell.set_health(HealthState::Healthy { version: None });
        app
    }

    async fn next_event(app: &mut App) {
        let event = app.events_rx.recv().await.unwrap();
        app.handle_app_event(event);
        app.update();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_action(Action::Input(InputKey::Char(c)));
        }
    }

    // ========================================================================
    // Layout
    // ========================================================================

    #[test]
    fn test_floating_bounds_in_bottom_right() {
        let area = Rect::new(0, 0, 120, 40);
        assert_eq!(launcher_bounds(area), Rect::new(105, 35, 13, 3));
        assert_eq!(panel_bounds(area), Rect::new(54, 8, 64, 30));

        let small = Rect::new(0, 0, 40, 12);
        let panel = panel_bounds(small);
        assert_eq!(panel.width, 38);
        assert_eq!(panel.height, 10);
        assert!(panel.x + panel.width <= small.width);
    }

    // ========================================================================
    // Shell
    // ========================================================================

    #[tokio::test]
    async fn test_open_and_minimize_swap_layers() {
        let mut app = app(Arc::new(EchoApi::default()), WidgetConfig::default());
        app.update();
        let launcher = launcher_bounds(Rect::new(0, 0, 100, 40));
        assert_eq!(app.compositor.layer_at(launcher.x + 1, launcher.y + 1), Some(app.layers.launcher));

        app.handle_action(Action::Open);
        app.update();
        assert_eq!(app.shell.state(), ShellState::Expanded);
        assert_eq!(app.compositor.layer_at(60, 20), Some(app.layers.panel));

        app.handle_action(Action::Minimize);
        app.update();
        assert_eq!(app.compositor.layer_at(60, 20), Some(app.layers.page));
    }

    #[tokio::test]
    async fn test_launcher_click_opens() {
        let mut app = app(Arc::new(EchoApi::default()), WidgetConfig::default());
        app.update();
        let bounds = launcher_bounds(Rect::new(0, 0, 100, 40));
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: bounds.x + 1,
            row: bounds.y + 1,
            modifiers: crossterm::event::KeyModifiers::NONE,
        });
        assert!(app.shell.is_expanded());
    }

    // ========================================================================
    // Conversation
    // ========================================================================

    #[tokio::test]
    async fn test_send_answer_clears_input_and_badges_when_minimized() {
        let api = Arc::new(EchoApi::default());
        let mut app = app(Arc::clone(&api), WidgetConfig::default());
        app.handle_action(Action::Open);
        type_text(&mut app, "what is a node?");
        app.handle_action(Action::Input(InputKey::Enter));
        assert!(app.input.is_sending());

        app.handle_action(Action::Minimize);
        next_event(&mut app).await;

        assert_eq!(app.input.value(), "");
        assert!(!app.input.is_sending());
        assert_eq!(app.store.last_role(), Some(Role::Assistant));
        assert!(app.shell.has_unread());
        // module only with scope_to_page
        assert_eq!(api.requests.lock().unwrap()[0].module, None);
    }

    #[tokio::test]
    async fn test_failed_send_keeps_input() {
        let api = Arc::new(EchoApi {
            fail: true,
            ..Default::default()
        });
        let mut app = app(api, WidgetConfig::default());
        app.handle_action(Action::Open);
        type_text(&mut app, "hello");
        app.handle_action(Action::Input(InputKey::Enter));
        next_event(&mut app).await;

        assert_eq!(app.input.value(), "hello");
        assert!(app.store.error().is_some());

        app.handle_action(Action::DismissBanner);
        assert_eq!(app.store.error(), None);
    }

    #[tokio::test]
    async fn test_submit_blocked_until_healthy() {
        let api = Arc::new(EchoApi::default());
        let mut app = app(Arc::clone(&api), WidgetConfig::default());
        app.shell.set_health(HealthState::Unavailable("down".into()));
        app.handle_action(Action::Open);
        type_text(&mut app, "hello");
        app.handle_action(Action::Input(InputKey::Enter));

        assert!(!app.input.is_sending());
        assert_eq!(app.store.len(), 0);
    }

    #[tokio::test]
    async fn test_submit_waits_while_store_is_loading() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(EchoApi {
            gate: Some(Arc::clone(&gate)),
            ..Default::default()
        });
        let mut app = app(api, WidgetConfig::default());
        let store = app.store.clone();
        let pending = tokio::spawn(async move { store.send_message("asked elsewhere", None).await });
        while !app.store.is_loading() {
            tokio::task::yield_now().await;
        }

        app.handle_action(Action::Open);
        type_text(&mut app, "hello");
        app.handle_action(Action::Input(InputKey::Enter));
        assert!(!app.input.is_sending());
        assert_eq!(app.input.value(), "hello");

        gate.notify_one();
        pending.await.unwrap();
        app.handle_action(Action::Input(InputKey::Enter));
        assert!(app.input.is_sending());
    }

    #[tokio::test]
    async fn test_selection_and_page_scope() {
        let api = Arc::new(EchoApi::default());
        let mut config = WidgetConfig::default();
        config.scope_to_page = true;
        let mut app = app(Arc::clone(&api), config);
        app.draw_layers();
        app.handle_action(Action::CaptureSelection);
        assert!(app.shell.is_expanded());
        assert!(app.selection.is_some());

        type_text(&mut app, "explain this");
        app.handle_action(Action::Input(InputKey::Enter));
        assert_eq!(app.selection, None);
        next_event(&mut app).await;

        let requests = api.requests.lock().unwrap();
        assert!(requests[0].selection_mode);
        assert!(requests[0]
            .selected_text
            .as_deref()
            .unwrap()
            .contains("Course Documentation"));
        assert_eq!(requests[0].module.as_deref(), Some("module-01-ros2"));
    }

    #[tokio::test]
    async fn test_feedback_targets_latest_answer() {
        let api = Arc::new(EchoApi::default());
        let mut app = app(Arc::clone(&api), WidgetConfig::default());
        app.handle_action(Action::Open);
        type_text(&mut app, "q1");
        app.handle_action(Action::Input(InputKey::Enter));
        next_event(&mut app).await;

        app.handle_action(Action::Feedback(FeedbackType::ThumbsUp));
        next_event(&mut app).await;

        let feedback = api.feedback.lock().unwrap();
        assert_eq!(feedback[0].question, "q1");
        assert_eq!(feedback[0].answer, "echo: q1");
        assert_eq!(feedback[0].feedback_type, FeedbackType::ThumbsUp);
    }

    #[tokio::test]
    async fn test_clear_resets_transcript() {
        let mut app = app(Arc::new(EchoApi::default()), WidgetConfig::default());
        app.handle_action(Action::Open);
        type_text(&mut app, "q1");
        app.handle_action(Action::Input(InputKey::Enter));
        next_event(&mut app).await;
        app.handle_action(Action::SelectNextAnswer);
        assert!(app.transcript.selected().is_some());

        app.handle_action(Action::Clear);
        assert!(app.store.is_empty());
        assert_eq!(app.transcript.selected(), None);
    }

    #[tokio::test]
    async fn test_paste_goes_to_input_only_when_expanded() {
        let mut app = app(Arc::new(EchoApi::default()), WidgetConfig::default());
        app.handle_terminal_event(Event::Paste("ignored".into()));
        assert_eq!(app.input.value(), "");

        app.handle_action(Action::Open);
        app.handle_terminal_event(Event::Paste("pasted".into()));
        assert_eq!(app.input.value(), "pasted");
    }
}
