//! Integration Tests for the Widget Surface
//!
//! Drives a real [`ChatStore`] over a mock API and renders the result the
//! way the app does: key events through the key map, snapshots through the
//! core's view builder, lines through the chat panel.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::StatefulWidget;

use docs_chat_core::api::{
    AnswerMetadata, AnswerRequest, AnswerResponse, ApiError, FeedbackPayload, FeedbackResponse,
    HealthResponse, RagApi, RetrieveFilter, Source, SourceMetadata,
};
use docs_chat_core::input::{ChatInput, InputAction};
use docs_chat_core::shell::{HealthState, ShellState, WidgetShell};
use docs_chat_core::store::{ChatStore, SendOutcome};
use docs_chat_core::transcript::{build_view, TranscriptUi};
use docs_chat_tui::keys::{map_key, Action};
use docs_chat_tui::widgets::{ChatPanel, ChatPanelState};

// ============================================================================
// Mock API
// ============================================================================

struct CourseApi;

#[async_trait]
impl RagApi for CourseApi {
    async fn retrieve_chunks(
        &self,
        _query: &str,
        _top_k: u32,
        _filter: Option<&RetrieveFilter>,
    ) -> Result<Vec<Source>, ApiError> {
        Ok(Vec::new())
    }

    async fn answer_question(&self, request: &AnswerRequest) -> Result<AnswerResponse, ApiError> {
        if request.question.contains("fail") {
            return Err(ApiError::NoResponse {
                context: "Failed to get answer",
                reason: "connection refused".into(),
                timed_out: false,
            });
        }
        Ok(AnswerResponse {
            answer: "Run `ros2 node list`:\n```bash\nros2 node list\n```".into(),
            sources: vec![Source {
                chunk_id: "ros2-nodes-3".into(),
                text: "A node is a process that performs computation.".into(),
                metadata: SourceMetadata {
                    source: Some("module-01-ros2/02-nodes".into()),
                    module: Some("module-01-ros2".into()),
                    chapter: Some("Nodes".into()),
                    ..Default::default()
                },
                score: 0.87,
            }],
            metadata: AnswerMetadata::default(),
        })
    }

    async fn submit_feedback(&self, _f: &FeedbackPayload) -> Result<FeedbackResponse, ApiError> {
        Ok(FeedbackResponse {
            status: "received".into(),
        })
    }

    async fn check_health(&self) -> Result<HealthResponse, ApiError> {
        Ok(HealthResponse {
            status: "healthy".into(),
            version: Some("1.0.0".into()),
        })
    }
}

// ============================================================================
// Helpers
// ============================================================================

struct Surface {
    store: ChatStore,
    shell: WidgetShell,
    input: ChatInput,
    ui: TranscriptUi,
    panel: ChatPanelState,
}

impl Surface {
    fn new() -> Self {
        let mut shell = WidgetShell::new();
        shell.set_health(HealthState::Healthy {
            version: Some("1.0.0".into()),
        });
        Self {
            store: ChatStore::new(Arc::new(CourseApi)),
            shell,
            input: ChatInput::default(),
            ui: TranscriptUi::new(150, "https://docs.example.com"),
            panel: ChatPanelState::default(),
        }
    }

    fn press(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Action {
        map_key(
            KeyEvent::new(code, modifiers),
            self.shell.state(),
            self.store.error().is_some(),
        )
    }

    /// Type and submit, awaiting the answer inline
    async fn ask(&mut self, question: &str) -> SendOutcome {
        for c in question.chars() {
            if let Action::Input(key) = self.press(KeyCode::Char(c), KeyModifiers::NONE) {
                self.input.handle_key(key);
            }
        }
        let Action::Input(enter) = self.press(KeyCode::Enter, KeyModifiers::NONE) else {
            panic!("Enter should reach the input");
        };
        assert_eq!(self.input.handle_key(enter), InputAction::Submit);

        let disabled = !self.shell.send_enabled(self.input.is_sending());
        let text = self.input.begin_submit(disabled).expect("submit accepted");
        let outcome = self.store.send_message(&text, None).await;
        self.input.finish_submit(outcome == SendOutcome::Answered);
        outcome
    }

    fn render(&mut self) -> Vec<String> {
        let state = self.store.snapshot();
        let items = build_view(&state, &self.ui, Utc::now());
        let area = Rect::new(0, 0, 60, 40);
        let mut buf = Buffer::empty(area);
        ChatPanel {
            title: "AI Learning Assistant",
            health: self.shell.health(),
            page_label: None,
            banner: state.error.as_deref(),
            items: &items,
            input: &self.input,
            send_enabled: self.shell.send_enabled(self.input.is_sending()),
            selection: None,
            tick: 0,
        }
        .render(area, &mut buf, &mut self.panel);

        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }
}

fn shows(rows: &[String], needle: &str) -> bool {
    rows.iter().any(|r| r.contains(needle))
}

// ============================================================================
// Flows
// ============================================================================

#[tokio::test]
async fn test_question_answer_and_citations() {
    let mut surface = Surface::new();
    assert_eq!(surface.press(KeyCode::Char('c'), KeyModifiers::NONE), Action::Open);
    surface.shell.open();
    assert_eq!(surface.shell.state(), ShellState::Expanded);

    assert_eq!(surface.ask("how do I list nodes?").await, SendOutcome::Answered);
    assert_eq!(surface.input.value(), "");

    let rows = surface.render();
    assert!(shows(&rows, "how do I list nodes?"));
    assert!(shows(&rows, "Run ros2 node list:"));
    assert!(shows(&rows, " bash "));
    assert!(shows(&rows, "▸ Sources (1)"));
    assert!(!shows(&rows, "87% match"));

    // Ctrl+O opens the latest answer's sources
    assert_eq!(
        surface.press(KeyCode::Char('o'), KeyModifiers::CONTROL),
        Action::ToggleSources
    );
    let target = surface.ui.target(&surface.store.messages()).unwrap();
    surface.ui.toggle_sources(&target);

    let rows = surface.render();
    assert!(shows(&rows, "▾ Sources (1)"));
    assert!(shows(&rows, "[1] module-01-ros2 - Nodes  87% match"));
    assert!(shows(&rows, "\"A node is a process that performs computation.\""));
    assert!(shows(&rows, "https://docs.example.com/docs/module-01-ros2/02-nodes"));
}

#[tokio::test]
async fn test_failure_shows_notice_banner_and_keeps_input() {
    let mut surface = Surface::new();
    surface.shell.open();

    assert_eq!(surface.ask("please fail").await, SendOutcome::Failed);
    assert_eq!(surface.input.value(), "please fail");

    let rows = surface.render();
    assert!(shows(&rows, "Error:"));
    assert!(shows(&rows, "(Esc to dismiss)"));

    // Esc dismisses the banner first, then minimizes
    assert_eq!(
        surface.press(KeyCode::Esc, KeyModifiers::NONE),
        Action::DismissBanner
    );
    surface.store.clear_error();
    assert!(!shows(&surface.render(), "(Esc to dismiss)"));
    assert_eq!(surface.press(KeyCode::Esc, KeyModifiers::NONE), Action::Minimize);
}
