//! Integration Test: Headless Core
//!
//! **Policy**: `chat/core` holds conversation logic only. Rendering belongs
//! to the surfaces, so the core never imports a terminal crate and never
//! prints; diagnostics go through `tracing`.

use std::fs;

use architectural_enforcement::{code_part, production_lines, rust_sources, workspace_root};

const FORBIDDEN_CRATES: &[&str] = &["ratatui", "crossterm"];
const FORBIDDEN_CALLS: &[&str] = &["println!(", "eprintln!(", "print!(", "dbg!("];

#[test]
fn test_core_manifest_has_no_terminal_crates() {
    let manifest = fs::read_to_string(workspace_root().join("chat/core/Cargo.toml"))
        .expect("core manifest readable");

    for krate in FORBIDDEN_CRATES {
        assert!(
            !manifest.lines().any(|l| l.trim_start().starts_with(krate)),
            "chat/core must not depend on {krate}"
        );
    }
}

#[test]
fn test_core_sources_do_not_render_or_print() {
    let mut violations = Vec::new();

    for (path, lines) in rust_sources("chat/core/src") {
        for (idx, line) in production_lines(&lines).iter().enumerate() {
            let code = code_part(line);
            let hit = FORBIDDEN_CRATES
                .iter()
                .map(|c| format!("{c}::"))
                .any(|prefix| code.contains(&prefix))
                || FORBIDDEN_CALLS.iter().any(|call| code.contains(call));
            if hit {
                violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "core must stay headless:\n{}",
        violations.join("\n")
    );
}
