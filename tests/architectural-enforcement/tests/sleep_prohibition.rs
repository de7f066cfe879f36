//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call sleep methods. Waiting happens on
//! I/O, channels or timeouts.
//! **Exception**: the frame tick in the TUI event loop.

use architectural_enforcement::{code_part, production_lines, rust_sources};

/// Production source trees checked by this test
const CHECKED_DIRS: &[&str] = &["chat/core/src", "tui/src"];

fn is_frame_tick(path: &std::path::Path, line: &str) -> bool {
    path.ends_with("tui/src/app.rs") && line.to_lowercase().contains("frame")
}

fn find_sleep_violations() -> Vec<String> {
    let mut violations = Vec::new();
    for dir in CHECKED_DIRS {
        for (path, lines) in rust_sources(dir) {
            for (idx, line) in production_lines(&lines).iter().enumerate() {
                let code = code_part(line);
                if !(code.contains("::sleep(") || code.contains(".sleep(")) {
                    continue;
                }
                if is_frame_tick(&path, code) {
                    continue;
                }
                violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
            }
        }
    }
    violations
}

#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code:");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nWait on I/O, a channel or tokio::time::timeout instead.");

        panic!("Found {} sleep violation(s) in production code", violations.len());
    }
}

#[test]
fn test_checked_dirs_exist() {
    for dir in CHECKED_DIRS {
        assert!(!rust_sources(dir).is_empty(), "no sources under {dir}");
    }
}
