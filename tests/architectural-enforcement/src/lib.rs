//! Architectural Enforcement Integration Tests
//!
//! Source-level checks for rules the compiler can't enforce:
//! - No sleep() calls in production code, except the TUI frame tick
//! - The chat core stays headless: no terminal crates, no stdout printing
//!
//! This crate only holds the file-walking helpers; the checks live in
//! `tests/`.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root, two levels above this crate
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// Every `.rs` file under `dir` (relative to the workspace root), with its lines
pub fn rust_sources(dir: &str) -> Vec<(PathBuf, Vec<String>)> {
    let root = workspace_root().join(dir);
    walkdir::WalkDir::new(&root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .filter_map(|e| {
            let content = fs::read_to_string(e.path()).ok()?;
            Some((
                e.path().to_path_buf(),
                content.lines().map(str::to_string).collect(),
            ))
        })
        .collect()
}

/// Line content before any `//` comment
pub fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// Index of the `#[cfg(test)]` line, if the file has an inline test module
pub fn test_module_start(lines: &[String]) -> Option<usize> {
    lines.iter().position(|l| l.trim() == "#[cfg(test)]")
}

/// Lines of production code: everything before the inline test module
pub fn production_lines(lines: &[String]) -> &[String] {
    match test_module_start(lines) {
        Some(idx) => &lines[..idx],
        None => lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_part_strips_comments() {
        assert_eq!(code_part("let x = 1; // sleep(1)"), "let x = 1; ");
        assert_eq!(code_part("/// docs"), "");
    }

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let lines: Vec<String> = ["fn a() {}", "#[cfg(test)]", "mod tests {}"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(production_lines(&lines).len(), 1);
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }
}
