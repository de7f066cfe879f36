//! Page Context
//!
//! Metadata about the documentation page the widget is mounted over. All of
//! it is optional: a page with no recognizable module or chapter is still a
//! page, the widget just doesn't scope questions to it.

use std::path::{Component, Path};

/// Page-local identifiers, read opportunistically
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageContext {
    /// Module directory (e.g. `module-01-ros2`)
    pub module: Option<String>,
    /// Chapter identifier, the file stem (e.g. `01-introduction`)
    pub chapter: Option<String>,
    /// Title from front matter or the first `# ` heading
    pub title: Option<String>,
}

impl PageContext {
    /// Derive context from a document path and its contents
    ///
    /// The module is the first directory below a `docs` component, the
    /// chapter is the file stem.
    pub fn from_document(path: &Path, contents: &str) -> Self {
        let components: Vec<String> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let module = components
            .iter()
            .position(|c| c == "docs")
            .and_then(|i| {
                // only a directory counts, not docs/<file>
                (i + 2 < components.len()).then(|| components[i + 1].clone())
            });

        let chapter = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty());

        Self {
            module,
            chapter,
            title: extract_title(contents),
        }
    }

    /// Label for the header, e.g. `module-01-ros2 / 01-introduction`
    pub fn label(&self) -> Option<String> {
        match (&self.module, &self.chapter) {
            (Some(m), Some(c)) => Some(format!("{m} / {c}")),
            (Some(m), None) => Some(m.clone()),
            (None, Some(c)) => Some(c.clone()),
            (None, None) => None,
        }
    }
}

/// `title:` from a leading `---` front matter block, else the first `# ` heading
fn extract_title(contents: &str) -> Option<String> {
    let mut lines = contents.lines();
    if lines.next().map(str::trim) == Some("---") {
        for line in lines.by_ref() {
            let line = line.trim();
            if line == "---" {
                break;
            }
            if let Some(value) = line.strip_prefix("title:") {
                let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    contents
        .lines()
        .find_map(|l| l.strip_prefix("# "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
