//! Emit isoltest semantic test files
//!
//! ```text
//! // <description>
//! <source>
//! // ====
//! // compileViaYul: also
//! // ----
//! // f(uint256): 1 -> 2
//! ```
//!
//! The settings block (`// ====`) only appears for tests marked
//! `ALSO_VIA_YUL`.

use crate::config::OutputLayout;
use crate::error::Result;
use crate::extract::Test;
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub const SETTINGS_SEPARATOR: &str = "// ====";
pub const VIA_YUL_SETTING: &str = "// compileViaYul: also";
pub const EXPECTATIONS_SEPARATOR: &str = "// ----";

/// Render the declarative file for an eligible test
///
/// Returns `None` for an ineligible test; those never produce output.
pub fn render(test: &Test) -> Option<String> {
    if !test.is_eligible() {
        return None;
    }

    let mut out = String::new();

    if !test.description.is_empty() {
        let block = test
            .description
            .lines()
            .map(|line| format!("// {}", line))
            .collect::<Vec<_>>()
            .join("\n");
        out.push_str(&block);
        if !test.source.starts_with('\n') {
            out.push('\n');
        }
    }

    out.push_str(&test.source);
    out.push('\n');

    if test.also_via_yul {
        out.push_str(SETTINGS_SEPARATOR);
        out.push('\n');
        out.push_str(VIA_YUL_SETTING);
        out.push('\n');
    }

    out.push_str(EXPECTATIONS_SEPARATOR);
    out.push('\n');
    for call in &test.calls {
        out.push_str(&format!("// {}\n", call));
    }
    out.push('\n');

    Some(out)
}

/// Write an eligible test to its place in `layout`
///
/// Returns the written path, or `None` if the test is not eligible.
pub fn write(test: &Test, layout: &OutputLayout) -> Result<Option<PathBuf>> {
    let Some(content) = render(test) else {
        return Ok(None);
    };

    layout.prepare()?;
    let path = layout.test_path(&test.name);
    fs::write(&path, content)?;
    info!(target: "isoltest::emit", test = %test.name, path = ?path, "wrote test");
    Ok(Some(path))
}
