//! CSS variable sheet generation
//!
//! Renders a `:root` block of custom properties from caller-supplied values.
//! The geometry numbers themselves come from an external collaborator; this
//! module only formats and writes them.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::io::write_atomic;

/// A value for one CSS custom property.
#[derive(Debug, Clone, PartialEq)]
pub enum CssValue {
    /// Numeric pixel value, rendered with a `px` suffix.
    Px(f64),
    /// Written verbatim, for values that carry their own unit or keyword.
    Raw(String),
}

impl std::fmt::Display for CssValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Raw(s) => write!(f, "{s}"),
        }
    }
}

/// Render a stylesheet defining one custom property per entry.
///
/// Keys are camelCase identifiers and are converted to kebab-case variable
/// names. Entries are emitted in slice order, so output is deterministic for
/// a given input.
pub fn render(name: &str, vars: &[(String, CssValue)]) -> String {
    let mut css = format!(
        "/* {name}.css */\n/* This file defines CSS variables for custom UI to use (AUTO GENERATED). */\n"
    );
    css.push_str("\n:root {\n");
    for (key, value) in vars {
        css.push_str(&format!("  --{}: {};\n", kebab_case(key), value));
    }
    css.push_str("}\n");
    css
}

/// Render and atomically write `<chrome_root>/CSS/<name>.css`.
///
/// # Errors
///
/// Returns an error if the file or its parent directories cannot be written.
pub fn write_css_variables(
    chrome_root: &Path,
    name: &str,
    vars: &[(String, CssValue)],
) -> Result<PathBuf> {
    let path = chrome_root.join("CSS").join(format!("{name}.css"));
    write_atomic(&path, render(name, vars).as_bytes())?;
    Ok(path)
}

/// Convert a camelCase identifier to kebab-case.
fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_uppercase() {
            out.push('-');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out.trim_start_matches('-').to_string()
}
