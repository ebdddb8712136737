//! Rendering the route tables as a configuration fragment.
//!
//! The fragment is spliced by hand into the load generator's Python
//! configuration module, so it is emitted as Python literals.

use std::path::Path;

use crate::domain::ServiceClass;

use super::aggregate::{AdjacencyTable, RouteTables};
use super::error::SurveyError;

/// Render both tables as configuration text.
///
/// Origins and destinations appear in sorted order; an empty table keeps
/// its assignment with a placeholder comment.
pub fn render_config(tables: &RouteTables) -> String {
    let mut out = String::new();
    out.push_str("# Route table (generated)\n");
    out.push_str("# Format: {origin: {destination: True}}\n");

    render_table(
        &mut out,
        "ROUTES_HIGH_SPEED",
        "# High-speed routes (travelservice - G/D trains)",
        "# no high-speed routes found",
        tables.table(ServiceClass::HighSpeed),
    );
    out.push('\n');
    render_table(
        &mut out,
        "ROUTES_NORMAL",
        "# Normal routes (travel2service - K/T/Z trains)",
        "# no normal routes found",
        tables.table(ServiceClass::Normal),
    );

    out
}

fn render_table(
    out: &mut String,
    name: &str,
    heading: &str,
    empty_note: &str,
    table: &AdjacencyTable,
) {
    out.push_str(heading);
    out.push('\n');
    out.push_str(&format!("{name}: dict[str, dict[str, bool]] = {{\n"));

    let mut any = false;
    for (origin, destinations) in table {
        let served: Vec<_> = destinations
            .iter()
            .filter(|(_, present)| **present)
            .map(|(dest, _)| dest)
            .collect();
        if served.is_empty() {
            continue;
        }

        any = true;
        out.push_str(&format!("    {}: {{\n", quote(origin.as_str())));
        for dest in served {
            out.push_str(&format!("        {}: True,\n", quote(dest.as_str())));
        }
        out.push_str("    },\n");
    }

    if !any {
        out.push_str(&format!("    {empty_note}\n"));
    }
    out.push_str("}\n");
}

/// Double-quoted Python string literal. Backslashes, quotes and control
/// characters are escaped.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Write the rendered configuration, replacing any previous file.
pub fn write_config(path: &Path, text: &str) -> Result<(), SurveyError> {
    std::fs::write(path, text).map_err(|e| SurveyError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
