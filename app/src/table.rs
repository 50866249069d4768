//! FILENAME: app/src/table.rs
// PURPOSE: Plain-text rendering of rows for the terminal.

/// Cells longer than this are cut and marked with `~`.
pub const MAX_CELL_WIDTH: usize = 24;

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        cut.push('~');
        cut
    }
}

fn looks_numeric(text: &str) -> bool {
    !text.is_empty() && text.parse::<f64>().is_ok()
}

/// Renders a header, a rule and the rows. Numbers are right-aligned.
pub fn render_table(columns: &[String], rows: &[Vec<String>]) -> String {
    let header: Vec<String> = columns.iter().map(|c| clip(c)).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| clip(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (col, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(col) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let line = |cells: &[String], out: &mut String| {
        let rendered: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| {
                if looks_numeric(cell) {
                    format!("{:>width$}", cell, width = width)
                } else {
                    format!("{:<width$}", cell, width = width)
                }
            })
            .collect();
        out.push_str(rendered.join("  ").trim_end());
        out.push('\n');
    };

    line(&header, &mut out);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in &body {
        line(row, &mut out);
    }
    out
}
