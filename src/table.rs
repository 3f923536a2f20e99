//! table.rs
//!
//! Box-drawn text tables. Outer border is double-line, inner separators single.
//! Horizontal rules are drawn above the header, below it, and at the bottom only.
//!
//! Widths are terminal display columns, not chars: emoji and CJK take two.

use console::{measure_text_width, truncate_str};

const ELLIPSIS: &str = "…";

pub struct Table {
    rows: Vec<Vec<String>>,
    fixed: Vec<Option<usize>>,
}

impl Table {
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        let header: Vec<String> = header.into_iter().map(Into::into).collect();
        let fixed = vec![None; header.len()];
        Self {
            rows: vec![header],
            fixed,
        }
    }

    /// Rows shorter than the header are padded with empty cells; extra cells are dropped.
    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        let mut row: Vec<String> = row.into_iter().map(Into::into).collect();
        row.resize(self.fixed.len(), String::new());
        self.rows.push(row);
    }

    /// Pin column `index` to exactly `width` columns, truncating longer cells.
    pub fn fixed_width(mut self, index: usize, width: usize) -> Self {
        if let Some(slot) = self.fixed.get_mut(index) {
            *slot = Some(width.max(1));
        }
        self
    }

    fn column_widths(&self) -> Vec<usize> {
        self.fixed
            .iter()
            .enumerate()
            .map(|(i, fixed)| {
                fixed.unwrap_or_else(|| {
                    self.rows
                        .iter()
                        .map(|r| measure_text_width(&r[i]))
                        .max()
                        .unwrap_or(0)
                })
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut out = String::new();

        out.push_str(&rule(&widths, '╔', '═', '╤', '╗'));
        for (i, row) in self.rows.iter().enumerate() {
            out.push_str(&build_row(row, &widths));
            if i == 0 {
                out.push_str(&rule(&widths, '╟', '─', '┼', '╢'));
            }
        }
        out.push_str(&rule(&widths, '╚', '═', '╧', '╝'));

        out
    }
}

fn rule(widths: &[usize], left: char, fill: char, join: char, right: char) -> String {
    let segments: Vec<String> = widths
        .iter()
        .map(|w| fill.to_string().repeat(w + 2))
        .collect();
    format!("{left}{}{right}\n", segments.join(&join.to_string()))
}

fn build_row(row: &[String], widths: &[usize]) -> String {
    let cells: Vec<String> = row
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!(" {} ", pad(&truncate(cell, w), w)))
        .collect();
    format!("║{}║\n", cells.join("│"))
}

/// Cut `s` to at most `width` display columns, marking the cut with an ellipsis.
pub fn truncate(s: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    truncate_str(s, width, ELLIPSIS).into_owned()
}

/// A wide char cut at the edge leaves a short cell; padding makes it up.
fn pad(s: &str, width: usize) -> String {
    let len = measure_text_width(s);
    format!("{s}{}", " ".repeat(width.saturating_sub(len)))
}
