pub mod report;

use colored::Colorize;

use crate::render::{DisplayRow, DisplaySurface, StatusClass};
use crate::store::StatusSummary;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

/// Keeps painted rows in memory. Used for JSON output and in tests.
#[derive(Clone, Debug, Default)]
pub struct RowBuffer {
    rows: Vec<DisplayRow>,
}

impl RowBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }
}

impl DisplaySurface for RowBuffer {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, row: &DisplayRow) {
        self.rows.push(row.clone());
    }
}

const HEADERS: [&str; 4] = ["NAME", "AGE", "GENDER", "STATUS"];

/// Aligned, colored table for the terminal.
#[derive(Clone, Debug, Default)]
pub struct TerminalTable {
    rows: Vec<DisplayRow>,
}

impl TerminalTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn to_text(&self) -> String {
        let cells: Vec<[String; 4]> = self
            .rows
            .iter()
            .map(|r| {
                [
                    r.name.clone(),
                    r.age_text(),
                    r.gender.clone(),
                    r.status.clone(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in cells.iter() {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        let header = HEADERS
            .iter()
            .enumerate()
            .map(|(i, h)| pad(h, widths[i]))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(&format!("{}\n", header.trim_end().bold()));

        for (row, display) in cells.iter().zip(self.rows.iter()) {
            let line = format!(
                "{}  {}  {}  {}",
                pad(&row[0], widths[0]),
                pad(&row[1], widths[1]),
                pad(&row[2], widths[2]),
                paint_status(&row[3], display.status_class),
            );
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

impl DisplaySurface for TerminalTable {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, row: &DisplayRow) {
        self.rows.push(row.clone());
    }
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    let mut out = value.to_string();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    out
}

fn paint_status(value: &str, class: StatusClass) -> String {
    match class {
        StatusClass::Delivered => value.green().to_string(),
        StatusClass::Pending => value.yellow().to_string(),
        StatusClass::Return => value.red().bold().to_string(),
        StatusClass::Default => value.white().to_string(),
    }
}

/// `<tr>` rows for the dashboard's `<tbody id="patientList">`.
#[derive(Clone, Debug, Default)]
pub struct HtmlTableBody {
    html: String,
    len: usize,
}

impl HtmlTableBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl DisplaySurface for HtmlTableBody {
    fn clear(&mut self) {
        self.html.clear();
        self.len = 0;
    }

    fn append_row(&mut self, row: &DisplayRow) {
        self.html.push_str("<tr>");
        self.html
            .push_str(&format!("<td>{}</td>", escape_html(&row.name)));
        self.html.push_str(&format!("<td>{}</td>", row.age_text()));
        self.html
            .push_str(&format!("<td>{}</td>", escape_html(&row.gender)));
        self.html.push_str(&format!(
            "<td><span class=\"status {}\">{}</span></td>",
            row.status_class.css_class(),
            escape_html(&row.status)
        ));
        self.html.push_str("</tr>\n");
        self.len += 1;
    }
}

pub(crate) fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_text(rows: &[DisplayRow]) -> Vec<u8> {
    let mut table = TerminalTable::new();
    for row in rows {
        table.append_row(row);
    }
    table.to_text().into_bytes()
}

pub fn render_json(rows: &[DisplayRow]) -> Vec<u8> {
    serde_json::to_vec_pretty(rows).unwrap_or_else(|_| b"[]\n".to_vec())
}

pub fn render_html(rows: &[DisplayRow], summary: &StatusSummary) -> Vec<u8> {
    report::render_html(rows, summary)
}
