use anyhow::Result;
use std::io::Write;

use crate::application::{AppError, TableSnapshot};
use crate::domain::{format_grouped, format_plain};

/// The forms a snapshot can be rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtifactFormat {
    /// Fixed-width grid, the visual form of the sheet
    #[default]
    Text,
    Csv,
    Json,
}

impl ArtifactFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactFormat::Text => "table",
            ArtifactFormat::Csv => "csv",
            ArtifactFormat::Json => "json",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" | "text" | "txt" => Some(ArtifactFormat::Text),
            "csv" => Some(ArtifactFormat::Csv),
            "json" => Some(ArtifactFormat::Json),
            _ => None,
        }
    }

    /// Parse a format name, reporting unknown names as an error.
    pub fn parse(s: &str) -> Result<Self, AppError> {
        Self::from_str(s).ok_or_else(|| AppError::UnknownFormat(s.to_string()))
    }

    /// File extension for exported artifacts.
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::Text => "txt",
            ArtifactFormat::Csv => "csv",
            ArtifactFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Write `snapshot` to `writer` in the given format.
pub fn render<W: Write>(snapshot: &TableSnapshot, format: ArtifactFormat, writer: W) -> Result<()> {
    match format {
        ArtifactFormat::Text => render_table(snapshot, writer),
        ArtifactFormat::Csv => render_csv(snapshot, writer),
        ArtifactFormat::Json => render_json(snapshot, writer),
    }
}

/// Render into a string, for display and tests.
pub fn render_to_string(snapshot: &TableSnapshot, format: ArtifactFormat) -> Result<String> {
    let mut buffer = Vec::new();
    render(snapshot, format, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

const HEADERS: [&str; 6] = ["No", "ITEM", "BAGS", "KGS", "RS", "AMOUNT"];

/// Fixed-width grid: heading, header row, one line per row, and the totals footer.
pub fn render_table<W: Write>(snapshot: &TableSnapshot, mut writer: W) -> Result<()> {
    let body: Vec<[String; 6]> = snapshot
        .rows
        .iter()
        .map(|row| {
            [
                row.position.to_string(),
                display_cell(&row.item),
                display_cell(&row.bags),
                display_cell(&row.kgs),
                display_cell(&row.rs),
                format_grouped(row.amount),
            ]
        })
        .collect();

    let footer = [
        String::new(),
        "TOTAL".to_string(),
        format_plain(snapshot.totals.bags),
        format_plain(snapshot.totals.kgs),
        "=".to_string(),
        format_grouped(snapshot.totals.amount),
    ];

    let mut widths = HEADERS.map(|h| h.chars().count());
    for cells in body.iter().chain(std::iter::once(&footer)) {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let line_width = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);

    if !snapshot.heading.is_empty() {
        writeln!(writer, "{:^line_width$}", display_cell(&snapshot.heading))?;
    }
    writeln!(writer, "{}", format_line(&HEADERS.map(String::from), &widths))?;
    writeln!(writer, "{}", "-".repeat(line_width))?;
    if body.is_empty() {
        writeln!(writer, "{:^line_width$}", "(no rows)")?;
    }
    for cells in &body {
        writeln!(writer, "{}", format_line(cells, &widths))?;
    }
    writeln!(writer, "{}", "=".repeat(line_width))?;
    writeln!(writer, "{}", format_line(&footer, &widths))?;

    writer.flush()?;
    Ok(())
}

// Tabs and line breaks would throw off the column widths.
fn display_cell(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

// Item column is left-aligned, everything else right-aligned.
fn format_line(cells: &[String; 6], widths: &[usize; 6]) -> String {
    cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(column, (cell, &width))| {
            if column == 1 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// CSV with one line per row followed by a TOTAL line.
pub fn render_csv<W: Write>(snapshot: &TableSnapshot, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["no", "id", "item", "bags", "kgs", "rs", "amount"])?;

    for row in &snapshot.rows {
        csv_writer.write_record([
            row.position.to_string(),
            row.id.to_string(),
            row.item.clone(),
            row.bags.clone(),
            row.kgs.clone(),
            row.rs.clone(),
            row.amount.to_string(),
        ])?;
    }

    csv_writer.write_record([
        String::new(),
        String::new(),
        "TOTAL".to_string(),
        format_plain(snapshot.totals.bags),
        format_plain(snapshot.totals.kgs),
        String::new(),
        format_plain(snapshot.totals.amount),
    ])?;

    csv_writer.flush()?;
    Ok(())
}

/// Pretty-printed JSON of the whole snapshot.
pub fn render_json<W: Write>(snapshot: &TableSnapshot, mut writer: W) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    writer.write_all(json.as_bytes())?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
