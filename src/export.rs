//! Best-effort CSV-to-XLSX export.
//!
//! Runs once at the end of a successful job. Failure here never fails the
//! job; the caller logs and moves on, the CSV dataset remains the durable
//! artifact.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook};

/// Header fill, the same blue the frontend uses for the status panel.
const HEADER_FILL: u32 = 0x4A90E2;

/// Per-column widths matching [`crate::sink::CSV_COLUMNS`].
const COLUMN_WIDTHS: &[f64] = &[12.0, 22.0, 8.0, 70.0, 14.0, 16.0, 45.0];

/// Convert the streamed dataset into a spreadsheet with a styled, frozen
/// header row. Reads the CSV row-by-row; never loads the dataset whole.
pub fn convert_to_xlsx(csv_path: &Path, xlsx_path: &Path) -> Result<()> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open dataset {}", csv_path.display()))?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center);

    let headers = reader
        .headers()
        .context("Failed to read dataset header")?
        .clone();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .context("Failed to write header cell")?;
    }

    let mut row_index: u32 = 1;
    for record in reader.records() {
        let record = record.context("Failed to read dataset row")?;
        for (col, field) in record.iter().enumerate() {
            worksheet
                .write_string(row_index, col as u16, field)
                .context("Failed to write data cell")?;
        }
        row_index += 1;
    }

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet
            .set_column_width(col as u16, *width)
            .context("Failed to set column width")?;
    }
    worksheet
        .set_freeze_panes(1, 0)
        .context("Failed to freeze header row")?;

    workbook
        .save(xlsx_path)
        .with_context(|| format!("Failed to save spreadsheet {}", xlsx_path.display()))?;

    info!(
        "Exported {} review rows to {}",
        row_index - 1,
        xlsx_path.display()
    );
    Ok(())
}
