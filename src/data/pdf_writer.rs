//! Minimal PDF 1.4 serializer for export documents.
//!
//! Produces an A4 portrait document using the standard Helvetica fonts (no embedding):
//! a title line, a "Generated on" line, and the table with a filled header row and
//! shaded alternate rows. Rows that do not fit continue on new pages with the header
//! repeated.

use chrono::{Local, NaiveDateTime};
use std::fmt::Write as _;
use std::io::Write;

use crate::data::data_exporter::{DocumentWriter, ExportDocument, ExportError, ExportFormat};

const PAGE_WIDTH: f64 = 595.28;
const PAGE_HEIGHT: f64 = 841.89;
const MM: f64 = 72.0 / 25.4;

const MARGIN: f64 = 14.0 * MM;
const TITLE_Y: f64 = PAGE_HEIGHT - 22.0 * MM;
const TIMESTAMP_Y: f64 = PAGE_HEIGHT - 32.0 * MM;
const FIRST_TABLE_TOP: f64 = PAGE_HEIGHT - 40.0 * MM;
const NEXT_TABLE_TOP: f64 = PAGE_HEIGHT - MARGIN;

const TITLE_SIZE: f64 = 20.0;
const TIMESTAMP_SIZE: f64 = 10.0;
const CELL_SIZE: f64 = 8.0;
const CELL_PADDING: f64 = 4.0;
const ROW_HEIGHT: f64 = CELL_SIZE + 2.0 * CELL_PADDING + 2.0;
/// Rough Helvetica advance width as a fraction of the font size
const AVG_CHAR_WIDTH: f64 = 0.5;

const HEADER_FILL: (u8, u8, u8) = (79, 70, 229);
const ALT_ROW_FILL: (u8, u8, u8) = (249, 250, 251);

#[derive(Debug, Default, Clone)]
pub struct PdfDocumentWriter {
    generated_at: Option<NaiveDateTime>,
}

impl PdfDocumentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the "Generated on" timestamp instead of using the local clock
    pub fn with_timestamp(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    fn timestamp_label(&self) -> String {
        let at = self
            .generated_at
            .unwrap_or_else(|| Local::now().naive_local());
        format!("Generated on: {}", at.format("%Y-%m-%d %H:%M:%S"))
    }

    /// Render the document to raw PDF bytes
    pub fn render(&self, doc: &ExportDocument) -> Vec<u8> {
        let pages = self.layout_pages(doc);
        let contents: Vec<String> = pages
            .iter()
            .enumerate()
            .map(|(index, rows)| self.page_content(doc, index == 0, rows.clone()))
            .collect();
        assemble(&contents)
    }

    /// Split body row indices into pages
    fn layout_pages(&self, doc: &ExportDocument) -> Vec<std::ops::Range<usize>> {
        let per_page = |top: f64| (((top - MARGIN) / ROW_HEIGHT).floor() as usize).max(2) - 1;
        let first = per_page(FIRST_TABLE_TOP);
        let next = per_page(NEXT_TABLE_TOP);

        let total = doc.rows.len();
        let mut pages = vec![0..first.min(total)];
        let mut start = first.min(total);
        while start < total {
            let end = (start + next).min(total);
            pages.push(start..end);
            start = end;
        }
        pages
    }

    fn page_content(
        &self,
        doc: &ExportDocument,
        first_page: bool,
        rows: std::ops::Range<usize>,
    ) -> String {
        let mut out = String::new();

        let table_top = if first_page {
            text(&mut out, "F2", TITLE_SIZE, MARGIN, TITLE_Y, &doc.title);
            text(
                &mut out,
                "F1",
                TIMESTAMP_SIZE,
                MARGIN,
                TIMESTAMP_Y,
                &self.timestamp_label(),
            );
            FIRST_TABLE_TOP
        } else {
            NEXT_TABLE_TOP
        };

        let columns = doc.headers.len();
        if columns == 0 {
            return out;
        }
        let table_width = PAGE_WIDTH - 2.0 * MARGIN;
        let col_width = table_width / columns as f64;
        let max_chars =
            (((col_width - 2.0 * CELL_PADDING) / (CELL_SIZE * AVG_CHAR_WIDTH)).floor() as usize)
                .max(1);

        // Header row
        fill_rect(&mut out, HEADER_FILL, MARGIN, table_top - ROW_HEIGHT, table_width);
        set_fill(&mut out, (255, 255, 255));
        for (i, header) in doc.headers.iter().enumerate() {
            let x = MARGIN + i as f64 * col_width + CELL_PADDING;
            text(
                &mut out,
                "F2",
                CELL_SIZE,
                x,
                baseline(table_top),
                &truncate(header, max_chars),
            );
        }

        for (n, row_index) in rows.enumerate() {
            let row_top = table_top - (n + 1) as f64 * ROW_HEIGHT;
            if n % 2 == 1 {
                fill_rect(&mut out, ALT_ROW_FILL, MARGIN, row_top - ROW_HEIGHT, table_width);
            }
            set_fill(&mut out, (33, 33, 33));
            for (i, cell) in doc.rows[row_index].iter().take(columns).enumerate() {
                let x = MARGIN + i as f64 * col_width + CELL_PADDING;
                text(
                    &mut out,
                    "F1",
                    CELL_SIZE,
                    x,
                    baseline(row_top),
                    &truncate(cell, max_chars),
                );
            }
        }

        out
    }
}

impl DocumentWriter for PdfDocumentWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn write_document(
        &self,
        doc: &ExportDocument,
        out: &mut dyn Write,
    ) -> Result<(), ExportError> {
        out.write_all(&self.render(doc))?;
        Ok(())
    }
}

fn baseline(row_top: f64) -> f64 {
    row_top - CELL_PADDING - CELL_SIZE
}

fn set_fill(out: &mut String, (r, g, b): (u8, u8, u8)) {
    let _ = writeln!(
        out,
        "{:.3} {:.3} {:.3} rg",
        r as f64 / 255.0,
        g as f64 / 255.0,
        b as f64 / 255.0
    );
}

fn fill_rect(out: &mut String, color: (u8, u8, u8), x: f64, y: f64, width: f64) {
    set_fill(out, color);
    let _ = writeln!(out, "{:.2} {:.2} {:.2} {:.2} re f", x, y, width, ROW_HEIGHT);
}

fn text(out: &mut String, font: &str, size: f64, x: f64, y: f64, value: &str) {
    let _ = writeln!(
        out,
        "BT /{} {} Tf {:.2} {:.2} Td ({}) Tj ET",
        font,
        size,
        x,
        y,
        escape_text(value)
    );
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    if max_chars <= 3 {
        return value.chars().take(max_chars).collect();
    }
    let mut cut: String = value.chars().take(max_chars - 3).collect();
    cut.push_str("...");
    cut
}

/// Escape a string for a PDF literal; WinAnsi covers Latin-1, everything else becomes '?'
pub(crate) fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            ' '..='~' => escaped.push(ch),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(escaped, "\\{:03o}", ch as u32);
            }
            c if c.is_whitespace() => escaped.push(' '),
            _ => escaped.push('?'),
        }
    }
    escaped
}

/// Lay out catalog, page tree, fonts and one page per content stream, then the xref table
fn assemble(contents: &[String]) -> Vec<u8> {
    const FIRST_PAGE_OBJ: usize = 5;

    let page_ids: Vec<usize> = (0..contents.len())
        .map(|i| FIRST_PAGE_OBJ + 2 * i)
        .collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, contents.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];
    for (content, page_id) in contents.iter().zip(&page_ids) {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
            PAGE_WIDTH,
            PAGE_HEIGHT,
            page_id + 1
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ));
    }

    let mut buf: Vec<u8> = Vec::new();
    buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(buf.len());
        buf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = buf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        let _ = writeln!(xref, "{:010} 00000 n ", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    );
    buf.extend_from_slice(xref.as_bytes());
    buf
}
