use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::info;

use crate::data::datatable::{group_thousands, DataValue};
use crate::data::pdf_writer::PdfDocumentWriter;

/// Flattened, fully formatted table ready for a file writer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportDocument {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// File name for this document in the given format, e.g. `campaign-performance.csv`
    pub fn file_name(&self, format: ExportFormat) -> String {
        format!("{}.{}", slugify_title(&self.title), format.extension())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unknown export format '{0}' (expected csv or pdf)")]
    UnknownFormat(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV writer error: {0}")]
    Csv(#[from] csv::Error),

    #[error("output error: {0}")]
    Write(#[from] std::io::Error),
}

/// Serializes an export document into one file format
pub trait DocumentWriter {
    fn format(&self) -> ExportFormat;

    fn write_document(&self, doc: &ExportDocument, out: &mut dyn Write)
        -> Result<(), ExportError>;
}

/// Header row first, then one record per row; fields are quoted only when needed
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvDocumentWriter;

impl DocumentWriter for CsvDocumentWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn write_document(
        &self,
        doc: &ExportDocument,
        out: &mut dyn Write,
    ) -> Result<(), ExportError> {
        let mut wtr = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(out);

        wtr.write_record(&doc.headers)?;
        for row in &doc.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Lowercase the title and collapse each whitespace run into one hyphen.
///
/// Path separators become hyphens as well, so the slug is always a plain file stem
/// inside the output directory.
pub fn slugify_title(title: &str) -> String {
    static WHITESPACE: OnceLock<regex::Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| {
        regex::Regex::new(r"\s+").unwrap_or_else(|e| unreachable!("static pattern: {e}"))
    });
    re.replace_all(&title.to_lowercase(), "-")
        .replace(['/', '\\'], "-")
}

/// Export rendering of a single cell.
///
/// Numbers in columns whose key mentions "roi" get a percent suffix, and numbers in
/// columns whose key mentions "budget" are rendered as grouped dollars.
pub fn export_cell(key: &str, value: &DataValue) -> String {
    match value.as_f64() {
        Some(_) if key.contains("roi") => format!("{}%", value),
        Some(n) if key.contains("budget") => format!("${}", group_thousands(n)),
        _ => value.to_string(),
    }
}

/// Picks a writer for a format and writes documents to disk
pub struct DataExporter;

impl DataExporter {
    pub fn writer_for(format: ExportFormat) -> Box<dyn DocumentWriter> {
        match format {
            ExportFormat::Csv => Box::new(CsvDocumentWriter),
            ExportFormat::Pdf => Box::new(PdfDocumentWriter::new()),
        }
    }

    /// Write `doc` as `<out_dir>/<slug>.<ext>` and return the path
    pub fn export(
        doc: &ExportDocument,
        format: ExportFormat,
        out_dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        let writer = Self::writer_for(format);
        Self::export_with(doc, writer.as_ref(), out_dir)
    }

    /// Same as `export` with an explicit writer
    pub fn export_with(
        doc: &ExportDocument,
        writer: &dyn DocumentWriter,
        out_dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        let path = out_dir.join(doc.file_name(writer.format()));
        let io_err = |source| ExportError::Io {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(out_dir).map_err(io_err)?;
        let file = File::create(&path).map_err(io_err)?;
        let mut out = BufWriter::new(file);
        writer.write_document(doc, &mut out)?;
        out.flush().map_err(io_err)?;

        info!(
            target: "export",
            "Exported {} rows to {} file: {}",
            doc.row_count(),
            writer.format(),
            path.display()
        );
        Ok(path)
    }
}
