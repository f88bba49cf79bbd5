use campaign_view::data::data_exporter::{DataExporter, ExportFormat};
use campaign_view::data::data_view::DataView;
use campaign_view::data::datatable::{CampaignStatus, DataRow};
use campaign_view::data::mock_data::{campaign_columns, MockDataGenerator};
use campaign_view::data::pdf_writer::PdfDocumentWriter;
use chrono::NaiveDate;
use tempfile::TempDir;

fn reference_view() -> DataView {
    DataView::new(
        "Campaign Performance",
        MockDataGenerator::default().campaigns(),
        campaign_columns(),
    )
}

#[test]
fn test_csv_export_of_filtered_sorted_view() {
    let temp_dir = TempDir::new().unwrap();
    let mut view = reference_view();
    view.set_status_filter("active");
    view.set_sort("roi");
    view.set_sort("roi");

    let path =
        DataExporter::export(&view.export_document(), ExportFormat::Csv, temp_dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "campaign-performance.csv");

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "Campaign Name,Status,Budget,Spent,ROI,Clicks,Conversions"
    );
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("Holiday Campaign 2024,active,\"$22,000\",18500,31.4%,"));
    assert!(lines[3].starts_with("Brand Awareness Q3,"));
}

#[test]
fn test_export_ignores_pagination() {
    let temp_dir = TempDir::new().unwrap();
    let rows: Vec<DataRow> = (0..25)
        .map(|i| {
            DataRow::new()
                .with("name", format!("Campaign {}", i))
                .with("status", CampaignStatus::Active)
                .with("budget", 1000 + i as i64)
        })
        .collect();
    let mut view = DataView::new("Campaign Performance", rows, campaign_columns());
    view.set_page(3);
    assert_eq!(view.get_view().rows.len(), 5);

    let document = view.export_document();
    assert_eq!(document.row_count(), 25);

    let path = DataExporter::export(&document, ExportFormat::Csv, temp_dir.path()).unwrap();
    let mut reader = csv::Reader::from_path(&path).unwrap();
    assert_eq!(reader.records().count(), 25);
}

#[test]
fn test_empty_result_exports_headers_only() {
    let temp_dir = TempDir::new().unwrap();
    let rows = vec![DataRow::new()
        .with("name", "Lonely")
        .with("status", CampaignStatus::Active)];
    let mut view = DataView::new("Campaign Performance", rows, campaign_columns());
    view.set_status_filter("stopped");

    let path =
        DataExporter::export(&view.export_document(), ExportFormat::Csv, temp_dir.path()).unwrap();
    let content = std::fs::read_to_string(path).unwrap();
    assert_eq!(content.lines().count(), 1);
}

#[test]
fn test_pdf_export_writes_document() {
    let temp_dir = TempDir::new().unwrap();
    let view = reference_view();
    let generated_at = NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .unwrap();
    let writer = PdfDocumentWriter::new().with_timestamp(generated_at);

    let path =
        DataExporter::export_with(&view.export_document(), &writer, temp_dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "campaign-performance.pdf");

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("(Campaign Performance)"));
    assert!(text.contains("(Generated on: 2024-06-01 09:00:00)"));
    assert!(text.contains("(Summer Sale 2024)"));
    assert!(text.trim_end().ends_with("%%EOF"));
}

#[test]
fn test_file_name_slugs_whitespace_runs() {
    let temp_dir = TempDir::new().unwrap();
    let view = DataView::new(
        "Q3  Daily\tMetrics",
        MockDataGenerator::default().campaigns(),
        campaign_columns(),
    );

    let path =
        DataExporter::export(&view.export_document(), ExportFormat::Pdf, temp_dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "q3-daily-metrics.pdf");
}

#[test]
fn test_export_creates_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("reports").join("2024");

    let path =
        DataExporter::export(&reference_view().export_document(), ExportFormat::Csv, &nested)
            .unwrap();
    assert!(path.starts_with(&nested));
    assert!(path.exists());
}
