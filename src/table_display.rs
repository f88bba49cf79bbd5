use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use crossterm::style::Stylize;

use crate::data::data_analyzer::MetricsSummary;
use crate::data::data_view::{DataView, PageView, SortDirection, StatusFilter};
use crate::data::datatable::ColumnFormat;

/// Build the table for one page of a view
pub fn build_table(view: &DataView, page: &PageView) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let state = view.state();
    let headers: Vec<Cell> = view
        .columns()
        .iter()
        .map(|column| {
            let marker = match (&state.sort_field, state.sort_direction) {
                (Some(field), SortDirection::Ascending) if *field == column.key => " ↑",
                (Some(field), SortDirection::Descending) if *field == column.key => " ↓",
                _ => "",
            };
            Cell::new(format!("{}{}", column.label, marker)).add_attribute(Attribute::Bold)
        })
        .collect();
    table.set_header(headers);

    for row in &page.rows {
        let cells: Vec<Cell> = view
            .columns()
            .iter()
            .map(|column| {
                let cell = Cell::new(column.render(row));
                match column.format {
                    ColumnFormat::Numeric | ColumnFormat::Currency | ColumnFormat::Percentage => {
                        cell.set_alignment(CellAlignment::Right)
                    }
                    _ => cell,
                }
            })
            .collect();
        table.add_row(cells);
    }

    table
}

/// Footer line: result range, page position and active filter
pub fn footer(view: &DataView, page: &PageView) -> String {
    let mut parts = vec![page.range_label()];
    if page.total_pages > 0 {
        parts.push(format!("page {} of {}", page.current_page, page.total_pages));
    }
    if let StatusFilter::Only(status) = view.state().status_filter {
        parts.push(format!("status: {}", status));
    }
    parts.join(" | ")
}

/// One-row table of KPI cards
pub fn build_summary_table(summary: &MetricsSummary) -> Table {
    let cards = summary.cards();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        cards
            .iter()
            .map(|(label, _)| Cell::new(label).add_attribute(Attribute::Bold)),
    );
    table.add_row(
        cards
            .iter()
            .map(|(_, value)| Cell::new(value).set_alignment(CellAlignment::Right)),
    );
    table
}

pub fn display_summary(summary: &MetricsSummary, use_color: bool) {
    let heading = format!("Last {} days", summary.days);
    if use_color {
        println!("{}", heading.bold());
    } else {
        println!("{}", heading);
    }
    println!("{}\n", build_summary_table(summary));
}

pub fn display_page(view: &DataView, page: &PageView, use_color: bool) {
    println!("{}", view.title());

    if page.rows.is_empty() {
        let message = if page.total_filtered == 0 {
            "No results found.".to_string()
        } else {
            format!(
                "Page {} is out of range ({} pages).",
                page.current_page, page.total_pages
            )
        };
        if use_color {
            println!("{}", message.yellow());
        } else {
            println!("{}", message);
        }
    } else {
        println!("{}", build_table(view, page));
    }

    let footer = footer(view, page);
    if use_color {
        println!("\n{}", footer.green());
    } else {
        println!("\n{}", footer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datatable::DataRow;
    use crate::data::mock_data::{campaign_columns, MockDataGenerator};

    fn view() -> DataView {
        DataView::new(
            "Campaign Performance",
            MockDataGenerator::default().campaigns(),
            campaign_columns(),
        )
    }

    #[test]
    fn test_table_renders_formatted_cells() {
        let mut view = view();
        view.set_sort("roi");
        let page = view.get_view();
        let mut table = build_table(&view, &page);
        // Keep cells on one line regardless of the terminal running the tests
        table.set_width(240);
        let rendered = table.to_string();

        assert!(rendered.contains("ROI ↑"));
        assert!(rendered.contains("Summer Sale 2024"));
        assert!(rendered.contains("$15,000"));
        assert!(rendered.contains("+24.5%"));
        assert!(rendered.contains("[stopped]"));
    }

    #[test]
    fn test_summary_table() {
        let rows = vec![
            DataRow::new()
                .with("revenue", 40_000i64)
                .with("users", 1000i64)
                .with("conversions", 20i64)
                .with("growth", 2.0),
            DataRow::new()
                .with("revenue", 50_000i64)
                .with("users", 1100i64)
                .with("conversions", 25i64)
                .with("growth", 4.0),
        ];
        let mut table = build_summary_table(&MetricsSummary::from_rows(&rows));
        table.set_width(240);
        let rendered = table.to_string();

        assert!(rendered.contains("Total Revenue"));
        assert!(rendered.contains("$90,000"));
        assert!(rendered.contains("2,100"));
        assert!(rendered.contains("+3.0%"));
        assert!(rendered.contains("+25.0%"));
    }

    #[test]
    fn test_footer() {
        let mut view = view();
        view.set_status_filter("active");
        let page = view.get_view();
        assert_eq!(
            footer(&view, &page),
            "Showing 1 to 3 of 3 results | page 1 of 1 | status: active"
        );
    }
}
