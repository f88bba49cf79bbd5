use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::data::data_exporter::{export_cell, ExportDocument};
use crate::data::datatable::{CampaignStatus, DataColumn, DataRow};
use crate::data::datavalue_compare::compare_directed;

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Which rows survive the status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CampaignStatus),
}

impl StatusFilter {
    /// Lenient parse: anything that is not a status literal means "all"
    pub fn parse_lenient(value: &str) -> Self {
        value
            .parse::<CampaignStatus>()
            .map(StatusFilter::Only)
            .unwrap_or(StatusFilter::All)
    }

    pub fn matches(&self, row: &DataRow) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => row.status() == Some(*status),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

/// Sort order for the sort column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Ascending)
    }
}

/// Mutable view state, owned by a single `DataView`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub status_filter: StatusFilter,
    pub sort_field: Option<String>,
    pub sort_direction: SortDirection,
    /// 1-based
    pub current_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            status_filter: StatusFilter::All,
            sort_field: None,
            sort_direction: SortDirection::Ascending,
            current_page: 1,
        }
    }
}

/// Read-only projection of the rows for the current state
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub rows: Vec<DataRow>,
    pub total_filtered: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
}

impl PageView {
    /// 1-based index of the first row on this page, clamped to the filtered count
    pub fn first_item(&self) -> usize {
        let start = self
            .current_page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .saturating_add(1);
        start.min(self.total_filtered)
    }

    /// 1-based index of the last row on this page, clamped to the filtered count
    pub fn last_item(&self) -> usize {
        self.current_page
            .saturating_mul(self.page_size)
            .min(self.total_filtered)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Footer text, e.g. "Showing 11 to 20 of 25 results"
    pub fn range_label(&self) -> String {
        format!(
            "Showing {} to {} of {} results",
            self.first_item(),
            self.last_item(),
            self.total_filtered
        )
    }
}

/// Filter/sort/paginate engine over an in-memory row set.
///
/// Derivations never touch `rows`; every read recomputes from the stored state and the
/// latest row set, so the view always reflects the most recent `set_rows`.
#[derive(Debug, Clone)]
pub struct DataView {
    title: String,
    rows: Vec<DataRow>,
    columns: Vec<DataColumn>,
    page_size: usize,
    state: ViewState,
}

impl DataView {
    pub fn new(title: impl Into<String>, rows: Vec<DataRow>, columns: Vec<DataColumn>) -> Self {
        Self {
            title: title.into(),
            rows,
            columns,
            page_size: DEFAULT_PAGE_SIZE,
            state: ViewState::default(),
        }
    }

    /// Zero is coerced to one
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> &[DataColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn column(&self, key: &str) -> Option<&DataColumn> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Replace the row set; view state is kept as is
    pub fn set_rows(&mut self, rows: Vec<DataRow>) {
        debug!(target: "view", "Row set replaced ({} -> {} rows)", self.rows.len(), rows.len());
        self.rows = rows;
    }

    /// Set the status filter from a raw value. Unknown values fall back to "all".
    pub fn set_status_filter(&mut self, value: &str) {
        let filter = StatusFilter::parse_lenient(value);
        if filter == StatusFilter::All && value != "all" {
            debug!(target: "view", "Unknown status filter '{}', showing all rows", value);
        }
        self.state.status_filter = filter;
        self.state.current_page = 1;
    }

    /// Sort by `field`; repeating the current field flips direction.
    /// Ignored when the column is unknown or not sortable.
    pub fn set_sort(&mut self, field: &str) {
        match self.column(field) {
            Some(column) if column.sortable => {}
            Some(_) => {
                debug!(target: "view", "Column '{}' is not sortable, ignoring", field);
                return;
            }
            None => {
                debug!(target: "view", "No column '{}', ignoring sort", field);
                return;
            }
        }

        if self.state.sort_field.as_deref() == Some(field) {
            self.state.sort_direction = self.state.sort_direction.toggled();
        } else {
            self.state.sort_field = Some(field.to_string());
            self.state.sort_direction = SortDirection::Ascending;
        }
        self.state.current_page = 1;

        debug!(
            target: "view",
            "Sort set to {} {:?}",
            field,
            self.state.sort_direction
        );
    }

    /// Caller owns bounds checking; out-of-range pages produce an empty slice
    pub fn set_page(&mut self, page: usize) {
        self.state.current_page = page;
    }

    /// Rows after filter and sort, before pagination
    pub fn filtered_sorted_rows(&self) -> Vec<&DataRow> {
        let filter = self.state.status_filter;
        let mut rows: Vec<&DataRow> = self.rows.iter().filter(|r| filter.matches(r)).collect();

        if let Some(field) = &self.state.sort_field {
            let ascending = self.state.sort_direction.is_ascending();
            match self.column(field) {
                Some(column) => {
                    // slice::sort_by is stable
                    rows.sort_by(|a, b| {
                        compare_directed(column.value_of(a), column.value_of(b), ascending)
                    });
                }
                None => {
                    debug!(target: "view", "Sort column '{}' vanished, leaving order", field);
                }
            }
        }

        rows
    }

    /// Derive the current page
    pub fn get_view(&self) -> PageView {
        let filtered = self.filtered_sorted_rows();
        let total_filtered = filtered.len();
        let total_pages = total_filtered.div_ceil(self.page_size);
        let current_page = self.state.current_page;

        let rows = if current_page == 0 {
            Vec::new()
        } else {
            let start = (current_page - 1).saturating_mul(self.page_size);
            filtered
                .into_iter()
                .skip(start)
                .take(self.page_size)
                .cloned()
                .collect()
        };

        PageView {
            rows,
            total_filtered,
            total_pages,
            current_page,
            page_size: self.page_size,
        }
    }

    /// Flatten the full filtered/sorted set (pagination ignored) for export
    pub fn export_document(&self) -> ExportDocument {
        let headers = self.columns.iter().map(|c| c.label.clone()).collect();
        let rows = self
            .filtered_sorted_rows()
            .into_iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| export_cell(&column.key, column.value_of(row)))
                    .collect()
            })
            .collect();

        ExportDocument {
            title: self.title.clone(),
            headers,
            rows,
        }
    }
}
