//! Data layer: rows and column descriptors, the filter/sort/paginate view
//! engine, loaders, mock data and export writers.

// Core data modules
pub mod data_view;
pub mod datatable;
pub mod datavalue_compare;

// Aggregates
pub mod data_analyzer;

// Sources
pub mod datatable_loaders;
pub mod mock_data;

// Export
pub mod data_exporter;
pub mod pdf_writer;
