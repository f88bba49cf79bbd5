pub mod config;
pub mod data;
pub mod live_feed;
pub mod logging;
pub mod table_display;
pub mod utils;
