//! CLI library for testing purposes

pub mod path_glob;
pub mod paths;
pub mod report;
pub mod watch;

pub use path_glob::{WorkbookMatcher, collect_workbooks, expand_export_input};
pub use report::RunReport;
