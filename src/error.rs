use std::path::PathBuf;

/// Non-fatal conditions that degrade one part of the dashboard.
///
/// Each is rendered as a message where the affected output would have been;
/// anything else (malformed CSV, I/O) travels as an `anyhow::Error`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    #[error("Data file not found: {}. Please place CSV file in data folder.", .path.display())]
    MissingFile { path: PathBuf },

    #[error("Missing '{column}' data for {view}")]
    MissingColumn { view: &'static str, column: String },
}
