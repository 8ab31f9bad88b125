use thiserror::Error;

/// Errors produced by the data layer.
///
/// Nothing here is retried.  A [`EngineError::Parse`] is surfaced to the user
/// as a status message; an unsupported extension is rejected before any bytes
/// are read.  An empty filter result is deliberately *not* an error: the chart
/// degrades to an empty plot.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unsupported file type: .{extension} (expected .csv, .xls or .xlsx)")]
    UnsupportedFileType { extension: String },

    #[error("column '{column}': {failed} value(s) could not be parsed as date/time (first: '{sample}')")]
    Parse {
        column: String,
        failed: usize,
        sample: String,
    },

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
