use crate::schema::TypeKind;
use crate::statistics::MergeMismatch;
use crate::stream::StreamKind;

/// Errors that can occur during writing
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the Arrow library during array operations
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Error serializing/deserializing JSON metadata
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// The schema contains a type no column writer can encode
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// A stream kind was requested for a column type that never produces it
    #[error("Column {column_id}: stream {kind} is not supported for {type_kind} columns")]
    UnsupportedStream {
        /// Column that requested the stream
        column_id: u32,
        /// Type of that column
        type_kind: TypeKind,
        /// Requested stream kind
        kind: StreamKind,
    },

    /// The same (column, stream kind) pair was requested twice
    #[error("Column {column_id}: stream {kind} was already created")]
    DuplicateStream {
        /// Column that requested the stream
        column_id: u32,
        /// Requested stream kind
        kind: StreamKind,
    },

    /// Compressing or emitting a stream chunk failed
    #[error("Column {column_id}: {kind} stream failed: {source}")]
    StreamError {
        /// Column owning the stream
        column_id: u32,
        /// Kind of the failing stream
        kind: StreamKind,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// The batch handed to `add` does not match the column's logical type
    #[error("Column {column_id}: expected a {expected} batch, got {actual}")]
    BatchTypeMismatch {
        /// Column receiving the batch
        column_id: u32,
        /// Logical type of the column
        expected: TypeKind,
        /// Arrow data type of the batch
        actual: String,
    },

    /// `offset + num_values` runs past the end of the batch
    #[error("Column {column_id}: range {offset}..{offset}+{num_values} exceeds batch length {len}")]
    OutOfRange {
        /// Column receiving the batch
        column_id: u32,
        /// Requested start offset
        offset: usize,
        /// Requested number of values
        num_values: usize,
        /// Actual batch length
        len: usize,
    },

    /// An operation was called out of order or would corrupt writer state
    #[error("Column {column_id}: {message}")]
    ContractViolation {
        /// Column where the violation was detected
        column_id: u32,
        /// What went wrong
        message: String,
    },

    /// Two statistics trackers of different kinds were merged
    #[error("Column {column_id}: {source}")]
    StatisticsMismatch {
        /// Column owning the trackers
        column_id: u32,
        /// Kinds of the two trackers
        #[source]
        source: MergeMismatch,
    },

    /// Invalid writer configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid data provided to the writer
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The file is not a valid columnar stripe file
    #[error("Invalid file: {0}")]
    InvalidFile(String),
}

impl WriterError {
    pub(crate) fn statistics(column_id: u32) -> impl FnOnce(MergeMismatch) -> Self {
        move |source| Self::StatisticsMismatch { column_id, source }
    }

    pub(crate) fn contract(column_id: u32, message: impl Into<String>) -> Self {
        Self::ContractViolation {
            column_id,
            message: message.into(),
        }
    }
}
