use std::fmt;

/// Statistics from a completed write operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Number of rows written to the file
    pub rows_written: u64,
    /// Number of stripes written
    pub stripes_written: usize,
    /// Number of row-index entries created on the root column
    pub row_groups_written: usize,
    /// Total file size in bytes
    pub file_size_bytes: u64,
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} rows in {} stripes ({} row groups), {} bytes",
            self.rows_written, self.stripes_written, self.row_groups_written, self.file_size_bytes
        )
    }
}
