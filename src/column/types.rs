use std::fmt;

use serde::{Deserialize, Serialize};

use crate::statistics::ColumnStatisticsSummary;

/// Encoding chosen for a column in one stripe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnEncodingKind {
    /// Values written as-is (or run-length encoded)
    Direct,
    /// Values replaced by ids into a sorted dictionary of `size` entries
    Dictionary {
        /// Number of dictionary entries
        size: u32,
    },
}

impl fmt::Display for ColumnEncodingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnEncodingKind::Direct => write!(f, "DIRECT"),
            ColumnEncodingKind::Dictionary { size } => write!(f, "DICTIONARY[{}]", size),
        }
    }
}

/// Encoding descriptor reported by `get_column_encoding`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnEncoding {
    /// Column described
    pub column_id: u32,
    /// Chosen encoding
    #[serde(flatten)]
    pub kind: ColumnEncodingKind,
}

/// One closed row group: where its values start and what they contained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowIndexEntry {
    /// Stream positions at the first value of the row group, present stream
    /// first, then the column's value streams in order
    pub positions: Vec<u64>,
    /// Statistics of the values in the row group
    pub statistics: ColumnStatisticsSummary,
}

/// Row index of one column for one stripe, as serialized into its ROW_INDEX stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowIndex {
    /// Column described
    pub column_id: u32,
    /// Entries in row-group order
    pub entries: Vec<RowIndexEntry>,
}
