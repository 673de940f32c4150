use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::TypeKind;

/// Kind of a stream produced by a column writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreamKind {
    /// Not-null bits of a nullable column
    Present,
    /// Primary values
    Data,
    /// Lengths of strings, lists or maps
    Length,
    /// Sorted dictionary bytes of a dictionary-encoded string column
    DictionaryData,
    /// Serialized row index
    RowIndex,
}

impl StreamKind {
    /// Whether a column of `type_kind` may own a stream of this kind
    pub fn is_supported_for(&self, type_kind: TypeKind) -> bool {
        match self {
            StreamKind::Present | StreamKind::RowIndex => true,
            StreamKind::Data => !matches!(
                type_kind,
                TypeKind::Struct | TypeKind::List | TypeKind::Map
            ),
            StreamKind::Length => matches!(
                type_kind,
                TypeKind::String | TypeKind::List | TypeKind::Map
            ),
            StreamKind::DictionaryData => type_kind == TypeKind::String,
        }
    }

    /// True for streams that belong in the index section of a stripe
    pub fn is_index(&self) -> bool {
        matches!(self, StreamKind::RowIndex)
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamKind::Present => "PRESENT",
            StreamKind::Data => "DATA",
            StreamKind::Length => "LENGTH",
            StreamKind::DictionaryData => "DICTIONARY_DATA",
            StreamKind::RowIndex => "ROW_INDEX",
        };
        f.write_str(name)
    }
}
