//! # colstripe - A Columnar Stripe Writer
//!
//! `colstripe` encodes typed Arrow column batches into compressed, stripe-organized
//! byte streams. Every column keeps three tiers of rolling statistics (row group,
//! stripe and file) and a positional row index that lets a reader seek straight to
//! the first value of any row group inside a stripe.
//!
//! ## Key Features
//!
//! - **Schema-driven writer tree**: one column writer per schema node, built by
//!   [`column::build_writer`] in pre-order, with nested struct/list/map support.
//!
//! - **Run-length encodings**: byte, boolean and integer RLE plus dictionary or
//!   direct string encoding chosen per stripe.
//!
//! - **Chunked compression**: Zlib or ZSTD compressed streams, framed so that a
//!   recorded position can address any value inside a compressed chunk.
//!
//! - **Three-tier statistics**: row-group statistics fold into stripe statistics,
//!   stripe statistics fold into file statistics, all through one associative merge.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use arrow::array::{Int64Array, StringArray};
//! use arrow::datatypes::{DataType, Field, Schema};
//! use arrow::record_batch::RecordBatch;
//! use colstripe::writer::{ColumnarFileWriter, WriterConfig};
//!
//! let schema = Arc::new(Schema::new(vec![
//!     Field::new("id", DataType::Int64, false),
//!     Field::new("name", DataType::Utf8, true),
//! ]));
//!
//! let batch = RecordBatch::try_new(
//!     schema.clone(),
//!     vec![
//!         Arc::new(Int64Array::from(vec![1, 2, 3])),
//!         Arc::new(StringArray::from(vec![Some("a"), None, Some("c")])),
//!     ],
//! )?;
//!
//! let mut writer = ColumnarFileWriter::new_file("data.cstr", schema, WriterConfig::default())?;
//! writer.write_batch(&batch)?;
//! let stats = writer.finish()?;
//! println!("{}", stats);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`schema`]: logical types and column id assignment
//! - [`statistics`]: mergeable per-column statistics
//! - [`stream`]: stream kinds, buffered compressed output streams and the stream factory
//! - [`encoding`]: run-length encoders and the position recorder capability
//! - [`column`]: the column writer tree and its row-group/stripe protocol
//! - [`writer`]: the stripe/file driver, configuration and errors
//! - [`validator`]: integrity checks for written files

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod column;
pub mod encoding;
pub mod schema;
pub mod statistics;
pub mod stream;
pub mod validator;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::column::{
        build_writer, ColumnEncoding, ColumnEncodingKind, ColumnWriter, RowIndex, RowIndexEntry,
        StripePhase,
    };
    pub use crate::schema::{TypeDescription, TypeKind};
    pub use crate::statistics::{ColumnStatistics, ColumnStatisticsSummary, TypedStatistics};
    pub use crate::stream::{MemoryStreamsFactory, StreamData, StreamKind, StreamsFactory};
    pub use crate::validator::{validate_file, ValidationReport};
    pub use crate::writer::{
        ColumnarFileWriter, CompressionType, FileFooter, WriterConfig, WriterError, WriterStats,
    };
}
