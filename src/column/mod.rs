//! # Column Writers
//!
//! One [`ColumnWriter`] per schema node, built by [`build_writer`] in pre-order.
//! Each writer owns its streams, a not-null encoder when the column is nullable,
//! three statistics tiers and the row index of the current stripe.
//!
//! ## Stripe Protocol
//!
//! ```text
//! add* / create_row_index_entry*      (Writing)
//! flush                               -> Flushed
//! write_index
//! get_column_encoding, get_stripe_statistics
//! merge_stripe_stats_into_file_stats  -> Merged
//! reset                               -> Writing
//! ```
//!
//! `create_row_index_entry` folds the row-group statistics into the stripe
//! statistics, snapshots them into a new [`RowIndexEntry`] together with the
//! positions recorded when the row group started, recurses into the children and
//! then records the positions the next row group starts at. `flush` refuses
//! to run while the last row group still holds values.
//!
//! ## Writers
//!
//! | Kind | Writer | Value streams |
//! |------|--------|---------------|
//! | boolean | [`BooleanColumnWriter`] | DATA (bit packed) |
//! | tinyint | [`ByteColumnWriter`] | DATA (byte RLE) |
//! | smallint/int/bigint/date | [`IntegerColumnWriter`] | DATA (signed int RLE) |
//! | float/double | [`DoubleColumnWriter`] | DATA (IEEE-754 LE) |
//! | string | [`StringColumnWriter`] | DATA, LENGTH, DICTIONARY_DATA |
//! | struct | [`StructColumnWriter`] | none |
//! | array | [`ListColumnWriter`] | LENGTH |
//! | map | [`MapColumnWriter`] | LENGTH |

mod base;
mod boolean;
mod byte;
mod double;
mod factory;
mod integer;
mod list;
mod map;
mod protocol;
mod string;
mod struct_writer;
mod types;


pub use base::{ColumnWriterBase, StripePhase};
pub use boolean::BooleanColumnWriter;
pub use byte::ByteColumnWriter;
pub use double::DoubleColumnWriter;
pub use factory::build_writer;
pub use integer::IntegerColumnWriter;
pub use list::ListColumnWriter;
pub use map::MapColumnWriter;
pub use protocol::ColumnWriter;
pub use string::StringColumnWriter;
pub use struct_writer::StructColumnWriter;
pub use types::{ColumnEncoding, ColumnEncodingKind, RowIndex, RowIndexEntry};
