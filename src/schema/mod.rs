//! # Logical Type Definitions
//!
//! This module defines the logical schema a column writer tree is built from.
//!
//! ## Column Ids
//!
//! Every node of a [`TypeDescription`] carries a column id. Ids are assigned in
//! pre-order starting at 0 for the root, so a struct's id is always smaller than
//! the ids of its children and a subtree occupies a contiguous id range:
//!
//! ```text
//! struct<id:bigint,tags:array<string>>
//!   0: struct
//!   1: bigint        (id)
//!   2: array         (tags)
//!   3: string        (tags element)
//! ```
//!
//! ## Supported Types
//!
//! | Kind | Arrow type | Streams |
//! |------|------------|---------|
//! | boolean | Boolean | PRESENT, DATA |
//! | tinyint | Int8 | PRESENT, DATA |
//! | smallint/int/bigint | Int16/Int32/Int64 | PRESENT, DATA |
//! | date | Date32 | PRESENT, DATA |
//! | float/double | Float32/Float64 | PRESENT, DATA |
//! | string | Utf8 | PRESENT, DATA, LENGTH, DICTIONARY_DATA |
//! | struct | Struct | PRESENT |
//! | array | List | PRESENT, LENGTH |
//! | map | Map | PRESENT, LENGTH |

mod builders;
mod types;


pub use builders::validate_arrow_type;
pub use types::{TypeDescription, TypeKind};
