//! # Validation Module
//!
//! Integrity checks for columnar stripe files. The validator reads a file back
//! without any column decoders and checks that its layout is self-consistent.
//!
//! ## Validation Checklist
//!
//! 1. **Structure**: leading and trailing magic, minimum size
//! 2. **Footer**: the file footer parses and covers every column and stripe
//! 3. **Stripes**: stripes are contiguous and their footers match the stripe directory
//! 4. **Statistics**: file statistics are the merge of the stripe statistics
//! 5. **Row index**: every row index decodes, has one entry per row group and
//!    its entries add up to the stripe statistics
//!
//! ## Usage
//!
//! ```rust,no_run
//! use colstripe::validator::validate_file;
//! use std::path::Path;
//!
//! let result = validate_file(Path::new("data.cstr"));
//! match result {
//!     Ok(report) => {
//!         println!("{}", report);
//!     }
//!     Err(e) => {
//!         eprintln!("Validation failed: {}", e);
//!     }
//! }
//! ```

use std::path::Path;

use anyhow::Result;

pub use report::{CheckCategory, CheckStatus, ValidationCheck, ValidationReport};

mod index;
mod report;
mod statistics;
mod stripes;
mod structure;


/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The file cannot be read as a columnar stripe file at all
    #[error("Structure error: {0}")]
    StructureError(String),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Main validation entry point.
///
/// Returns `Err` only when the file cannot be read or framed at all; every
/// other problem is recorded as a failed check in the report.
pub fn validate_file(path: &Path) -> Result<ValidationReport> {
    let mut report = ValidationReport::new(path.display().to_string());

    // 1. Structure
    let bytes = structure::check_structure(path, &mut report)?;

    // 2. Footer
    let Some(footer) = structure::check_footer(&bytes, &mut report) else {
        return Ok(report);
    };

    // 3. Stripes
    let stripe_footers = stripes::check_stripes(&bytes, &footer, &mut report);

    // 4. Statistics
    statistics::check_statistics(&footer, &mut report);

    // 5. Row index
    index::check_row_indexes(&bytes, &footer, &stripe_footers, &mut report);

    Ok(report)
}
