use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;

use crate::writer::{read_file_footer, FileFooter, FORMAT_VERSION, MAGIC};

use super::{CheckCategory, ValidationCheck, ValidationError, ValidationReport};

const CATEGORY: CheckCategory = CheckCategory::Structure;

/// Step 1: the file exists and is framed by the magic bytes
pub(crate) fn check_structure(path: &Path, report: &mut ValidationReport) -> Result<Bytes> {
    if !path.is_file() {
        report.add_check(ValidationCheck::failed(
            CATEGORY,
            "File exists",
            format!("Not a file: {}", path.display()),
        ));
        anyhow::bail!(ValidationError::StructureError(format!(
            "{} is not a file",
            path.display()
        )));
    }
    report.add_check(ValidationCheck::ok(CATEGORY, "File exists"));

    let bytes = Bytes::from(
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?,
    );

    let minimum = 2 * MAGIC.len() + 8;
    if bytes.len() < minimum {
        report.add_check(ValidationCheck::failed(
            CATEGORY,
            "Minimum size",
            format!("{} bytes, need at least {}", bytes.len(), minimum),
        ));
        anyhow::bail!(ValidationError::StructureError("File too short".to_string()));
    }
    report.add_check(ValidationCheck::ok(CATEGORY, "Minimum size"));

    report.add_check(ValidationCheck::expect(
        CATEGORY,
        "Leading magic",
        &bytes[..MAGIC.len()] == MAGIC,
        || format!("Expected {:?}", String::from_utf8_lossy(MAGIC)),
    ));
    report.add_check(ValidationCheck::expect(
        CATEGORY,
        "Trailing magic",
        &bytes[bytes.len() - MAGIC.len()..] == MAGIC,
        || format!("Expected {:?}", String::from_utf8_lossy(MAGIC)),
    ));

    Ok(bytes)
}

/// Step 2: the file footer parses and agrees with itself
pub(crate) fn check_footer(bytes: &Bytes, report: &mut ValidationReport) -> Option<FileFooter> {
    const CATEGORY: CheckCategory = CheckCategory::Footer;

    let footer = match read_file_footer(&mut Cursor::new(bytes.as_ref())) {
        Ok(footer) => footer,
        Err(e) => {
            report.add_check(ValidationCheck::failed(
                CATEGORY,
                "File footer parses",
                e.to_string(),
            ));
            return None;
        }
    };
    report.add_check(ValidationCheck::ok(CATEGORY, "File footer parses"));

    if footer.format_version == FORMAT_VERSION {
        report.add_check(ValidationCheck::ok(CATEGORY, "Format version"));
    } else {
        report.add_check(ValidationCheck::warning(
            CATEGORY,
            "Format version",
            format!(
                "File uses version {}, this build writes {}",
                footer.format_version, FORMAT_VERSION
            ),
        ));
    }

    let columns = footer.schema.column_count();
    report.add_check(ValidationCheck::expect(
        CATEGORY,
        "File statistics cover every column",
        footer.statistics.len() == columns,
        || format!("{} statistics for {} columns", footer.statistics.len(), columns),
    ));
    report.add_check(ValidationCheck::expect(
        CATEGORY,
        "Stripe statistics per stripe",
        footer.stripe_statistics.len() == footer.stripes.len()
            && footer.stripe_statistics.iter().all(|s| s.len() == columns),
        || {
            format!(
                "{} statistics sets for {} stripes",
                footer.stripe_statistics.len(),
                footer.stripes.len()
            )
        },
    ));

    let stripe_rows: u64 = footer.stripes.iter().map(|s| s.number_of_rows).sum();
    report.add_check(ValidationCheck::expect(
        CATEGORY,
        "Row count matches stripes",
        stripe_rows == footer.number_of_rows,
        || format!("footer says {}, stripes hold {}", footer.number_of_rows, stripe_rows),
    ));

    if footer.stripes.is_empty() {
        report.add_check(ValidationCheck::warning(
            CATEGORY,
            "File has data",
            "File contains no stripes",
        ));
    }

    Some(footer)
}
