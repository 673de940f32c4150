use crate::schema::TypeKind;
use crate::statistics::{ColumnStatistics, TypedStatistics};
use crate::writer::FileFooter;

use super::{CheckCategory, ValidationCheck, ValidationReport};

const CATEGORY: CheckCategory = CheckCategory::Statistics;

/// Step 4: file statistics are the merge of the stripe statistics
pub(crate) fn check_statistics(footer: &FileFooter, report: &mut ValidationReport) {
    let mut mismatches = Vec::new();
    for file_stats in &footer.statistics {
        let column_id = file_stats.column_id;
        let mut merged = ColumnStatistics::new(
            footer
                .schema
                .find_column(column_id)
                .map(|ty| ty.kind())
                .unwrap_or(TypeKind::Struct),
        );
        let stripes = footer
            .stripe_statistics
            .iter()
            .filter_map(|stripe| stripe.iter().find(|s| s.column_id == column_id));
        for stripe_stats in stripes {
            if let Err(e) = merged.merge(&stripe_stats.to_statistics()) {
                mismatches.push(format!("column {}: {}", column_id, e));
            }
        }
        let mut expected = merged.summary(column_id);
        if merged.exact_sum().is_none() {
            // A stripe sum outside the i64 range cannot be added back up
            if let (
                TypedStatistics::Integer { sum, .. },
                TypedStatistics::Integer { sum: file_sum, .. },
            ) = (&mut expected.typed, &file_stats.typed)
            {
                *sum = *file_sum;
            }
        }
        if expected != *file_stats {
            mismatches.push(format!(
                "column {}: stripes sum to {} values ({} nulls), file says {} ({} nulls)",
                column_id,
                merged.count(),
                merged.null_count(),
                file_stats.count,
                file_stats.null_count
            ));
        }
    }

    if mismatches.is_empty() {
        report.add_check(ValidationCheck::ok(
            CATEGORY,
            "File statistics equal merged stripe statistics",
        ));
    } else {
        report.add_check(ValidationCheck::failed(
            CATEGORY,
            "File statistics equal merged stripe statistics",
            mismatches.join("; "),
        ));
    }

    let root_count = footer.statistics.first().map_or(0, |s| s.count);
    report.add_check(ValidationCheck::expect(
        CATEGORY,
        "Root column counts every row",
        root_count == footer.number_of_rows,
        || format!("root count {}, {} rows", root_count, footer.number_of_rows),
    ));
}
