use bytes::Bytes;

use crate::column::RowIndex;
use crate::stream::{decompress_stream, StreamKind};
use crate::writer::{FileFooter, StripeFooter};

use super::{CheckCategory, ValidationCheck, ValidationReport};

const CATEGORY: CheckCategory = CheckCategory::RowIndex;

/// Step 5: every row index decodes, has one entry per row group and its entry
/// statistics add up to the stripe statistics.
pub(crate) fn check_row_indexes(
    bytes: &Bytes,
    footer: &FileFooter,
    stripe_footers: &[Option<StripeFooter>],
    report: &mut ValidationReport,
) {
    if footer.row_index_stride == 0 {
        report.add_check(ValidationCheck::ok(CATEGORY, "Row index disabled"));
        return;
    }

    let stride = footer.row_index_stride as u64;
    let mut failures = Vec::new();
    let mut indexes = 0usize;
    for (i, (stripe, stripe_footer)) in footer.stripes.iter().zip(stripe_footers).enumerate() {
        let Some(stripe_footer) = stripe_footer else {
            continue;
        };
        let expected_entries = ((stripe.number_of_rows + stride - 1) / stride) as usize;
        for (info, offset) in stripe_footer.stream_offsets(stripe.offset) {
            if info.kind != StreamKind::RowIndex {
                continue;
            }
            let Some(raw) = bytes.get(offset as usize..offset.saturating_add(info.length) as usize) else {
                failures.push(format!(
                    "stripe {} column {}: row index stream out of bounds",
                    i, info.column_id
                ));
                continue;
            };
            let index: RowIndex = match decompress_stream(raw, footer.compression)
                .map_err(|e| e.to_string())
                .and_then(|json| serde_json::from_slice(&json).map_err(|e| e.to_string()))
            {
                Ok(index) => index,
                Err(e) => {
                    failures.push(format!("stripe {} column {}: {}", i, info.column_id, e));
                    continue;
                }
            };
            indexes += 1;

            if index.column_id != info.column_id {
                failures.push(format!(
                    "stripe {}: stream of column {} holds the index of column {}",
                    i, info.column_id, index.column_id
                ));
            }
            if index.entries.len() != expected_entries {
                failures.push(format!(
                    "stripe {} column {}: {} entries for {} rows",
                    i,
                    info.column_id,
                    index.entries.len(),
                    stripe.number_of_rows
                ));
            }
            let entry_count: u64 = index.entries.iter().map(|e| e.statistics.count).sum();
            let stripe_count = footer
                .stripe_statistics
                .get(i)
                .and_then(|stats| stats.iter().find(|s| s.column_id == info.column_id))
                .map(|s| s.count);
            if stripe_count != Some(entry_count) {
                failures.push(format!(
                    "stripe {} column {}: entries count {} values, stripe statistics {:?}",
                    i, info.column_id, entry_count, stripe_count
                ));
            }
        }
    }

    if failures.is_empty() {
        report.add_check(ValidationCheck::ok(
            CATEGORY,
            format!("{} row indexes decode and match their stripes", indexes),
        ));
    } else {
        report.add_check(ValidationCheck::failed(
            CATEGORY,
            "Row indexes decode and match their stripes",
            failures.join("; "),
        ));
    }
}
