use std::io::Cursor;

use bytes::Bytes;

use crate::stream::StreamKind;
use crate::writer::{read_stripe_footer, FileFooter, StreamInfo, StripeFooter, MAGIC};

use super::{CheckCategory, ValidationCheck, ValidationReport};

const CATEGORY: CheckCategory = CheckCategory::Stripes;

/// Step 3: stripes are contiguous and their footers describe their streams.
///
/// Returns the parsed stripe footers, `None` for the ones that did not parse.
pub(crate) fn check_stripes(
    bytes: &Bytes,
    footer: &FileFooter,
    report: &mut ValidationReport,
) -> Vec<Option<StripeFooter>> {
    let mut expected_offset = MAGIC.len() as u64;
    let mut contiguous = true;
    for (i, stripe) in footer.stripes.iter().enumerate() {
        if stripe.offset != expected_offset {
            report.add_check(ValidationCheck::failed(
                CATEGORY,
                format!("Stripe {} offset", i),
                format!("starts at {}, expected {}", stripe.offset, expected_offset),
            ));
            contiguous = false;
        }
        expected_offset = stripe.end();
    }
    if contiguous {
        report.add_check(ValidationCheck::ok(CATEGORY, "Stripes are contiguous"));
    }

    let footer_start = footer_start(bytes);
    report.add_check(ValidationCheck::expect(
        CATEGORY,
        "Last stripe ends at the file footer",
        expected_offset == footer_start,
        || format!("stripes end at {}, footer starts at {}", expected_offset, footer_start),
    ));

    let mut footers = Vec::with_capacity(footer.stripes.len());
    let mut failures = Vec::new();
    for (i, stripe) in footer.stripes.iter().enumerate() {
        if stripe.end() > footer_start {
            failures.push(format!("stripe {} runs past the file footer", i));
            footers.push(None);
            continue;
        }
        let stripe_footer = match read_stripe_footer(&mut Cursor::new(bytes.as_ref()), stripe) {
            Ok(stripe_footer) => stripe_footer,
            Err(e) => {
                failures.push(format!("stripe {} footer: {}", i, e));
                footers.push(None);
                continue;
            }
        };

        let index_streams = stripe_footer
            .streams
            .iter()
            .take_while(|s| s.kind == StreamKind::RowIndex)
            .count();
        let index_length = total_length(&stripe_footer.streams[..index_streams]);
        let data_length = total_length(&stripe_footer.streams[index_streams..]);
        if index_length != stripe.index_length || data_length != stripe.data_length {
            failures.push(format!(
                "stripe {} streams hold {}+{} bytes, directory says {}+{}",
                i, index_length, data_length, stripe.index_length, stripe.data_length
            ));
        }
        if stripe_footer.streams[index_streams..]
            .iter()
            .any(|s| s.kind == StreamKind::RowIndex)
        {
            failures.push(format!("stripe {} has row-index streams in its data section", i));
        }
        let columns = footer.schema.column_count();
        if stripe_footer.encodings.len() != columns {
            failures.push(format!(
                "stripe {} has {} encodings for {} columns",
                i,
                stripe_footer.encodings.len(),
                columns
            ));
        }
        footers.push(Some(stripe_footer));
    }

    if failures.is_empty() {
        report.add_check(ValidationCheck::ok(CATEGORY, "Stripe footers match the directory"));
    } else {
        report.add_check(ValidationCheck::failed(
            CATEGORY,
            "Stripe footers match the directory",
            failures.join("; "),
        ));
    }
    footers
}

fn total_length(streams: &[StreamInfo]) -> u64 {
    streams.iter().fold(0, |acc, s| acc.saturating_add(s.length))
}

/// Offset where the JSON file footer starts
fn footer_start(bytes: &Bytes) -> u64 {
    let tail = bytes.len() - MAGIC.len() - 8;
    let mut length = [0u8; 8];
    length.copy_from_slice(&bytes[tail..tail + 8]);
    (tail as u64).saturating_sub(u64::from_le_bytes(length))
}
