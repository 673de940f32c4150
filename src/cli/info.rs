use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use colstripe::statistics::TypedStatistics;
use colstripe::writer::read_file_footer;

/// Display the footer of a columnar stripe file
pub fn run(file: PathBuf, list_stripes: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let mut reader = BufReader::new(File::open(&file).context("Failed to open file")?);
    let footer = read_file_footer(&mut reader).context("Failed to read file footer")?;

    println!("colstripe File Information");
    println!("==========================");
    println!("File: {}", file.display());
    println!();

    println!("File Statistics:");
    println!("  Format version: {}", footer.format_version);
    println!("  Compression: {:?}", footer.compression);
    println!("  Compression block size: {}", footer.compression_block_size);
    if footer.row_index_stride > 0 {
        println!("  Row index stride: {}", footer.row_index_stride);
    } else {
        println!("  Row index: disabled");
    }
    println!("  Stripes: {}", footer.stripes.len());
    println!("  Total rows: {}", footer.number_of_rows);
    println!();

    if list_stripes {
        println!("Stripes:");
        for (i, stripe) in footer.stripes.iter().enumerate() {
            println!(
                "  {:4}. offset {:>10}  rows {:>8}  index {:>8}  data {:>10}  footer {:>6}",
                i,
                stripe.offset,
                stripe.number_of_rows,
                stripe.index_length,
                stripe.data_length,
                stripe.footer_length
            );
        }
        println!();
    }

    println!("Schema: {}", footer.schema);
    println!();

    println!("Columns:");
    for stats in &footer.statistics {
        let kind = footer
            .schema
            .find_column(stats.column_id)
            .map(|ty| ty.kind().to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "  {:3}. {:<9} count {:>10}  nulls {:>10}  {}",
            stats.column_id,
            kind,
            stats.count,
            stats.null_count,
            describe(&stats.typed)
        );
    }

    Ok(())
}

fn describe(typed: &TypedStatistics) -> String {
    fn range<T: std::fmt::Debug>(min: &Option<T>, max: &Option<T>) -> String {
        match (min, max) {
            (Some(min), Some(max)) => format!("[{:?}, {:?}]", min, max),
            _ => "[]".to_string(),
        }
    }

    match typed {
        TypedStatistics::Generic => String::new(),
        TypedStatistics::Boolean { true_count } => format!("true {}", true_count),
        TypedStatistics::Integer { min, max, sum } => {
            format!("range {}  sum {:?}", range(min, max), sum)
        }
        TypedStatistics::Double { min, max, sum } => {
            format!("range {}  sum {:?}", range(min, max), sum)
        }
        TypedStatistics::String {
            min,
            max,
            total_length,
        } => format!("range {}  bytes {}", range(min, max), total_length),
    }
}
