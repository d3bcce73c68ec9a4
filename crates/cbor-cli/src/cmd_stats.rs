/// Implementation of `cbor stats`.
///
/// Streams the input through a counting handler and prints how many
/// items, containers and scalars of each kind it holds.
///
/// # Example output
///
/// ```text
/// File:    /tmp/events.bin  (41 bytes)
/// Items:   3 top-level, max depth 2
///
/// Kind              Count
/// ───────────────────────
/// arrays                1
/// maps                  2
/// names                 4
/// text strings          3
/// unsigned ints         2
/// ───────────────────────
/// tagged                1
/// ```
///
/// With `--json` the same counters are printed as one JSON object.
use anyhow::{Context, Result};
use cbor_decoder::StreamReader;
use cbor_wire::ReaderSource;
use serde::Serialize;

use crate::summary::Summary;
use crate::{StatsArgs, input};

#[derive(Serialize)]
struct Report<'a> {
    file: String,
    bytes: u64,
    #[serde(flatten)]
    summary: &'a Summary,
}

/// Run the `cbor stats` command.
///
/// # Errors
///
/// Returns an error if the input cannot be opened or fails to decode.
pub fn run(args: &StatsArgs) -> Result<()> {
    let label = input::label(&args.file);
    let source = ReaderSource::new(input::open(&args.file)?);
    let mut reader = StreamReader::new(source, Summary::default());
    reader
        .read_all()
        .with_context(|| format!("failed to decode {label}"))?;

    let bytes = reader.position();
    let summary = reader.handler();

    if args.json {
        let report = Report {
            file: label,
            bytes,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("File:    {label}  ({bytes} bytes)");
    println!(
        "Items:   {} top-level, max depth {}",
        summary.items, summary.max_depth
    );
    println!();

    // ── Per-kind counts ───────────────────────────────────────────────────────

    let rows = [
        ("arrays", summary.arrays),
        ("maps", summary.maps),
        ("names", summary.names),
        ("text strings", summary.text_strings),
        ("byte strings", summary.byte_strings),
        ("unsigned ints", summary.unsigned_integers),
        ("negative ints", summary.negative_integers),
        ("floats", summary.floats),
        ("booleans", summary.booleans),
        ("nulls", summary.nulls),
        ("bignums", summary.bignums),
    ];

    let rule = "─".repeat(23);
    println!("{:<16}{:>7}", "Kind", "Count");
    println!("{rule}");
    for (kind, count) in rows.iter().filter(|(_, count)| *count > 0) {
        println!("{kind:<16}{count:>7}");
    }
    println!("{rule}");
    println!("{:<16}{:>7}", "tagged", summary.tagged);

    Ok(())
}
