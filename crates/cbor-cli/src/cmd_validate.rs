/// Implementation of `cbor validate`.
///
/// Decodes the whole input without producing output and reports the
/// first failure with its error code and byte offset.
///
/// ```text
/// $ cbor validate data.bin
/// ✓ 3 item(s), 41 bytes
///
/// $ cbor validate truncated.bin
/// ✗ Error: unexpected_eof at offset 12: unexpected end of input at offset 12
/// error: validation failed
/// ```
use anyhow::{Result, anyhow, bail};
use cbor_decoder::{DecoderOptions, StreamReader};
use cbor_wire::{ReaderSource, Source};

use crate::summary::Summary;
use crate::{ValidateArgs, input};

/// Run the `cbor validate` command.
///
/// # Errors
///
/// Returns an error if the input cannot be opened, fails to decode, or
/// (with `--single`) does not hold exactly one item.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let source = ReaderSource::new(input::open(&args.file)?);
    let options = DecoderOptions::default().with_max_nesting_depth(args.max_depth);
    let mut reader = StreamReader::with_options(source, Summary::default(), options);

    if args.single {
        if let Err(e) = reader.read() {
            return Err(report(&e));
        }
        let (mut source, _) = reader.into_parts();
        let offset = source.position();
        if !source.is_eof()? {
            println!("✗ Error: trailing_data at offset {offset}: expected a single item");
            bail!("validation failed");
        }
        println!("✓ 1 item, {offset} bytes");
        return Ok(());
    }

    match reader.read_all() {
        Ok(items) => {
            println!("✓ {items} item(s), {} bytes", reader.position());
            Ok(())
        }
        Err(e) => Err(report(&e)),
    }
}

fn report(e: &cbor_decoder::DecodeError) -> anyhow::Error {
    match e.offset() {
        Some(offset) => println!("✗ Error: {} at offset {offset}: {e}", e.code()),
        None => println!("✗ Error: {}: {e}", e.code()),
    }
    anyhow!("validation failed")
}
