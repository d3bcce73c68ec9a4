/// Implementation of `cbor decode`.
///
/// Streams every top-level item from the input and writes it as JSON,
/// one document per item. Output goes to stdout unless `--output` is set.
///
/// ```text
/// $ printf '\xa1\x61\x61\x82\x01\x02' | cbor decode -
/// {"a":[1,2]}
/// ```
use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use cbor_decoder::DecoderOptions;
use cbor_render::{OutputMode, RenderConfig, render_stream};
use cbor_types::ByteStringFormat;
use log::info;

use crate::{BytesFormat, DecodeArgs, input};

/// Run the `cbor decode` command.
///
/// # Errors
///
/// Returns an error if the input cannot be opened, the output cannot be
/// created, or decoding fails part way through.
pub fn run(args: &DecodeArgs) -> Result<()> {
    let source = input::open(&args.file)?;
    let label = input::label(&args.file);

    let config = RenderConfig {
        mode: if args.pretty {
            OutputMode::Pretty
        } else {
            OutputMode::Compact
        },
        bytes_format: match args.bytes {
            BytesFormat::Base64url => ByteStringFormat::Base64Url,
            BytesFormat::Base64 => ByteStringFormat::Base64,
            BytesFormat::Base16 => ByteStringFormat::Base16,
        },
        ..RenderConfig::default()
    };
    let options = DecoderOptions::default().with_max_nesting_depth(args.max_depth);

    let out: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let count = render_stream(source, out, &config, options)
        .with_context(|| format!("failed to decode {label}"))?;
    info!("decoded {count} item(s) from {label}");
    Ok(())
}
