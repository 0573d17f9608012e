//! `exactjson` CLI — validate and re-encode JSON streams from the command
//! line.
//!
//! The binary buffers a complete input blob, runs it through the codec, and
//! writes the result; it owns all I/O so the codec itself stays pure.
//!
//! ## Usage
//!
//! ```sh
//! # Normalize a document (stdin → stdout, compact output)
//! echo '{ "b" : 1, "a" : [1, 2] }' | exactjson fmt
//!
//! # Pretty-print from file to file
//! exactjson fmt -i data.json -o formatted.json --pretty 2
//!
//! # Escape everything down to ASCII
//! exactjson fmt --ascii-only -i unicode.json
//!
//! # Validate only; non-zero exit and a byte-offset diagnostic on failure
//! exactjson check -i data.json
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use exactjson_core::{DecodeOptions, EncodeOptions, NonFinitePolicy};

#[derive(Parser)]
#[command(name = "exactjson", version, about = "Round-trip-exact JSON codec CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a document and re-encode it with the selected conventions
    Fmt {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print with this many spaces per level (compact if omitted)
        #[arg(long, value_name = "WIDTH")]
        pretty: Option<usize>,
        /// Escape all non-ASCII characters as \uXXXX
        #[arg(long)]
        ascii_only: bool,
        /// Leave forward slashes unescaped
        #[arg(long)]
        keep_slashes: bool,
        /// Emit null for NaN and infinities instead of failing
        #[arg(long)]
        nonfinite_null: bool,
        /// Decode ISO-8601 datetime strings into datetime values
        #[arg(long)]
        parse_datetimes: bool,
    },
    /// Decode only, reporting the first error with its byte offset
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fmt {
            input,
            output,
            pretty,
            ascii_only,
            keep_slashes,
            nonfinite_null,
            parse_datetimes,
        } => {
            let text = read_input(input.as_deref())?;
            let decode_options = DecodeOptions {
                datetime_strings: parse_datetimes,
                ..Default::default()
            };
            let value = exactjson_core::decode_with(&text, &decode_options)
                .context("failed to decode input")?;
            let encode_options = EncodeOptions {
                ascii_only,
                indent: pretty,
                escape_forward_slash: !keep_slashes,
                non_finite: if nonfinite_null {
                    NonFinitePolicy::Null
                } else {
                    NonFinitePolicy::Fail
                },
                ..Default::default()
            };
            let encoded = exactjson_core::encode_with(&value, &encode_options)
                .context("failed to encode value")?;
            write_output(output.as_deref(), &encoded)?;
        }
        Commands::Check { input } => {
            let text = read_input(input.as_deref())?;
            exactjson_core::decode(&text).context("invalid JSON")?;
        }
    }

    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read file: {path}"))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("failed to write file: {path}"))?;
        }
        None => {
            println!("{content}");
        }
    }
    Ok(())
}
