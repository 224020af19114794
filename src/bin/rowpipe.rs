//! CLI tool to run a lazy record pipeline over a CSV-like input file.
//!
//! Reads rows from the input, optionally binds the first row as a header
//! and selects fields, then writes, counts, or prints the result.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rowpipe::{FileSink, FileSource, Pipeline, PipelineError, Source, Stage, count, print};

#[derive(Parser)]
#[command(
    name = "rowpipe",
    about = "Run a lazy record pipeline over a CSV-like input file"
)]
struct Args {
    /// Input CSV file
    input: PathBuf,

    /// Output file (default: print to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fields to keep, by header name (implies header binding)
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,

    /// Field delimiter (single ASCII character)
    #[arg(long, default_value = ",", value_parser = ascii_char)]
    delimiter: u8,

    /// Quote (enclosure) character (single ASCII character)
    #[arg(long, default_value = "\"", value_parser = ascii_char)]
    quote: u8,

    /// Skip the first N data rows
    #[arg(long, default_value_t = 0)]
    skip: usize,

    /// Keep at most N data rows
    #[arg(long)]
    take: Option<usize>,

    /// Print the record count instead of the records
    #[arg(long)]
    count: bool,

    /// Treat the input as headerless positional rows
    #[arg(long)]
    no_header: bool,

    /// Allow overwriting an existing output file
    #[arg(long)]
    overwrite: bool,
}

/// Parse a single ASCII character into its byte. The csv layer works on
/// bytes, so a multi-byte character cannot be a delimiter or quote.
fn ascii_char(s: &str) -> Result<u8, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(format!("'{s}' is not a single ASCII character")),
    }
}

fn run(args: &Args) -> Result<(), PipelineError> {
    let source = FileSource::new(&args.input)
        .delimiter(args.delimiter)
        .quote(args.quote);

    let mut pipeline = Pipeline::new();
    if !args.no_header {
        pipeline = pipeline.associate();
    }
    if !args.select.is_empty() {
        pipeline = pipeline.select(args.select.clone());
    }
    if args.skip > 0 {
        pipeline = pipeline.skip(args.skip);
    }
    if let Some(n) = args.take {
        pipeline = pipeline.take(n);
    }

    let seq = pipeline.apply(source.open()?);

    if args.count {
        println!("{}", count(seq)?);
    } else if let Some(path) = &args.output {
        FileSink::new(path)
            .delimiter(args.delimiter)
            .overwrite(args.overwrite)
            .write(seq)?;
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        print(seq, &mut out)?;
        out.flush()
            .map_err(|e| PipelineError::WriteError(e.to_string()))?;
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
