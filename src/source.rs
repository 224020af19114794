//! Source adapters: turning raw CSV-like input into a record sequence.
//!
//! A source is a zero-argument producer of a lazy sequence of positional
//! records. Parsing is delegated to the `csv` crate; one logical row is read
//! per pull, so a source never materializes its input. The reader (and any
//! file handle behind it) is owned by the sequence and dropped with it,
//! whether the sequence was exhausted or abandoned early.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PipelineError;
use crate::record::Record;
use crate::sequence::RecordSequence;

/// Default CSV delimiter.
pub const DEFAULT_DELIMITER: u8 = b',';
/// Default CSV quote (enclosure) character.
pub const DEFAULT_QUOTE: u8 = b'"';

/// A zero-argument producer of a sequence of positional records.
pub trait Source {
    /// Open the source and return its lazy record sequence.
    ///
    /// Errors that concern the source as a whole (a missing path) are
    /// returned here, before any element is yielded; per-row problems
    /// surface lazily as `Err` items in the sequence.
    fn open(&self) -> Result<RecordSequence, PipelineError>;
}

/// A CSV file on disk.
pub struct FileSource {
    path: PathBuf,
    delimiter: u8,
    quote: u8,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileSource {
            path: path.as_ref().to_path_buf(),
            delimiter: DEFAULT_DELIMITER,
            quote: DEFAULT_QUOTE,
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }
}

impl Source for FileSource {
    fn open(&self) -> Result<RecordSequence, PipelineError> {
        if !self.path.exists() {
            return Err(PipelineError::NotFound {
                path: self.path.clone(),
            });
        }
        let file = File::open(&self.path)
            .map_err(|e| PipelineError::InvalidSource(format!("{}: {e}", self.path.display())))?;
        debug!(path = %self.path.display(), "opened file source");
        Ok(from_reader(file, self.delimiter, self.quote))
    }
}

/// Build a record sequence over an already-open readable stream.
///
/// One logical CSV row is parsed per pull. A row consisting of a single
/// empty field (a blank line) is skipped rather than yielded; an unparsable
/// read yields an `InvalidSource` error at that pull.
pub fn from_reader<R>(reader: R, delimiter: u8, quote: u8) -> RecordSequence
where
    R: io::Read + 'static,
{
    let rows = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
        .into_records();

    RecordSequence::new(rows.filter_map(|row| match row {
        Ok(row) => {
            if row.len() == 1 && row.get(0) == Some("") {
                return None;
            }
            Some(Ok(Record::positional(row.iter())))
        }
        Err(e) => Some(Err(PipelineError::InvalidSource(e.to_string()))),
    }))
}
