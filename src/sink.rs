//! Sink adapters: draining a record sequence into an external effect.
//!
//! A sink pulls a sequence to completion, performing one effect per record,
//! and propagates the first error it encounters unchanged — whether that
//! error came from the sequence itself or from the sink's own write. There
//! is no partial-success mode: after an error the remaining sequence is
//! abandoned.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PipelineError;
use crate::sequence::RecordSequence;
use crate::source::DEFAULT_DELIMITER;

/// Serialize each record as one row through a csv writer.
///
/// Associative records are written as their values in key order; emitting a
/// header row, if wanted, is the caller's job upstream. Returns the number
/// of rows written.
pub fn write<W: io::Write>(
    seq: RecordSequence,
    writer: &mut csv::Writer<W>,
) -> Result<usize, PipelineError> {
    let mut written = 0;
    for item in seq {
        let record = item?;
        writer
            .write_record(record.values())
            .map_err(|e| PipelineError::WriteError(e.to_string()))?;
        written += 1;
    }
    writer
        .flush()
        .map_err(|e| PipelineError::WriteError(e.to_string()))?;
    debug!(rows = written, "wrote records");
    Ok(written)
}

/// Fully drain the sequence and return the number of records observed.
pub fn count(seq: RecordSequence) -> Result<usize, PipelineError> {
    let mut n = 0;
    for item in seq {
        item?;
        n += 1;
    }
    Ok(n)
}

/// Fully drain the sequence, rendering each record human-readably.
///
/// Diagnostic use only; the rendering carries no format guarantee. Returns
/// the number of records printed.
pub fn print<W: io::Write>(seq: RecordSequence, out: &mut W) -> Result<usize, PipelineError> {
    let mut printed = 0;
    for item in seq {
        let record = item?;
        writeln!(out, "{record}").map_err(|e| PipelineError::WriteError(e.to_string()))?;
        printed += 1;
    }
    Ok(printed)
}

/// A CSV file destination with an explicit overwrite policy.
///
/// Writing refuses an existing destination with `AlreadyExists` unless
/// overwriting was permitted.
pub struct FileSink {
    path: PathBuf,
    delimiter: u8,
    overwrite: bool,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileSink {
            path: path.as_ref().to_path_buf(),
            delimiter: DEFAULT_DELIMITER,
            overwrite: false,
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Drain `seq` into the destination file, one row per record.
    pub fn write(&self, seq: RecordSequence) -> Result<usize, PipelineError> {
        if !self.overwrite && self.path.exists() {
            return Err(PipelineError::AlreadyExists {
                path: self.path.clone(),
            });
        }
        let file = File::create(&self.path)
            .map_err(|e| PipelineError::WriteError(format!("{}: {e}", self.path.display())))?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(file);
        let written = write(seq, &mut writer)?;
        debug!(path = %self.path.display(), rows = written, "wrote file sink");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn rows() -> RecordSequence {
        RecordSequence::from_records(vec![
            Record::positional(["a", "b"]),
            Record::positional(["1", "2"]),
        ])
    }

    #[test]
    fn test_count_empty() {
        assert_eq!(count(RecordSequence::empty()).unwrap(), 0);
    }

    #[test]
    fn test_count_two() {
        assert_eq!(count(rows()).unwrap(), 2);
    }

    #[test]
    fn test_count_propagates_sequence_error() {
        let seq = RecordSequence::new(
            vec![
                Ok(Record::positional(["x"])),
                Err(PipelineError::InvalidSource("broken".to_string())),
            ]
            .into_iter(),
        );
        assert!(matches!(
            count(seq),
            Err(PipelineError::InvalidSource(_))
        ));
    }

    #[test]
    fn test_write_serializes_rows() {
        let mut writer = csv::Writer::from_writer(vec![]);
        let written = write(rows(), &mut writer).unwrap();
        assert_eq!(written, 2);
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, "a,b\n1,2\n");
    }

    #[test]
    fn test_write_associative_values_in_key_order() {
        let seq = RecordSequence::from_records(vec![Record::associative([
            ("name", "smith"),
            ("dept", "sales"),
        ])]);
        let mut writer = csv::Writer::from_writer(vec![]);
        write(seq, &mut writer).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, "smith,sales\n");
    }

    #[test]
    fn test_write_aborts_on_sequence_error() {
        let seq = RecordSequence::new(
            vec![
                Ok(Record::positional(["good"])),
                Err(PipelineError::ShapeMismatch("ragged".to_string())),
                Ok(Record::positional(["unreached"])),
            ]
            .into_iter(),
        );
        let mut writer = csv::Writer::from_writer(vec![]);
        let result = write(seq, &mut writer);
        assert!(matches!(result, Err(PipelineError::ShapeMismatch(_))));
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, "good\n");
    }

    #[test]
    fn test_print_renders_each_record() {
        let mut out = Vec::new();
        let printed = print(rows(), &mut out).unwrap();
        assert_eq!(printed, 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_file_sink_refuses_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "already here\n").unwrap();

        let result = FileSink::new(&path).write(rows());
        assert!(matches!(result, Err(PipelineError::AlreadyExists { .. })));
        // Original content untouched.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "already here\n");
    }

    #[test]
    fn test_file_sink_overwrites_when_permitted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "old\n").unwrap();

        let written = FileSink::new(&path).overwrite(true).write(rows()).unwrap();
        assert_eq!(written, 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn test_file_sink_creates_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.csv");
        let written = FileSink::new(&path).write(rows()).unwrap();
        assert_eq!(written, 2);
        assert!(path.exists());
    }
}
