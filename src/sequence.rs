//! Lazy, single-pass record sequences and the primitive adaptors.
//!
//! A [`RecordSequence`] is the common currency between stages: a forward-only
//! stream of `Result<Record, PipelineError>`. Building one (or wrapping one
//! in an adaptor) performs no work; records are computed one at a time as the
//! consumer pulls. Errors travel as `Err` items, so a failure surfaces at the
//! exact pull where it occurs.
//!
//! A sequence is consumed by iterating it and is exhausted after one full
//! pull-through. There is no indexing, no length query, and no rewind; do
//! not assume replay.

use crate::error::PipelineError;
use crate::record::Record;

/// One pulled element: a record, or the error that ended the sequence.
pub type RecordResult = Result<Record, PipelineError>;

/// A lazy, forward-only, single-consumption stream of records.
pub struct RecordSequence {
    iter: Box<dyn Iterator<Item = RecordResult>>,
}

impl RecordSequence {
    /// Wrap any iterator of record results. No element is pulled here.
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = RecordResult> + 'static,
    {
        RecordSequence {
            iter: Box::new(iter),
        }
    }

    /// A sequence over an in-memory batch of records.
    pub fn from_records(records: Vec<Record>) -> Self {
        RecordSequence::new(records.into_iter().map(Ok))
    }

    /// A sequence with no elements.
    pub fn empty() -> Self {
        RecordSequence::new(std::iter::empty())
    }

    /// Keep only records for which `predicate` returns `Ok(true)`.
    ///
    /// Order is preserved. A predicate error is yielded in place of the
    /// record that triggered it, at the pull where it occurred.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&Record) -> Result<bool, PipelineError> + 'static,
    {
        RecordSequence::new(self.iter.filter_map(move |item| match item {
            Ok(record) => match predicate(&record) {
                Ok(true) => Some(Ok(record)),
                Ok(false) => None,
                Err(err) => Some(Err(err)),
            },
            Err(err) => Some(Err(err)),
        }))
    }

    /// Replace each record with `mapper(record)`, one output per input.
    pub fn map<M>(self, mapper: M) -> Self
    where
        M: Fn(Record) -> RecordResult + 'static,
    {
        RecordSequence::new(self.iter.map(move |item| item.and_then(&mapper)))
    }

    /// Keep only the named fields of each associative record.
    ///
    /// Retained keys keep their original order within the record. A name in
    /// `fields` that a record does not carry is silently omitted from that
    /// record's output. Positional records fail with `ShapeMismatch`.
    pub fn select(self, fields: Vec<String>) -> Self {
        self.map(move |record| match record {
            Record::Associative(pairs) => Ok(Record::Associative(
                pairs
                    .into_iter()
                    .filter(|(key, _)| fields.iter().any(|f| f == key))
                    .collect(),
            )),
            Record::Positional(_) => Err(PipelineError::ShapeMismatch(
                "select requires associative records".to_string(),
            )),
        })
    }

    /// Bind the first record as the header and re-shape the rest.
    ///
    /// The first pulled record must be positional; its values become the
    /// field-name list and it is excluded from the output. Every later
    /// record is zipped against that list into an associative record. A
    /// record whose length differs from the header fails with
    /// `ShapeMismatch` exactly when that record is pulled.
    pub fn associate(self) -> Self {
        RecordSequence::new(Associate {
            inner: self.iter,
            header: None,
        })
    }

    /// Pass through at most the first `n` records.
    pub fn take(self, n: usize) -> Self {
        RecordSequence::new(self.iter.take(n))
    }

    /// Discard the first `n` records, pass through the rest.
    pub fn skip(self, n: usize) -> Self {
        RecordSequence::new(self.iter.skip(n))
    }

    /// An on-demand copy-through: same elements, same order, fresh sequence.
    ///
    /// Used for the zero-stage pipeline, where the interface guarantee is
    /// that applying a pipeline always yields a new lazy sequence rather
    /// than handing back the input.
    pub fn passthrough(self) -> Self {
        self.map(Ok)
    }
}

impl Iterator for RecordSequence {
    type Item = RecordResult;

    fn next(&mut self) -> Option<RecordResult> {
        self.iter.next()
    }
}

/// Header-binding adaptor: captures the first positional record as the
/// field-name list and zips every later record against it.
struct Associate<I> {
    inner: I,
    header: Option<Vec<String>>,
}

impl<I> Iterator for Associate<I>
where
    I: Iterator<Item = RecordResult>,
{
    type Item = RecordResult;

    fn next(&mut self) -> Option<RecordResult> {
        if self.header.is_none() {
            match self.inner.next()? {
                Ok(Record::Positional(fields)) => self.header = Some(fields),
                Ok(Record::Associative(_)) => {
                    return Some(Err(PipelineError::ShapeMismatch(
                        "associate requires a positional header record".to_string(),
                    )));
                }
                Err(err) => return Some(Err(err)),
            }
        }
        let header = self.header.as_ref()?;

        match self.inner.next()? {
            Ok(Record::Positional(values)) => {
                if values.len() != header.len() {
                    return Some(Err(PipelineError::ShapeMismatch(format!(
                        "record has {} fields, header has {}",
                        values.len(),
                        header.len()
                    ))));
                }
                Some(Ok(Record::Associative(
                    header.iter().cloned().zip(values).collect(),
                )))
            }
            Ok(Record::Associative(_)) => Some(Err(PipelineError::ShapeMismatch(
                "associate requires positional records".to_string(),
            ))),
            Err(err) => Some(Err(err)),
        }
    }
}
