//! The stage abstraction and the configuration-holding stage builders.
//!
//! A [`Stage`] is a pure transformation from one record sequence to another.
//! Applying a stage does no work and consumes nothing; it returns a new lazy
//! sequence whose elements are computed as the caller pulls them. Pipeline
//! construction is free; only consumption costs.
//!
//! Each builder struct owns exactly its configuration (a predicate, a
//! mapper, a field list) and nothing else. Building the same stage twice
//! with equal configuration yields two independent, equivalent stages.

use std::sync::Arc;

use crate::error::PipelineError;
use crate::record::Record;
use crate::sequence::{RecordResult, RecordSequence};

type Predicate = Arc<dyn Fn(&Record) -> Result<bool, PipelineError>>;
type Mapper = Arc<dyn Fn(Record) -> RecordResult>;

/// A pure transformation from one record sequence to another.
pub trait Stage {
    /// Wrap `input` in this stage's lazy transformation.
    ///
    /// Must not pull from `input` or perform any other work; evaluation is
    /// deferred until the returned sequence is consumed.
    fn apply(&self, input: RecordSequence) -> RecordSequence;
}

/// Keeps records for which the predicate holds. Order preserving.
pub struct Filter {
    predicate: Predicate,
}

impl Filter {
    pub fn new<P>(predicate: P) -> Self
    where
        P: Fn(&Record) -> Result<bool, PipelineError> + 'static,
    {
        Filter {
            predicate: Arc::new(predicate),
        }
    }
}

impl Stage for Filter {
    fn apply(&self, input: RecordSequence) -> RecordSequence {
        let predicate = Arc::clone(&self.predicate);
        input.filter(move |record| predicate(record))
    }
}

/// Replaces each record with the mapper's output, one for one.
pub struct Map {
    mapper: Mapper,
}

impl Map {
    pub fn new<M>(mapper: M) -> Self
    where
        M: Fn(Record) -> RecordResult + 'static,
    {
        Map {
            mapper: Arc::new(mapper),
        }
    }
}

impl Stage for Map {
    fn apply(&self, input: RecordSequence) -> RecordSequence {
        let mapper = Arc::clone(&self.mapper);
        input.map(move |record| mapper(record))
    }
}

/// Keeps only the named fields of each associative record.
pub struct Select {
    fields: Vec<String>,
}

impl Select {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Select {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl Stage for Select {
    fn apply(&self, input: RecordSequence) -> RecordSequence {
        input.select(self.fields.clone())
    }
}

/// Binds the first record as the header and re-shapes the rest into
/// associative records.
#[derive(Default)]
pub struct Associate;

impl Associate {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stage for Associate {
    fn apply(&self, input: RecordSequence) -> RecordSequence {
        input.associate()
    }
}

/// Passes through at most the first `n` records.
pub struct Take {
    n: usize,
}

impl Take {
    pub fn new(n: usize) -> Self {
        Take { n }
    }
}

impl Stage for Take {
    fn apply(&self, input: RecordSequence) -> RecordSequence {
        input.take(self.n)
    }
}

/// Discards the first `n` records.
pub struct Skip {
    n: usize,
}

impl Skip {
    pub fn new(n: usize) -> Self {
        Skip { n }
    }
}

impl Stage for Skip {
    fn apply(&self, input: RecordSequence) -> RecordSequence {
        input.skip(self.n)
    }
}
