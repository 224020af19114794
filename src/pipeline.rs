//! The pipeline composer: an ordered list of stages exposed as one stage.
//!
//! Applying a pipeline of stages `[s1, .., sn]` to an input sequence is
//! equivalent to `sn(..s2(s1(input)))`. Composition is associative, so
//! grouping sub-pipelines produces identical results to flattening them, and
//! because [`Pipeline`] itself implements [`Stage`], pipelines nest freely.
//!
//! The empty pipeline is still a valid stage: it yields a fresh lazy
//! copy-through of its input, never the input handle itself, so "applying a
//! pipeline returns a new lazy sequence" holds unconditionally.

use crate::error::PipelineError;
use crate::record::Record;
use crate::sequence::{RecordResult, RecordSequence};
use crate::stage::{Associate, Filter, Map, Select, Skip, Stage, Take};

/// An ordered composition of stages, itself usable as a single stage.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// An empty pipeline: the identity stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose an ordered list of stages.
    pub fn from_stages(stages: Vec<Box<dyn Stage>>) -> Self {
        Pipeline { stages }
    }

    /// Append a stage to the end of the pipeline.
    pub fn stage<S>(mut self, stage: S) -> Self
    where
        S: Stage + 'static,
    {
        self.stages.push(Box::new(stage));
        self
    }

    /// Number of composed stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Append a filter stage.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&Record) -> Result<bool, PipelineError> + 'static,
    {
        self.stage(Filter::new(predicate))
    }

    /// Append a map stage.
    pub fn map<M>(self, mapper: M) -> Self
    where
        M: Fn(Record) -> RecordResult + 'static,
    {
        self.stage(Map::new(mapper))
    }

    /// Append a field-selection stage.
    pub fn select<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stage(Select::new(fields))
    }

    /// Append a header-binding stage.
    pub fn associate(self) -> Self {
        self.stage(Associate::new())
    }

    /// Append a take-first-n stage.
    pub fn take(self, n: usize) -> Self {
        self.stage(Take::new(n))
    }

    /// Append a skip-first-n stage.
    pub fn skip(self, n: usize) -> Self {
        self.stage(Skip::new(n))
    }
}

impl Stage for Pipeline {
    fn apply(&self, input: RecordSequence) -> RecordSequence {
        if self.stages.is_empty() {
            return input.passthrough();
        }
        self.stages
            .iter()
            .fold(input, |seq, stage| stage.apply(seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_rows() -> RecordSequence {
        RecordSequence::from_records(vec![
            Record::positional(["a", "b"]),
            Record::positional(["11", "22"]),
            Record::positional(["33", "44"]),
        ])
    }

    fn collect(seq: RecordSequence) -> Vec<Record> {
        seq.collect::<Result<Vec<_>, _>>().unwrap()
    }

    fn upper_stage() -> Map {
        Map::new(|r| match r {
            Record::Associative(pairs) => Ok(Record::Associative(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k, v.to_uppercase()))
                    .collect(),
            )),
            other => Ok(other),
        })
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let out = collect(Pipeline::new().apply(raw_rows()));
        assert_eq!(
            out,
            vec![
                Record::positional(["a", "b"]),
                Record::positional(["11", "22"]),
                Record::positional(["33", "44"]),
            ]
        );
    }

    #[test]
    fn test_empty_pipeline_yields_fresh_lazy_sequence() {
        // The result is still lazy: building it pulls nothing even when the
        // input would panic on pull.
        let input = RecordSequence::new(
            std::iter::repeat_with(|| -> RecordResult { panic!("pulled") }).take(1),
        );
        let out = Pipeline::new().apply(input);
        drop(out);
    }

    #[test]
    fn test_stages_apply_left_to_right() {
        let pipeline = Pipeline::new()
            .associate()
            .filter(|r| Ok(r.get("a") == Some("11")));
        let out = collect(pipeline.apply(raw_rows()));
        assert_eq!(out, vec![Record::associative([("a", "11"), ("b", "22")])]);
    }

    #[test]
    fn test_associativity() {
        let flat = Pipeline::new()
            .associate()
            .stage(Filter::new(|r: &Record| Ok(!r.is_empty())))
            .stage(upper_stage());

        let left_grouped = Pipeline::new()
            .stage(
                Pipeline::new()
                    .associate()
                    .stage(Filter::new(|r: &Record| Ok(!r.is_empty()))),
            )
            .stage(upper_stage());

        let right_grouped = Pipeline::new().associate().stage(
            Pipeline::new()
                .stage(Filter::new(|r: &Record| Ok(!r.is_empty())))
                .stage(upper_stage()),
        );

        let expected = collect(flat.apply(raw_rows()));
        assert_eq!(collect(left_grouped.apply(raw_rows())), expected);
        assert_eq!(collect(right_grouped.apply(raw_rows())), expected);
    }

    #[test]
    fn test_pipeline_nests_as_stage() {
        let inner = Pipeline::new().associate();
        let outer = Pipeline::new().stage(inner).select(["b"]);
        let out = collect(outer.apply(raw_rows()));
        assert_eq!(
            out,
            vec![
                Record::associative([("b", "22")]),
                Record::associative([("b", "44")]),
            ]
        );
    }

    #[test]
    fn test_composed_associate_filter_map() {
        let rows = RecordSequence::from_records(vec![
            Record::positional(["a", "b"]),
            Record::positional(["11", "22"]),
            Record::positional(Vec::<String>::new()),
        ]);
        // Filter rejects the empty row before associate would zip it; the
        // map stage then rewrites every value so its effect is observable.
        let pipeline = Pipeline::new()
            .filter(|r| Ok(!r.is_empty()))
            .associate()
            .map(|r| match r {
                Record::Associative(pairs) => Ok(Record::Associative(
                    pairs.into_iter().map(|(k, v)| (k, format!("#{v}"))).collect(),
                )),
                other => Ok(other),
            });
        let out = collect(pipeline.apply(rows));
        assert_eq!(out, vec![Record::associative([("a", "#11"), ("b", "#22")])]);
    }

    #[test]
    fn test_construction_is_free_errors_are_lazy() {
        let rows = RecordSequence::from_records(vec![
            Record::positional(["a", "b"]),
            Record::positional(["1"]),
        ]);
        // Building and applying a pipeline over a malformed input succeeds;
        // the mismatch only surfaces when the bad record is pulled.
        let mut seq = Pipeline::new().associate().apply(rows);
        assert!(matches!(
            seq.next().unwrap(),
            Err(PipelineError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_len_and_is_empty() {
        let p = Pipeline::new();
        assert!(p.is_empty());
        let p = p.associate().select(["a"]);
        assert_eq!(p.len(), 2);
    }
}
