//! # rowpipe
//!
//! A lazy record-pipeline library for CSV-like tabular data.
//!
//! Independent processing stages (filtering, field selection, row mapping,
//! header binding) compose into a single pipeline that transforms a source
//! of rows into a derived sequence of rows without ever materializing the
//! dataset. Evaluation is pull-based: building a pipeline is free, and
//! nothing runs until a sink (or any consumer) pulls records one at a time
//! through every intermediate stage.
//!
//! ## Overview
//!
//! - **[`Record`]**: one row, either positional (ordered values) or
//!   associative (ordered name→value pairs after header binding)
//! - **[`RecordSequence`]**: a lazy, single-pass, forward-only stream of
//!   records; errors surface lazily as `Err` items
//! - **[`Stage`]**: a pure sequence-to-sequence transformation; builders
//!   like [`Filter`] and [`Select`] close over their configuration
//! - **[`Pipeline`]**: an ordered stage composition, itself a [`Stage`];
//!   the empty pipeline is an explicit identity passthrough
//! - **Sources and sinks**: [`FileSource`]/[`from_reader`] produce
//!   sequences from CSV input; [`write`], [`count`], and [`print`] drain
//!   them
//!
//! ## Example
//!
//! ```
//! use rowpipe::{Pipeline, Record, RecordSequence, Stage};
//!
//! let rows = RecordSequence::from_records(vec![
//!     Record::positional(["name", "dept"]),
//!     Record::positional(["smith", "sales"]),
//!     Record::positional(["jones", "engineering"]),
//! ]);
//!
//! let pipeline = Pipeline::new()
//!     .associate()
//!     .filter(|r| Ok(r.get("dept") == Some("sales")))
//!     .select(["name"]);
//!
//! let out: Vec<Record> = pipeline.apply(rows).collect::<Result<_, _>>().unwrap();
//! assert_eq!(out, vec![Record::associative([("name", "smith")])]);
//! ```

pub mod error;
pub mod pipeline;
pub mod record;
pub mod sequence;
pub mod sink;
pub mod source;
pub mod stage;

pub use error::PipelineError;
pub use pipeline::Pipeline;
pub use record::Record;
pub use sequence::{RecordResult, RecordSequence};
pub use sink::{FileSink, count, print, write};
pub use source::{DEFAULT_DELIMITER, DEFAULT_QUOTE, FileSource, Source, from_reader};
pub use stage::{Associate, Filter, Map, Select, Skip, Stage, Take};
