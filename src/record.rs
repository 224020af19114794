//! The record value type flowing through every pipeline stage.
//!
//! A record is one row of tabular data in one of two shapes:
//!
//! - **Positional**: an ordered list of scalar values, as read straight from
//!   a CSV-like source.
//! - **Associative**: an ordered name-to-value mapping, as produced by the
//!   header-binding `associate` stage.
//!
//! Each stage declares which shape it accepts and produces; handing a stage
//! the wrong shape is a [`ShapeMismatch`](crate::PipelineError::ShapeMismatch)
//! raised when the offending record is pulled, never a silent coercion.

use std::fmt;

/// One row of tabular data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// An ordered list of scalar values (e.g. a raw CSV row).
    Positional(Vec<String>),
    /// An ordered mapping from field name to scalar value.
    Associative(Vec<(String, String)>),
}

impl Record {
    /// Build a positional record from anything yielding string-like values.
    pub fn positional<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Record::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Build an associative record from ordered (name, value) pairs.
    pub fn associative<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Record::Associative(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, Record::Positional(_))
    }

    pub fn is_associative(&self) -> bool {
        matches!(self, Record::Associative(_))
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        match self {
            Record::Positional(values) => values.len(),
            Record::Associative(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a field by name. Always `None` for positional records.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self {
            Record::Positional(_) => None,
            Record::Associative(pairs) => pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
        }
    }

    /// Iterate the scalar values in order, ignoring names.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        match self {
            Record::Positional(values) => Values::Positional(values.iter()),
            Record::Associative(pairs) => Values::Associative(pairs.iter()),
        }
    }
}

enum Values<'a> {
    Positional(std::slice::Iter<'a, String>),
    Associative(std::slice::Iter<'a, (String, String)>),
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        match self {
            Values::Positional(iter) => iter.next().map(String::as_str),
            Values::Associative(iter) => iter.next().map(|(_, v)| v.as_str()),
        }
    }
}

/// Human-readable rendering used by the print sink. No format guarantee.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Positional(values) => write!(f, "[{}]", values.join(", ")),
            Record::Associative(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
