//! Error type shared by the slvbr writer and reader.

use std::io;
use thiserror::Error;

/// Errors that can arise when building, writing or parsing a slvbr artifact.
#[derive(Error, Debug)]
pub enum SlvbrError {
    /// Underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A tag value does not fit the declared tag width.
    #[error("tag {tag} value {value} does not fit in {width} byte(s) (line {line})")]
    TagOverflow {
        line: usize,
        tag: usize,
        value: u32,
        width: u32,
    },

    /// A serialized section differs from the length declared in Meta.
    #[error("section {section}: wrote {written} bytes, declared {declared}")]
    SectionLength {
        section: &'static str,
        written: usize,
        declared: usize,
    },

    /// Magic, Meta and the tag dictionary do not fit in the fixed header region.
    #[error("header needs {needed} bytes, only {limit} available")]
    HeaderOverflow { needed: usize, limit: usize },

    /// The bog outgrew the 32-bit pointer space.
    #[error("bog grew past {0} bytes")]
    BogOverflow(usize),

    /// Structural problem with inputs or an unsupported feature.
    #[error("{0}")]
    Invalid(String),

    /// The file failed a bounds or consistency check.
    #[error("corrupt artifact: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, SlvbrError>;
