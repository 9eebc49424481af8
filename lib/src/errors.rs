// Compile errors

use slvbr::SlvbrError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    /// Bad option values, unknown locale or encoding, empty alphabet.
    #[error("configuration error: {0}")]
    Config(String),

    /// Nothing survived filtering.
    #[error("no records left after filtering ({read} read)")]
    Empty { read: usize },

    /// A per-record tag value does not fit the one byte tag width.
    #[error("word {word:?}: tag {tag:?} value {value} exceeds 255")]
    TagOverflow {
        word: String,
        tag: String,
        value: u32,
    },

    #[error(transparent)]
    Format(#[from] SlvbrError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed input: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CompileError>;
