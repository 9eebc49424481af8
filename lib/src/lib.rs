//! slovobor: compile word records into a `slvbr` sub-anagram dictionary index.
//!
//! The pipeline is a straight line: [`alphabet`] fixes the letter tags,
//! [`normalize`] filters records and counts letters, [`reorder`] optionally
//! picks a better tag order, [`rank`] sorts the records, and [`compile`] turns
//! them into `slvbr` Lines and hands them to the format writer.
//!
//! ```no_run
//! use slovobor::{compile_to_file, read_records, AlphabetSource, CompilerConfig};
//! use std::path::Path;
//!
//! let config = CompilerConfig::builder()
//!     .alphabet(AlphabetSource::Locale("ru".into()))
//!     .min_length(2)
//!     .build()?;
//! let records = read_records(Path::new("words.json"))?;
//! compile_to_file(records, &config, Path::new("slvbr.db"))?;
//! # Ok::<(), slovobor::CompileError>(())
//! ```

extern crate derive_builder;

pub mod alphabet;
pub mod compile;
pub mod config;
pub mod errors;
pub mod io;
pub mod normalize;
pub mod rank;
pub mod record;
pub mod reorder;
pub mod text;

pub use alphabet::{Alphabet, AlphabetSource};
pub use compile::{compile, compile_to_file};
pub use config::{CompilerConfig, CompilerConfigBuilder};
pub use errors::{CompileError, Result};
pub use io::read_records;
pub use record::WordRecord;
