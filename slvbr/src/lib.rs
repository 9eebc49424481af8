//! slvbr: compact on-disk format for slovobor dictionary indexes.
//!
//! A slvbr file holds fixed-width Lines (one tag value per letter plus a few
//! synthetic tags, then a pointer into the bog), a deduplicated byte store with
//! the word bodies, and a compressed table of per-page tag minimums that lets
//! a reader skip pages which cannot match.
//!
//! Build a file
//!
//! ```no_run
//! use slvbr::{write_file, Line, TagDef, TagKind, WriterOptions};
//!
//! let tags = vec![
//!     TagDef::new(TagKind::Letter, b"a").unwrap(),
//!     TagDef::new(TagKind::Length, b"~").unwrap(),
//! ];
//! let lines = vec![Line::new(vec![1, 1], b"a".to_vec())];
//! let opts = WriterOptions { crop: 1, ..WriterOptions::default() };
//! write_file("example.slvbr", tags, lines, &opts).expect("write ok");
//! ```
//!
//! Read it back
//!
//! ```no_run
//! use slvbr::SlvbrFile;
//! use std::path::Path;
//!
//! let f = SlvbrFile::open(Path::new("example.slvbr")).expect("open");
//! assert_eq!(f.body(0), Some(&b"a"[..]));
//! ```

pub mod bog;
pub mod error;
pub mod header;
pub mod line;
pub mod reader;
pub mod toc;
pub mod writer;

pub use bog::{Bog, BogStats};
pub use error::{Result, SlvbrError};
pub use header::{Meta, TagDef, TagKind};
pub use line::{BogPtr, Line};
pub use reader::SlvbrFile;
pub use toc::{Toc, TocEntry};
pub use writer::{write_file, Artifact, WriterOptions};
