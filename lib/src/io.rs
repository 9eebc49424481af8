//! Loading word records from JSON dumps.

use crate::errors::Result;
use crate::record::WordRecord;
use log::info;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Read a JSON array of [`WordRecord`]s.
///
/// `-` reads standard input; a path ending in `.zst` is decompressed with zstd.
pub fn read_records(path: &Path) -> Result<Vec<WordRecord>> {
    let records = if path.as_os_str() == "-" {
        info!("reading records from stdin");
        parse_records(std::io::stdin().lock())?
    } else {
        info!("reading records from {}", path.display());
        let file = BufReader::new(File::open(path)?);
        if path.extension().is_some_and(|e| e == "zst") {
            parse_records(zstd::stream::read::Decoder::new(file)?)?
        } else {
            parse_records(file)?
        }
    };
    info!("read {} records", records.len());
    Ok(records)
}

/// Parse a JSON array of records from any reader.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<WordRecord>> {
    Ok(serde_json::from_reader(reader)?)
}
