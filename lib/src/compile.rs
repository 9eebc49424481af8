//! The compile pipeline: records in, artifact out.

use crate::alphabet::Alphabet;
use crate::config::CompilerConfig;
use crate::errors::{CompileError, Result};
use crate::normalize::{normalize_all, Normalized};
use crate::rank::{cluster_stats, rank};
use crate::record::WordRecord;
use crate::reorder::best_tag_order;
use crate::text::{encode_lossy, resolve_encoding};
use encoding_rs::Encoding;
use log::info;
use slvbr::{Artifact, Line, SlvbrError};
use std::path::Path;

/// Ranking-key positions used for the clustering diagnostic.
const CLUSTER_PREFIX: usize = 8;

/// Filter, count, optionally reorder, rank, and assemble `records`.
///
/// The alphabet, the encoding and the tag dictionary are resolved before any
/// record is looked at, so configuration errors surface first.
pub fn compile(records: Vec<WordRecord>, config: &CompilerConfig) -> Result<Artifact> {
    let mut alphabet = Alphabet::resolve(&config.alphabet)?;
    let encoding = resolve_encoding(&config.encoding)?;
    alphabet.tag_defs(encoding)?;
    info!(
        "alphabet: {} letters, {} tags per line",
        alphabet.len(),
        alphabet.tags_count()
    );

    let read = records.len();
    let mut normalized = normalize_all(records, &alphabet, config);
    if normalized.is_empty() {
        return Err(CompileError::Empty { read });
    }
    info!("{} of {} records passed filters", normalized.len(), read);

    if config.reorder_tags {
        let order = best_tag_order(&normalized, alphabet.len());
        for n in normalized.iter_mut() {
            n.permute(&order);
        }
        alphabet = alphabet.reordered(&order);
        info!("tag order: {}", alphabet);
    }

    rank(&mut normalized);
    if let Some(stats) = cluster_stats(&normalized, CLUSTER_PREFIX) {
        info!(
            "clusters on {} tags: {} runs, median {:.1}, mean {:.2}, max {}",
            CLUSTER_PREFIX, stats.runs, stats.median, stats.mean, stats.max
        );
    }

    let lines = normalized
        .iter()
        .enumerate()
        .map(|(i, n)| build_line(i, n, &alphabet, encoding))
        .collect::<Result<Vec<Line>>>()?;

    let tags = alphabet.tag_defs(encoding)?;
    Ok(Artifact::build(tags, lines, &config.writer_options())?)
}

/// [`compile`] and write the artifact atomically to `path`.
pub fn compile_to_file(
    records: Vec<WordRecord>,
    config: &CompilerConfig,
    path: &Path,
) -> Result<Artifact> {
    let artifact = compile(records, config)?;
    artifact.write_file(path)?;
    info!("wrote {}", path.display());
    Ok(artifact)
}

/// Letter counts followed by length, morphology, topo and nomen.
fn tag_values(n: &Normalized) -> Vec<u32> {
    let r = &n.record;
    let mut values = Vec::with_capacity(n.counts.len() + 4);
    values.extend_from_slice(&n.counts);
    values.push(n.len as u32);
    values.push(r.morph.chars().next().map_or(0, |c| c as u32));
    values.push(if r.is_topo() { 1 } else { 2 });
    values.push(if r.is_nomen() { 1 } else { 2 });
    values
}

fn build_line(
    index: usize,
    n: &Normalized,
    alphabet: &Alphabet,
    encoding: &'static Encoding,
) -> Result<Line> {
    let body = encode_lossy(encoding, &n.record.word);
    Line::from_values(index, &tag_values(n), body).map_err(|e| match e {
        SlvbrError::TagOverflow { tag, value, .. } => CompileError::TagOverflow {
            word: n.record.word.clone(),
            tag: tag_name(alphabet, tag),
            value,
        },
        other => other.into(),
    })
}

fn tag_name(alphabet: &Alphabet, tag: usize) -> String {
    match alphabet.letters().get(tag) {
        Some(c) => c.to_string(),
        None => match tag - alphabet.len() {
            0 => "length",
            1 => "morph",
            2 => "topo",
            _ => "nomen",
        }
        .to_string(),
    }
}
