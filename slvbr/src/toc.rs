//! Page-level lower-bound index over the sorted Lines.
//!
//! Lines are cut into fixed-size pages and each page gets the elementwise
//! minimum of its tag vectors. Neighbouring entries that agree on every
//! position except the trailing `crop` ones are then merged, so a run of
//! letter-identical records costs a single entry.

use log::info;

use crate::error::{Result, SlvbrError};
use crate::header::{read_u32, TAG_LEN, TOC_TRAILER_LEN};
use crate::line::Line;

pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Length, morphology, topo and nomen.
pub const DEFAULT_CROP: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Lower bound of every tag over the covered lines.
    pub min: Vec<u8>,
    pub start: u32,
    pub count: u32,
}

impl TocEntry {
    /// Range of line indexes covered by this entry.
    pub fn lines(&self) -> std::ops::Range<usize> {
        let start = self.start as usize;
        start..start + self.count as usize
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.min);
        out.extend_from_slice(&self.start.to_le_bytes());
        out.extend_from_slice(&self.count.to_le_bytes());
    }

    pub fn parse(buf: &[u8], tags_count: usize) -> Self {
        let tags_len = tags_count * TAG_LEN;
        TocEntry {
            min: buf[..tags_len].to_vec(),
            start: read_u32(buf, tags_len),
            count: read_u32(buf, tags_len + 4),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Toc {
    entries: Vec<TocEntry>,
    tags_count: usize,
}

impl Toc {
    /// Paginate `lines` and compress the result.
    pub fn build(lines: &[Line], page_size: usize, crop: usize) -> Result<Self> {
        let tags_count = lines.first().map_or(0, Line::tags_count);
        if crop > tags_count {
            return Err(SlvbrError::Invalid(format!(
                "toc crop {crop} exceeds tag count {tags_count}"
            )));
        }
        let pages = paginate(lines, page_size)?;
        info!(
            "paged {} lines into {} toc entries (distinct={})",
            lines.len(),
            pages.len(),
            distinct_prefixes(&pages, crop)
        );
        let entries = compress(pages, crop);
        info!(
            "compressed toc to {} entries (distinct={}, largest={})",
            entries.len(),
            distinct_prefixes(&entries, crop),
            entries.iter().map(|e| e.count).max().unwrap_or(0)
        );
        Ok(Toc {
            entries,
            tags_count,
        })
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialized size of one entry.
    pub fn entry_len(&self) -> usize {
        self.tags_count * TAG_LEN + TOC_TRAILER_LEN
    }
}

/// One entry per `page_size` consecutive lines; the last page may be short.
pub fn paginate(lines: &[Line], page_size: usize) -> Result<Vec<TocEntry>> {
    if page_size == 0 {
        return Err(SlvbrError::Invalid("toc page size must be positive".into()));
    }
    let mut out = Vec::with_capacity(lines.len().div_ceil(page_size));
    let mut start = 0usize;
    for page in lines.chunks(page_size) {
        let mut min = page[0].tags.clone();
        for line in &page[1..] {
            if line.tags.len() != min.len() {
                return Err(SlvbrError::Invalid(format!(
                    "line {} has {} tags, expected {}",
                    start,
                    line.tags.len(),
                    min.len()
                )));
            }
            min_in_place(&mut min, &line.tags);
        }
        out.push(TocEntry {
            min,
            start: to_u32(start)?,
            count: to_u32(page.len())?,
        });
        start += page.len();
    }
    Ok(out)
}

/// Merge each entry into the previous one when both agree outside the last
/// `crop` positions. The merged entry keeps the earlier start, sums the counts
/// and takes the elementwise minimum, so it still bounds every covered line.
pub fn compress(entries: Vec<TocEntry>, crop: usize) -> Vec<TocEntry> {
    let mut out: Vec<TocEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match out.last_mut() {
            Some(prev) if cropped(&prev.min, crop) == cropped(&entry.min, crop) => {
                prev.count += entry.count;
                min_in_place(&mut prev.min, &entry.min);
            }
            _ => out.push(entry),
        }
    }
    out
}

fn cropped(v: &[u8], crop: usize) -> &[u8] {
    &v[..v.len().saturating_sub(crop)]
}

fn min_in_place(acc: &mut [u8], other: &[u8]) {
    for (a, b) in acc.iter_mut().zip(other) {
        *a = (*a).min(*b);
    }
}

fn distinct_prefixes(entries: &[TocEntry], crop: usize) -> usize {
    let set: std::collections::BTreeSet<&[u8]> =
        entries.iter().map(|e| cropped(&e.min, crop)).collect();
    set.len()
}

fn to_u32(v: usize) -> Result<u32> {
    u32::try_from(v).map_err(|_| SlvbrError::Invalid(format!("{v} does not fit in u32")))
}
