//! Structural reader for slvbr files: headers, Lines, bog bodies and TOC.
//!
//! This does not implement any lookup over the index. It parses the layout,
//! validates every section against Meta and hands out raw slices, which is
//! all that is needed to inspect an artifact or check it after a build.
//!
//! ```no_run
//! use slvbr::SlvbrFile;
//! use std::path::Path;
//!
//! let f = SlvbrFile::open(Path::new("slvbr.db")).expect("open");
//! for i in 0..f.record_count().min(3) {
//!     println!("{:?} {:?}", f.line_tags(i), f.body(i));
//! }
//! ```

use std::{fs, path::Path};

use crate::error::{Result, SlvbrError};
use crate::header::{
    parse_tag_dict, section_in_bounds, Meta, TagDef, BODY_LEN, HEADER_LEN, TAG_LEN,
    TOC_TRAILER_LEN,
};
use crate::line::BogPtr;
use crate::toc::TocEntry;

#[derive(Debug)]
enum Backing {
    Owned(Vec<u8>),
    #[cfg(feature = "mmap")]
    Mmap(memmap2::Mmap),
}

impl Backing {
    fn as_bytes(&self) -> &[u8] {
        match self {
            Backing::Owned(v) => v.as_slice(),
            #[cfg(feature = "mmap")]
            Backing::Mmap(m) => m,
        }
    }
}

/// Opened slvbr file.
#[derive(Debug)]
pub struct SlvbrFile {
    backing: Backing,
    meta: Meta,
    tags: Vec<TagDef>,
}

impl SlvbrFile {
    #[inline]
    fn bytes(&self) -> &[u8] {
        self.backing.as_bytes()
    }

    /// Read and validate a slvbr file from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Validate an in-memory artifact.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let (meta, tags) = validate(&data)?;
        Ok(Self {
            backing: Backing::Owned(data),
            meta,
            tags,
        })
    }

    #[cfg(feature = "mmap")]
    /// Open and validate a slvbr file using `memmap2` for zero-copy access.
    ///
    /// Enabled with the `mmap` feature.
    pub fn open_mmap(path: &Path) -> Result<Self> {
        let f = fs::File::open(path)?;
        let mmap = unsafe { memmap2::MmapOptions::new().map(&f) }?;
        let (meta, tags) = validate(&mmap)?;
        Ok(Self {
            backing: Backing::Mmap(mmap),
            meta,
            tags,
        })
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn tags(&self) -> &[TagDef] {
        &self.tags
    }

    pub fn record_count(&self) -> usize {
        self.meta.record_count as usize
    }

    fn record(&self, i: usize) -> Option<&[u8]> {
        if i >= self.record_count() {
            return None;
        }
        let len = self.meta.record_len as usize;
        let start = self.meta.meta_len as usize + i * len;
        self.bytes().get(start..start + len)
    }

    /// Tag values of line `i`.
    pub fn line_tags(&self, i: usize) -> Option<&[u8]> {
        let tags_len = self.tags.len() * TAG_LEN;
        self.record(i).map(|r| &r[..tags_len])
    }

    /// Bog pointer of line `i`.
    pub fn line_ptr(&self, i: usize) -> Option<BogPtr> {
        let tags_len = self.tags.len() * TAG_LEN;
        self.record(i).map(|r| BogPtr::parse(&r[tags_len..]))
    }

    pub fn bog(&self) -> &[u8] {
        let off = self.meta.bog_off();
        &self.bytes()[off..off + self.meta.bog_len as usize]
    }

    /// Raw body bytes of line `i`, sliced out of the bog.
    pub fn body(&self, i: usize) -> Option<&[u8]> {
        let ptr = self.line_ptr(i)?;
        self.bog().get(ptr.range())
    }

    pub fn toc_count(&self) -> usize {
        self.meta.toc_count as usize
    }

    pub fn toc_entry(&self, i: usize) -> Option<TocEntry> {
        if i >= self.toc_count() {
            return None;
        }
        let len = self.meta.toc_entry_len as usize;
        let start = self.meta.toc_off() + i * len;
        let buf = self.bytes().get(start..start + len)?;
        Some(TocEntry::parse(buf, self.tags.len()))
    }

    pub fn toc_entries(&self) -> impl Iterator<Item = TocEntry> + '_ {
        (0..self.toc_count()).filter_map(move |i| self.toc_entry(i))
    }

    /// Number of TOC entries and the number of lines they cover.
    pub fn count_toc(&self) -> (usize, usize) {
        let mut pages = 0usize;
        let mut records = 0usize;
        for e in self.toc_entries() {
            pages += 1;
            records += e.count as usize;
        }
        (pages, records)
    }

    /// The whole artifact as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes()
    }
}

fn validate(data: &[u8]) -> Result<(Meta, Vec<TagDef>)> {
    let meta = Meta::parse(data)?;
    if meta.meta_len as usize != HEADER_LEN {
        return Err(SlvbrError::Corrupt(format!(
            "header length {} (expected {HEADER_LEN})",
            meta.meta_len
        )));
    }
    if meta.tag_len as usize != TAG_LEN || meta.body_len as usize != BODY_LEN {
        return Err(SlvbrError::Invalid("unsupported tag or body width".into()));
    }
    let tags_len = meta.tags_count as usize * TAG_LEN;
    if meta.record_len as usize != tags_len + BODY_LEN {
        return Err(SlvbrError::Corrupt("record length disagrees with tag count".into()));
    }
    if meta.toc_entry_len as usize != tags_len + TOC_TRAILER_LEN {
        return Err(SlvbrError::Corrupt("toc entry length disagrees with tag count".into()));
    }
    let tags = parse_tag_dict(data, &meta)?;
    for (name, off, len) in [
        ("lines", meta.meta_len as usize, meta.lines_len()),
        ("bog", meta.bog_off(), meta.bog_len as usize),
        ("toc", meta.toc_off(), meta.toc_len()),
    ] {
        if !section_in_bounds(data.len(), off, len) {
            return Err(SlvbrError::Corrupt(format!("section {name} out of bounds")));
        }
    }
    if data.len() != meta.file_len() {
        return Err(SlvbrError::Corrupt(format!(
            "file is {} bytes, header declares {}",
            data.len(),
            meta.file_len()
        )));
    }
    Ok((meta, tags))
}
