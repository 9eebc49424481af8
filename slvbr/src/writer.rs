//! Assemble and serialize a slvbr artifact.
//!
//! [`Artifact::build`] takes the tag dictionary and the final, already sorted
//! Lines, fills the bog, builds the TOC and derives Meta. [`Artifact::to_bytes`]
//! lays the sections out at their fixed offsets and checks each one against
//! the length Meta declares for it.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::bog::Bog;
use crate::error::{Result, SlvbrError};
use crate::header::{
    fixed_field, header_needed, Meta, TagDef, BODY_LEN, FILL_BYTE, HEADER_LEN, MAGIC_LEN,
    META_LEN, TAG_DEF_LEN, TAG_ID_LEN, TAG_LEN, TAG_TYPE_LEN, VERSION,
};
use crate::line::Line;
use crate::toc::{Toc, DEFAULT_CROP, DEFAULT_PAGE_SIZE};

/// Options controlling artifact emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// Stored in Meta; at most 128 bytes.
    pub title: String,
    /// Text encoding label of the bodies; at most 8 bytes.
    pub encoding: String,
    /// Lines per TOC page before compression.
    pub page_size: usize,
    /// Trailing tag positions ignored when merging TOC entries.
    pub crop: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            title: "slovobor".to_string(),
            encoding: "utf-8".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            crop: DEFAULT_CROP,
        }
    }
}

/// A fully built artifact, ready to be serialized.
#[derive(Debug, Clone)]
pub struct Artifact {
    meta: Meta,
    tags: Vec<TagDef>,
    lines: Vec<Line>,
    bog: Bog,
    toc: Toc,
}

impl Artifact {
    /// Build the bog and the TOC over `lines` and derive Meta.
    ///
    /// `lines` must already be in their final order; the bog is filled by
    /// walking them in reverse and the TOC pages follow their order.
    pub fn build(tags: Vec<TagDef>, mut lines: Vec<Line>, opts: &WriterOptions) -> Result<Self> {
        if lines.is_empty() {
            return Err(SlvbrError::Invalid("refusing to build an artifact with no lines".into()));
        }
        let tags_count = tags.len();
        if let Some((i, l)) = lines
            .iter()
            .enumerate()
            .find(|(_, l)| l.tags_count() != tags_count)
        {
            return Err(SlvbrError::Invalid(format!(
                "line {i} has {} tags, dictionary has {tags_count}",
                l.tags_count()
            )));
        }
        let needed = header_needed(tags_count);
        if needed > HEADER_LEN {
            return Err(SlvbrError::HeaderOverflow {
                needed,
                limit: HEADER_LEN,
            });
        }
        let title = fixed_field(opts.title.as_bytes(), "title")?;
        let encoding = fixed_field(opts.encoding.as_bytes(), "encoding")?;

        let bog = Bog::build(&mut lines)?;
        let toc = Toc::build(&lines, opts.page_size, opts.crop)?;

        let meta = Meta {
            version: VERSION,
            title,
            encoding,
            meta_len: HEADER_LEN as u32,
            record_count: to_u32(lines.len(), "record count")?,
            record_len: to_u32(lines[0].record_len(), "record length")?,
            tags_count: to_u32(tags_count, "tag count")?,
            tag_len: TAG_LEN as u32,
            tag_type_len: TAG_TYPE_LEN as u32,
            tag_value_len: TAG_ID_LEN as u32,
            body_len: BODY_LEN as u32,
            bog_len: to_u32(bog.len(), "bog length")?,
            toc_entry_len: to_u32(toc.entry_len(), "toc entry length")?,
            toc_count: to_u32(toc.len(), "toc count")?,
        };
        Ok(Artifact {
            meta,
            tags,
            lines,
            bog,
            toc,
        })
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn tags(&self) -> &[TagDef] {
        &self.tags
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn bog(&self) -> &Bog {
        &self.bog
    }

    pub fn toc(&self) -> &Toc {
        &self.toc
    }

    /// Serialize every section in order at its fixed offset.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let meta = &self.meta;
        let mut file = Vec::with_capacity(meta.file_len());

        debug!("[1] magic+meta ={}", file.len());
        meta.encode(&mut file);
        check_section("meta", file.len(), MAGIC_LEN + META_LEN)?;

        debug!("[2] tags ={}", file.len());
        let start = file.len();
        for tag in &self.tags {
            tag.encode(&mut file);
        }
        check_section("tags", file.len() - start, self.tags.len() * TAG_DEF_LEN)?;

        if file.len() > meta.meta_len as usize {
            return Err(SlvbrError::HeaderOverflow {
                needed: file.len(),
                limit: meta.meta_len as usize,
            });
        }
        file.resize(meta.meta_len as usize, FILL_BYTE);

        debug!("[3] lines ={}", file.len());
        let start = file.len();
        for line in &self.lines {
            let before = file.len();
            line.encode(&mut file);
            check_section("line", file.len() - before, meta.record_len as usize)?;
        }
        check_section("lines", file.len() - start, meta.lines_len())?;

        debug!("[4] bog ={}", file.len());
        let start = file.len();
        file.extend_from_slice(self.bog.as_bytes());
        check_section("bog", file.len() - start, meta.bog_len as usize)?;

        debug!("[5] toc ={}", file.len());
        let start = file.len();
        for entry in self.toc.entries() {
            entry.encode(&mut file);
        }
        check_section("toc", file.len() - start, meta.toc_len())?;

        check_section("file", file.len(), meta.file_len())?;
        info!(
            "serialized {} lines, bog {} bytes, {} toc entries: {} bytes ({:.1}MB)",
            meta.record_count,
            meta.bog_len,
            meta.toc_count,
            file.len(),
            file.len() as f64 / (1024.0 * 1024.0)
        );
        Ok(file)
    }

    /// Serialize and write atomically: a temporary sibling is renamed over `path`.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = self.to_bytes()?;
        let path = path.as_ref();
        let tmp_path = path.with_extension("slvbr.tmp");
        fs::write(&tmp_path, &file)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

/// Convenience helper: build an [`Artifact`] and write it to `path`.
pub fn write_file<P: AsRef<Path>>(
    path: P,
    tags: Vec<TagDef>,
    lines: Vec<Line>,
    opts: &WriterOptions,
) -> Result<Artifact> {
    let artifact = Artifact::build(tags, lines, opts)?;
    artifact.write_file(path)?;
    Ok(artifact)
}

fn check_section(section: &'static str, written: usize, declared: usize) -> Result<()> {
    if written != declared {
        return Err(SlvbrError::SectionLength {
            section,
            written,
            declared,
        });
    }
    Ok(())
}

fn to_u32(v: usize, what: &str) -> Result<u32> {
    u32::try_from(v).map_err(|_| SlvbrError::Invalid(format!("{what} {v} does not fit in u32")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{TagKind, SYNTHETIC_ID};

    fn defs() -> Vec<TagDef> {
        vec![
            TagDef::new(TagKind::Letter, b"a").unwrap(),
            TagDef::new(TagKind::Letter, b"b").unwrap(),
            TagDef::new(TagKind::Length, SYNTHETIC_ID).unwrap(),
        ]
    }

    fn opts() -> WriterOptions {
        WriterOptions {
            crop: 1,
            ..WriterOptions::default()
        }
    }

    #[test]
    fn lines_start_at_1024_after_fill() {
        let lines = vec![
            Line::new(vec![1, 0, 1], b"a".to_vec()),
            Line::new(vec![1, 1, 2], b"ab".to_vec()),
        ];
        let art = Artifact::build(defs(), lines, &opts()).unwrap();
        let bytes = art.to_bytes().unwrap();
        assert_eq!(&bytes[0..6], b"!slvBR");
        assert_eq!(&bytes[6..8], &[1, 0]);
        let dict_end = header_needed(3);
        assert!(bytes[dict_end..HEADER_LEN].iter().all(|&b| b == FILL_BYTE));
        // first line: tags then pointer
        assert_eq!(&bytes[HEADER_LEN..HEADER_LEN + 3], &[1, 0, 1]);
        assert_eq!(bytes.len(), art.meta().file_len());
    }

    #[test]
    fn mismatched_tag_count_is_rejected() {
        let lines = vec![Line::new(vec![1, 0], b"a".to_vec())];
        assert!(Artifact::build(defs(), lines, &opts()).is_err());
    }

    #[test]
    fn empty_lines_are_rejected() {
        assert!(Artifact::build(defs(), Vec::new(), &opts()).is_err());
    }

    #[test]
    fn too_many_tags_overflow_the_header() {
        let tags: Vec<TagDef> = (0..140)
            .map(|_| TagDef::new(TagKind::Letter, b"x").unwrap())
            .collect();
        let lines = vec![Line::new(vec![0; 140], b"x".to_vec())];
        match Artifact::build(tags, lines, &WriterOptions::default()) {
            Err(SlvbrError::HeaderOverflow { .. }) => {}
            other => panic!("expected header overflow, got {other:?}"),
        }
    }

    #[test]
    fn long_encoding_label_is_rejected() {
        let lines = vec![Line::new(vec![1, 0, 1], b"a".to_vec())];
        let o = WriterOptions {
            encoding: "windows-1251".into(),
            ..opts()
        };
        assert!(Artifact::build(defs(), lines, &o).is_err());
    }

    #[test]
    fn section_check_reports_mismatch() {
        match check_section("bog", 3, 4) {
            Err(SlvbrError::SectionLength {
                section,
                written,
                declared,
            }) => assert_eq!((section, written, declared), ("bog", 3, 4)),
            other => panic!("unexpected {other:?}"),
        }
    }
}
