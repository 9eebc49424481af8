//! Magic, Meta and the tag dictionary: the fixed header region of a slvbr file.
//!
//! ```text
//! 0     MAGIC   "!slvBR" + u16 version
//! 8     META    title[128] encoding[8] + 11 × u32
//! 188   TAGS    tags_count × (u16 kind, id[4])
//! ...   0xEE fill
//! 1024  LINES
//! ```

use crate::error::{Result, SlvbrError};

pub const MAGIC: &[u8; 6] = b"!slvBR";
pub const VERSION: u16 = 0x0001;
pub const MAGIC_LEN: usize = 8;

pub const TITLE_LEN: usize = 128;
pub const ENCODING_LEN: usize = 8;
/// Title, encoding and the eleven u32 counters.
pub const META_LEN: usize = TITLE_LEN + ENCODING_LEN + 11 * 4;

/// Lines start here; Magic, Meta and the tag dictionary must fit before it.
pub const HEADER_LEN: usize = 1024;
/// Sentinel written between the tag dictionary and the Lines.
pub const FILL_BYTE: u8 = 0xEE;

/// Width of one tag value inside a Line (format version 1).
pub const TAG_LEN: usize = 1;
pub const TAG_TYPE_LEN: usize = 2;
pub const TAG_ID_LEN: usize = 4;
pub const TAG_DEF_LEN: usize = TAG_TYPE_LEN + TAG_ID_LEN;
/// Bog pointer stored in every Line: u32 offset + u32 length.
pub const BODY_LEN: usize = 8;
/// Trailer of a TOC entry: u32 start_index + u32 count.
pub const TOC_TRAILER_LEN: usize = 8;

/// Id carried by every synthetic tag.
pub const SYNTHETIC_ID: &[u8] = b"~";

/// Kind of a tag, stored as `u16` in the tag dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TagKind {
    /// Occurrence count of one letter.
    Letter = 0,
    /// Word length in characters.
    Length = 1,
    /// Code point of the first morphology class letter.
    Morph = 2,
    /// Tri-state flag: 1 = set, 2 = not set.
    Flag = 3,
}

impl TagKind {
    /// Convert a little-endian `u16` value into a kind, if recognized.
    pub fn from_u16(v: u16) -> Option<Self> {
        use TagKind::*;
        Some(match v {
            0 => Letter,
            1 => Length,
            2 => Morph,
            3 => Flag,
            _ => return None,
        })
    }
}

/// One entry of the tag dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDef {
    pub kind: TagKind,
    pub id: [u8; TAG_ID_LEN],
}

impl TagDef {
    /// Build a definition from already-encoded id bytes (NUL padded).
    pub fn new(kind: TagKind, id: &[u8]) -> Result<Self> {
        Ok(TagDef {
            kind,
            id: fixed_field(id, "tag id")?,
        })
    }

    /// Id bytes without the NUL padding.
    pub fn id_bytes(&self) -> &[u8] {
        trim_nul(&self.id)
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.kind as u16).to_le_bytes());
        out.extend_from_slice(&self.id);
    }

    fn parse(buf: &[u8]) -> Option<Self> {
        let kind = TagKind::from_u16(u16::from_le_bytes([buf[0], buf[1]]))?;
        let mut id = [0u8; TAG_ID_LEN];
        id.copy_from_slice(&buf[TAG_TYPE_LEN..TAG_DEF_LEN]);
        Some(TagDef { kind, id })
    }
}

/// Parsed (or to-be-written) Meta header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta {
    pub version: u16,
    pub title: [u8; TITLE_LEN],
    pub encoding: [u8; ENCODING_LEN],
    pub meta_len: u32,
    pub record_count: u32,
    pub record_len: u32,
    pub tags_count: u32,
    pub tag_len: u32,
    pub tag_type_len: u32,
    pub tag_value_len: u32,
    pub body_len: u32,
    pub bog_len: u32,
    pub toc_entry_len: u32,
    pub toc_count: u32,
}

impl Meta {
    /// Write Magic followed by Meta.
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.title);
        out.extend_from_slice(&self.encoding);
        for v in [
            self.meta_len,
            self.record_count,
            self.record_len,
            self.tags_count,
            self.tag_len,
            self.tag_type_len,
            self.tag_value_len,
            self.body_len,
            self.bog_len,
            self.toc_entry_len,
            self.toc_count,
        ] {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    /// Parse Magic and Meta from the first bytes of `buf`.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < MAGIC_LEN + META_LEN {
            return Err(SlvbrError::Invalid("short or invalid header".into()));
        }
        if &buf[0..6] != MAGIC {
            return Err(SlvbrError::Invalid("bad magic".into()));
        }
        let version = u16::from_le_bytes([buf[6], buf[7]]);
        if version != VERSION {
            return Err(SlvbrError::Invalid(format!(
                "unsupported format version {version:#06x}"
            )));
        }
        let mut title = [0u8; TITLE_LEN];
        title.copy_from_slice(&buf[MAGIC_LEN..MAGIC_LEN + TITLE_LEN]);
        let enc_off = MAGIC_LEN + TITLE_LEN;
        let mut encoding = [0u8; ENCODING_LEN];
        encoding.copy_from_slice(&buf[enc_off..enc_off + ENCODING_LEN]);

        let base = enc_off + ENCODING_LEN;
        let field = |i: usize| read_u32(buf, base + i * 4);
        Ok(Meta {
            version,
            title,
            encoding,
            meta_len: field(0),
            record_count: field(1),
            record_len: field(2),
            tags_count: field(3),
            tag_len: field(4),
            tag_type_len: field(5),
            tag_value_len: field(6),
            body_len: field(7),
            bog_len: field(8),
            toc_entry_len: field(9),
            toc_count: field(10),
        })
    }

    pub fn title_str(&self) -> String {
        String::from_utf8_lossy(trim_nul(&self.title)).into_owned()
    }

    pub fn encoding_str(&self) -> String {
        String::from_utf8_lossy(trim_nul(&self.encoding)).into_owned()
    }

    /// Byte length of the Lines section.
    pub fn lines_len(&self) -> usize {
        self.record_count as usize * self.record_len as usize
    }

    /// Byte length of the TOC section.
    pub fn toc_len(&self) -> usize {
        self.toc_count as usize * self.toc_entry_len as usize
    }

    /// Offset of the Bog section.
    pub fn bog_off(&self) -> usize {
        self.meta_len as usize + self.lines_len()
    }

    /// Offset of the TOC section.
    pub fn toc_off(&self) -> usize {
        self.bog_off() + self.bog_len as usize
    }

    /// Total file length implied by the header.
    pub fn file_len(&self) -> usize {
        self.toc_off() + self.toc_len()
    }
}

/// Bytes needed by Magic, Meta and a tag dictionary of `tags_count` entries.
pub fn header_needed(tags_count: usize) -> usize {
    MAGIC_LEN + META_LEN + tags_count * TAG_DEF_LEN
}

/// Parse the tag dictionary that follows Meta.
pub fn parse_tag_dict(buf: &[u8], meta: &Meta) -> Result<Vec<TagDef>> {
    if meta.tag_type_len as usize != TAG_TYPE_LEN || meta.tag_value_len as usize != TAG_ID_LEN {
        return Err(SlvbrError::Invalid("unsupported tag dictionary widths".into()));
    }
    let n = meta.tags_count as usize;
    let start = MAGIC_LEN + META_LEN;
    let end = header_needed(n);
    if end > buf.len() || end > meta.meta_len as usize {
        return Err(SlvbrError::Corrupt("tag dictionary out of bounds".into()));
    }
    buf[start..end]
        .chunks_exact(TAG_DEF_LEN)
        .enumerate()
        .map(|(i, chunk)| {
            TagDef::parse(chunk).ok_or_else(|| SlvbrError::Corrupt(format!("unknown kind of tag {i}")))
        })
        .collect()
}

/// True if `len` bytes at `off` lie entirely within a buffer of `buf_len` bytes.
pub fn section_in_bounds(buf_len: usize, off: usize, len: usize) -> bool {
    off <= buf_len && off.saturating_add(len) <= buf_len
}

/// Copy `src` into a NUL padded fixed field; longer input is rejected.
pub fn fixed_field<const N: usize>(src: &[u8], what: &str) -> Result<[u8; N]> {
    if src.len() > N {
        return Err(SlvbrError::Invalid(format!(
            "{what} is {} bytes, field holds {N}",
            src.len()
        )));
    }
    let mut out = [0u8; N];
    out[..src.len()].copy_from_slice(src);
    Ok(out)
}

pub(crate) fn read_u32(buf: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
}

fn trim_nul(b: &[u8]) -> &[u8] {
    let end = b.iter().rposition(|&c| c != 0).map_or(0, |p| p + 1);
    &b[..end]
}
