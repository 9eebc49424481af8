//! One compiled record: tag values plus a pointer into the bog.

use crate::error::{Result, SlvbrError};
use crate::header::{BODY_LEN, TAG_LEN};

/// Location of a body inside the bog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BogPtr {
    pub offset: u32,
    pub length: u32,
}

impl BogPtr {
    pub fn encode(&self) -> [u8; BODY_LEN] {
        let mut out = [0u8; BODY_LEN];
        out[0..4].copy_from_slice(&self.offset.to_le_bytes());
        out[4..8].copy_from_slice(&self.length.to_le_bytes());
        out
    }

    pub fn parse(buf: &[u8]) -> Self {
        BogPtr {
            offset: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            length: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        }
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset as usize;
        start..start + self.length as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// One value per tag, in tag dictionary order.
    pub tags: Vec<u8>,
    /// Raw word bytes; stored only in the bog.
    pub body: Vec<u8>,
    /// Filled in when the bog is built.
    pub ptr: BogPtr,
}

impl Line {
    pub fn new(tags: Vec<u8>, body: Vec<u8>) -> Self {
        Line {
            tags,
            body,
            ptr: BogPtr::default(),
        }
    }

    /// Narrow wide tag values to the one-byte tag width.
    ///
    /// `index` is only used to report which line overflowed. Values are never
    /// truncated: a value above 255 fails the whole build.
    pub fn from_values(index: usize, values: &[u32], body: Vec<u8>) -> Result<Self> {
        let tags = values
            .iter()
            .enumerate()
            .map(|(t, &v)| {
                u8::try_from(v).map_err(|_| SlvbrError::TagOverflow {
                    line: index,
                    tag: t,
                    value: v,
                    width: TAG_LEN as u32,
                })
            })
            .collect::<Result<Vec<u8>>>()?;
        Ok(Line::new(tags, body))
    }

    pub fn tags_count(&self) -> usize {
        self.tags.len()
    }

    /// Serialized size: tag bytes followed by the bog pointer.
    pub fn record_len(&self) -> usize {
        self.tags.len() * TAG_LEN + BODY_LEN
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.tags);
        out.extend_from_slice(&self.ptr.encode());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflowing_value_is_rejected() {
        let err = Line::from_values(7, &[1, 256, 0], b"x".to_vec()).unwrap_err();
        match err {
            SlvbrError::TagOverflow { line, tag, value, .. } => {
                assert_eq!((line, tag, value), (7, 1, 256));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn encodes_tags_then_pointer() {
        let mut line = Line::from_values(0, &[1, 255], b"ab".to_vec()).unwrap();
        line.ptr = BogPtr {
            offset: 3,
            length: 2,
        };
        let mut out = Vec::new();
        line.encode(&mut out);
        assert_eq!(out, vec![1, 255, 3, 0, 0, 0, 2, 0, 0, 0]);
        assert_eq!(out.len(), line.record_len());
    }
}
