//! The bog: one byte buffer holding every word body at most once (best effort).
//!
//! Bodies are added in reverse line order. Each body is first searched for in
//! the bytes accumulated so far; a hit reuses that region, a miss appends the
//! body at the end. Only literal repeats and accidental substring overlaps are
//! merged, so the result depends on insertion order.

use log::info;
use memchr::memmem;

use crate::error::{Result, SlvbrError};
use crate::line::{BogPtr, Line};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BogStats {
    /// Bodies appended to the buffer.
    pub misses: usize,
    /// Bodies found inside already appended bytes.
    pub hits: usize,
}

#[derive(Debug, Default, Clone)]
pub struct Bog {
    buf: Vec<u8>,
    stats: BogStats,
}

impl Bog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `body` and return where it lives.
    // Unbounded search over the whole buffer: quadratic in the worst case.
    pub fn add(&mut self, body: &[u8]) -> Result<BogPtr> {
        let length = u32::try_from(body.len()).map_err(|_| SlvbrError::BogOverflow(body.len()))?;
        let offset = match memmem::find(&self.buf, body) {
            Some(found) => {
                self.stats.hits += 1;
                found
            }
            None => {
                self.stats.misses += 1;
                let pos = self.buf.len();
                self.buf.extend_from_slice(body);
                if self.buf.len() > u32::MAX as usize {
                    return Err(SlvbrError::BogOverflow(self.buf.len()));
                }
                pos
            }
        };
        Ok(BogPtr {
            offset: offset as u32,
            length,
        })
    }

    /// Fill the bog from `lines` (walked in reverse) and set each line's pointer.
    pub fn build(lines: &mut [Line]) -> Result<Self> {
        info!("bogging {} bodies", lines.len());
        let mut bog = Bog::new();
        for line in lines.iter_mut().rev() {
            line.ptr = bog.add(&line.body)?;
        }
        info!(
            "bogged misses={} hits={} len={}",
            bog.stats.misses,
            bog.stats.hits,
            bog.len()
        );
        Ok(bog)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn stats(&self) -> BogStats {
        self.stats
    }

    /// Bytes addressed by `ptr`, if in bounds.
    pub fn get(&self, ptr: BogPtr) -> Option<&[u8]> {
        self.buf.get(ptr.range())
    }
}
