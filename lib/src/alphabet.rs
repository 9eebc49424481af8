//! The letter set that becomes the per-record letter tags.
//!
//! Every record's tag vector uses the same ordinal positions: letter tags in
//! alphabet order, then the synthetic length, morphology, topo and nomen tags.

use crate::errors::{CompileError, Result};
use crate::text::encode_lossy;
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use slvbr::header::SYNTHETIC_ID;
use slvbr::{TagDef, TagKind};
use std::fmt;

/// Number of synthetic tags appended after the letters.
pub const SYNTHETIC_TAGS: usize = 4;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlphabetSource {
    /// Letters in the given order.
    Explicit(String),
    /// Exemplar letters of a locale (`ru`, `ru_RU`, `de-AT`, ...).
    Locale(String),
}

impl fmt::Display for AlphabetSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AlphabetSource::Explicit(s) => write!(f, "explicit {:?}", s),
            AlphabetSource::Locale(l) => write!(f, "locale {}", l),
        }
    }
}

// Main exemplar sets (lower case, single characters only).
const EXEMPLARS: &[(&str, &str)] = &[
    ("be", "абвгдеёжзійклмнопрстуўфхцчшыьэюя"),
    ("bg", "абвгдежзийклмнопрстуфхцчшщъьюя"),
    ("de", "abcdefghijklmnopqrstuvwxyzßäöü"),
    ("en", "abcdefghijklmnopqrstuvwxyz"),
    ("es", "abcdefghijklmnñopqrstuvwxyzáéíóúü"),
    ("fr", "abcdefghijklmnopqrstuvwxyzàâæçéèêëîïôœùûüÿ"),
    ("it", "abcdefghijklmnopqrstuvwxyzàèéìòóù"),
    ("pl", "aąbcćdeęfghijklłmnńoóprsśtuwyzźż"),
    ("ru", "абвгдеёжзийклмнопрстуфхцчшщъыьэюя"),
    ("uk", "ʼабвгґдеєжзиіїйклмнопрстуфхцчшщьюя"),
];

/// Ordered, duplicate-free letter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    letters: Vec<char>,
}

impl Alphabet {
    /// Resolve a source into letters. Fails on unknown locales and empty sets.
    pub fn resolve(source: &AlphabetSource) -> Result<Self> {
        let letters: Vec<char> = match source {
            AlphabetSource::Explicit(s) => {
                let mut seen = Vec::new();
                for c in s.chars() {
                    if !seen.contains(&c) {
                        seen.push(c);
                    }
                }
                seen
            }
            AlphabetSource::Locale(tag) => {
                let exemplar = locale_exemplar(tag).ok_or_else(|| {
                    CompileError::Config(format!("cannot resolve alphabet for locale {tag:?}"))
                })?;
                let mut letters: Vec<char> = exemplar.chars().collect();
                letters.sort_unstable();
                letters.dedup();
                letters
            }
        };
        if letters.is_empty() {
            return Err(CompileError::Config("alphabet is empty".into()));
        }
        Ok(Alphabet { letters })
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn position(&self, c: char) -> Option<usize> {
        self.letters.iter().position(|&l| l == c)
    }

    pub fn contains(&self, c: char) -> bool {
        self.letters.contains(&c)
    }

    /// Letters rearranged so that new position `i` holds old position `order[i]`.
    pub fn reordered(&self, order: &[usize]) -> Self {
        Alphabet {
            letters: order.iter().map(|&i| self.letters[i]).collect(),
        }
    }

    /// Total tags per line: letters plus the synthetic ones.
    pub fn tags_count(&self) -> usize {
        self.letters.len() + SYNTHETIC_TAGS
    }

    /// The tag dictionary for this alphabet.
    pub fn tag_defs(&self, encoding: &'static Encoding) -> Result<Vec<TagDef>> {
        let mut defs = Vec::with_capacity(self.tags_count());
        let mut buf = [0u8; 4];
        for &c in &self.letters {
            let id = encode_lossy(encoding, c.encode_utf8(&mut buf));
            if id.is_empty() {
                return Err(CompileError::Config(format!(
                    "letter {c:?} cannot be encoded as {}",
                    encoding.name()
                )));
            }
            defs.push(TagDef::new(TagKind::Letter, &id)?);
        }
        for kind in [TagKind::Length, TagKind::Morph, TagKind::Flag, TagKind::Flag] {
            defs.push(TagDef::new(kind, SYNTHETIC_ID)?);
        }
        Ok(defs)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for c in &self.letters {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

fn locale_exemplar(tag: &str) -> Option<&'static str> {
    let lang = tag
        .split(['_', '-', '.'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    EXEMPLARS
        .iter()
        .find(|(l, _)| *l == lang)
        .map(|(_, letters)| *letters)
}
