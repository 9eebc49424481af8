//! Input word records as produced by the dump scrapers and lexicon importers.

use serde::{Deserialize, Deserializer, Serialize};

/// One input word. Unknown JSON fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub word: String,
    /// Morphology class letters, e.g. `"NV"` for a noun that is also a verb.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub morph: String,
    /// Toponym; `None` when the source did not say.
    #[serde(default)]
    pub topo: Option<bool>,
    /// Proper noun.
    #[serde(default)]
    pub nomen: Option<bool>,
    #[serde(default)]
    pub offensive: Option<bool>,
}

impl WordRecord {
    pub fn new(word: &str, morph: &str) -> Self {
        WordRecord {
            word: word.to_string(),
            morph: morph.to_string(),
            topo: Some(false),
            nomen: Some(false),
            offensive: Some(false),
        }
    }

    /// Length in characters of the raw word.
    pub fn char_len(&self) -> usize {
        self.word.chars().count()
    }

    pub fn is_topo(&self) -> bool {
        self.topo.unwrap_or(false)
    }

    pub fn is_nomen(&self) -> bool {
        self.nomen.unwrap_or(false)
    }

    pub fn is_offensive(&self) -> bool {
        self.offensive.unwrap_or(false)
    }
}

fn null_as_empty<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}
