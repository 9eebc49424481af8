//! Record filtering and per-letter counting.

use crate::alphabet::Alphabet;
use crate::config::CompilerConfig;
use crate::record::WordRecord;
use log::{debug, warn};
use std::collections::HashMap;

/// A record that survived filtering, with its letter counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub record: WordRecord,
    /// One count per alphabet position.
    pub counts: Vec<u32>,
    /// Raw word length in characters.
    pub len: usize,
}

impl Normalized {
    /// Rearrange counts so that position `i` holds old position `order[i]`.
    pub fn permute(&mut self, order: &[usize]) {
        self.counts = order.iter().map(|&i| self.counts[i]).collect();
    }
}

/// Length, morphology, topo and nomen filters. Records failing them are
/// dropped without any diagnostic.
pub fn passes_filters(record: &WordRecord, config: &CompilerConfig) -> bool {
    if let Some(accepted) = &config.morph {
        if !record.morph.chars().any(|c| accepted.contains(c)) {
            return false;
        }
    }
    if record.char_len() < config.min_length {
        return false;
    }
    if config.exclude_topo && record.is_topo() {
        return false;
    }
    if config.exclude_nomen && record.is_nomen() {
        return false;
    }
    if config.exclude_offensive && record.is_offensive() {
        return false;
    }
    true
}

/// Counts letters of one record.
pub struct Normalizer<'a> {
    alphabet: &'a Alphabet,
    positions: HashMap<char, usize>,
    case_sensitive: bool,
    alpha_only: bool,
}

impl<'a> Normalizer<'a> {
    pub fn new(alphabet: &'a Alphabet, config: &CompilerConfig) -> Self {
        let positions = alphabet
            .letters()
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i))
            .collect();
        Normalizer {
            alphabet,
            positions,
            case_sensitive: config.case_sensitive,
            alpha_only: config.alpha_only,
        }
    }

    /// The characters of `word` that take part in counting.
    pub fn filtered(&self, word: &str) -> Vec<char> {
        let word = if self.case_sensitive {
            word.to_string()
        } else {
            word.to_lowercase()
        };
        word.chars()
            .filter(|c| self.positions.contains_key(c))
            .filter(|c| !self.alpha_only || c.is_alphabetic())
            .collect()
    }

    pub fn normalize(&self, record: WordRecord) -> Normalized {
        let filtered = self.filtered(&record.word);
        let mut counts = vec![0u32; self.alphabet.len()];
        for c in &filtered {
            if let Some(&i) = self.positions.get(c) {
                counts[i] += 1;
            }
        }
        let total: u32 = counts.iter().sum();
        if total as usize != filtered.len() {
            warn!(
                "letter counts of {:?} sum to {} but {} letters were kept",
                record.word,
                total,
                filtered.len()
            );
        }
        let len = record.char_len();
        Normalized {
            record,
            counts,
            len,
        }
    }
}

/// Filter `records` and count letters of the survivors, keeping input order.
pub fn normalize_all(
    records: Vec<WordRecord>,
    alphabet: &Alphabet,
    config: &CompilerConfig,
) -> Vec<Normalized> {
    let read = records.len();
    let normalizer = Normalizer::new(alphabet, config);
    let out: Vec<Normalized> = records
        .into_iter()
        .filter(|r| passes_filters(r, config))
        .map(|r| normalizer.normalize(r))
        .collect();
    debug!("dropped {} of {} records by filters", read - out.len(), read);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::AlphabetSource;

    fn cfg(alphabet: &str) -> crate::config::CompilerConfigBuilder {
        let mut b = CompilerConfig::builder();
        b.alphabet(AlphabetSource::Explicit(alphabet.into()));
        b
    }

    fn alphabet(s: &str) -> Alphabet {
        Alphabet::resolve(&AlphabetSource::Explicit(s.into())).unwrap()
    }

    #[test]
    fn counts_lowercased_alphabet_letters() {
        let c = cfg("кот").build().unwrap();
        let a = alphabet("кот");
        let n = Normalizer::new(&a, &c).normalize(WordRecord::new("Котик", "N"));
        assert_eq!(n.counts, vec![2, 1, 1]);
        assert_eq!(n.len, 5);
    }

    #[test]
    fn case_sensitive_skips_upper_case() {
        let c = cfg("кот").case_sensitive(true).build().unwrap();
        let a = alphabet("кот");
        let n = Normalizer::new(&a, &c).normalize(WordRecord::new("Кот", "N"));
        assert_eq!(n.counts, vec![0, 1, 1]);
    }

    #[test]
    fn alpha_only_drops_listed_punctuation() {
        let a = alphabet("ab-");
        let loose = cfg("ab-").build().unwrap();
        let strict = cfg("ab-").alpha_only(true).build().unwrap();
        let word = "a-b";
        assert_eq!(Normalizer::new(&a, &loose).filtered(word), vec!['a', '-', 'b']);
        assert_eq!(Normalizer::new(&a, &strict).filtered(word), vec!['a', 'b']);
    }

    #[test]
    fn filters_drop_records() {
        let c = cfg("abc")
            .morph("NV")
            .min_length(3)
            .exclude_topo(true)
            .exclude_nomen(true)
            .exclude_offensive(true)
            .build()
            .unwrap();
        assert!(passes_filters(&WordRecord::new("abc", "AN"), &c));
        assert!(!passes_filters(&WordRecord::new("abc", "A"), &c));
        assert!(!passes_filters(&WordRecord::new("ab", "N"), &c));
        let mut topo = WordRecord::new("abc", "N");
        topo.topo = Some(true);
        assert!(!passes_filters(&topo, &c));
        let mut nomen = WordRecord::new("abc", "N");
        nomen.nomen = Some(true);
        assert!(!passes_filters(&nomen, &c));
        let mut rude = WordRecord::new("abc", "N");
        rude.offensive = Some(true);
        assert!(!passes_filters(&rude, &c));
        // unknown flags count as not set
        let mut unknown = WordRecord::new("abc", "N");
        unknown.topo = None;
        assert!(passes_filters(&unknown, &c));
    }

    #[test]
    fn normalize_all_keeps_input_order() {
        let c = cfg("ab").min_length(2).build().unwrap();
        let a = alphabet("ab");
        let recs = vec![
            WordRecord::new("ba", "N"),
            WordRecord::new("a", "N"),
            WordRecord::new("ab", "N"),
        ];
        let out = normalize_all(recs, &a, &c);
        let words: Vec<&str> = out.iter().map(|n| n.record.word.as_str()).collect();
        assert_eq!(words, vec!["ba", "ab"]);
    }

    #[test]
    fn permute_follows_order() {
        let c = cfg("abc").build().unwrap();
        let a = alphabet("abc");
        let mut n = Normalizer::new(&a, &c).normalize(WordRecord::new("aabbbc", "N"));
        n.permute(&[2, 0, 1]);
        assert_eq!(n.counts, vec![1, 2, 3]);
    }
}
