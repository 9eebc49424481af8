//! Ranking: sort records so that similar letter profiles end up adjacent.

use crate::normalize::Normalized;

/// Letter counts in tag order followed by the word length.
pub fn ranking_key(n: &Normalized) -> Vec<u32> {
    let mut key = Vec::with_capacity(n.counts.len() + 1);
    key.extend_from_slice(&n.counts);
    key.push(n.len as u32);
    key
}

/// Stable ascending sort by [`ranking_key`]; equal keys keep input order.
pub fn rank(records: &mut [Normalized]) {
    records.sort_by_cached_key(ranking_key);
}

/// Run lengths of records that share their first ranking-key positions.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterStats {
    pub runs: usize,
    pub max: usize,
    pub mean: f64,
    pub median: f64,
}

/// How well records cluster on the first `prefix` tags. `None` for no records.
pub fn cluster_stats(records: &[Normalized], prefix: usize) -> Option<ClusterStats> {
    let mut sizes: Vec<usize> = Vec::new();
    let mut current: Option<&[u32]> = None;
    for r in records {
        let head = &r.counts[..prefix.min(r.counts.len())];
        match current {
            Some(c) if c == head => {
                if let Some(last) = sizes.last_mut() {
                    *last += 1;
                }
            }
            _ => {
                current = Some(head);
                sizes.push(1);
            }
        }
    }
    if sizes.is_empty() {
        return None;
    }
    let runs = sizes.len();
    let max = sizes.iter().copied().max().unwrap_or(0);
    let mean = sizes.iter().sum::<usize>() as f64 / runs as f64;
    sizes.sort_unstable();
    let median = if runs % 2 == 1 {
        sizes[runs / 2] as f64
    } else {
        (sizes[runs / 2 - 1] + sizes[runs / 2]) as f64 / 2.0
    };
    Some(ClusterStats {
        runs,
        max,
        mean,
        median,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::WordRecord;

    fn n(word: &str, counts: &[u32]) -> Normalized {
        Normalized {
            record: WordRecord::new(word, "N"),
            counts: counts.to_vec(),
            len: word.chars().count(),
        }
    }

    #[test]
    fn sorts_by_counts_then_length() {
        let mut rs = vec![n("bb", &[0, 2]), n("ab", &[1, 1]), n("a", &[1, 0]), n("aax", &[2, 0])];
        rank(&mut rs);
        let words: Vec<&str> = rs.iter().map(|r| r.record.word.as_str()).collect();
        assert_eq!(words, vec!["bb", "a", "ab", "aax"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let mut rs = vec![n("ток", &[1, 1, 1]), n("кот", &[1, 1, 1]), n("кто", &[1, 1, 1])];
        rank(&mut rs);
        let words: Vec<&str> = rs.iter().map(|r| r.record.word.as_str()).collect();
        assert_eq!(words, vec!["ток", "кот", "кто"]);
    }

    #[test]
    fn length_breaks_count_ties() {
        let mut rs = vec![n("a-b", &[1, 1]), n("ab", &[1, 1])];
        rank(&mut rs);
        assert_eq!(rs[0].record.word, "ab");
    }

    #[test]
    fn cluster_stats_over_runs() {
        let rs = vec![
            n("a", &[1, 0]),
            n("ab", &[1, 1]),
            n("ab2", &[1, 1]),
            n("b", &[0, 1]),
        ];
        let s = cluster_stats(&rs, 1).unwrap();
        assert_eq!(s.runs, 2);
        assert_eq!(s.max, 3);
        assert_eq!(s.median, 2.0);
        assert!(cluster_stats(&[], 8).is_none());
    }
}
