//! Greedy tag-order optimizer.
//!
//! Picks, one at a time, the letter whose non-zero counts split the records
//! still in play into the most distinct groups. Records are taken out of play
//! as soon as a chosen letter occurs in them.

use crate::normalize::Normalized;
use log::debug;
use std::collections::BTreeMap;

/// Returns a permutation of `0..tags`: position `i` of the new order holds
/// old letter ordinal `order[i]`. An empty record set yields the identity.
pub fn best_tag_order(records: &[Normalized], tags: usize) -> Vec<usize> {
    let mut chosen: Vec<usize> = Vec::with_capacity(tags);
    let mut pool: Vec<usize> = (0..tags).collect();
    let mut alive: Vec<&Normalized> = records.iter().collect();

    while !pool.is_empty() && !alive.is_empty() {
        let mut best: Option<(usize, usize, usize)> = None; // (pool idx, buckets, largest)
        for (pi, &tag) in pool.iter().enumerate() {
            let histogram = histogram(&alive, tag);
            if histogram.is_empty() {
                continue;
            }
            let buckets = histogram.len();
            let largest = histogram.values().copied().max().unwrap_or(0);
            let better = match best {
                None => true,
                Some((_, b, l)) => buckets > b || (buckets == b && largest < l),
            };
            if better {
                best = Some((pi, buckets, largest));
            }
        }
        let Some((pi, buckets, largest)) = best else {
            break;
        };
        let tag = pool.remove(pi);
        alive.retain(|r| r.counts[tag] == 0);
        debug!(
            "tag #{tag}: {buckets} buckets, largest {largest}, {} records left",
            alive.len()
        );
        chosen.push(tag);
    }
    chosen.extend(pool);
    chosen
}

// non-zero count -> number of alive records with that count
fn histogram(alive: &[&Normalized], tag: usize) -> BTreeMap<u32, usize> {
    let mut h = BTreeMap::new();
    for r in alive {
        let v = r.counts[tag];
        if v > 0 {
            *h.entry(v).or_insert(0) += 1;
        }
    }
    h
}
