use super::models::Entry;
use std::cmp::Ordering;

// One row of a ranking. Ranks start at 1 and are contiguous.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedEntry<'a> {
    pub rank: usize,
    pub entry: &'a Entry,
}

fn ranking_order(a: &Entry, b: &Entry) -> Ordering {
    b.value
        .cmp(&a.value)
        .then_with(|| a.last_updated.total_cmp(&b.last_updated))
}

/*
 * Orders entries by value (highest first), breaking ties by the earlier
 * `last_updated`. `sort_by` is stable, so entries equal in both keys keep their
 * insertion order. The input slice is not modified.
 */
pub fn rank(entries: &[Entry]) -> Vec<RankedEntry<'_>> {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| ranking_order(a, b));
    sorted
        .into_iter()
        .enumerate()
        .map(|(index, entry)| RankedEntry {
            rank: index + 1,
            entry,
        })
        .collect()
}
