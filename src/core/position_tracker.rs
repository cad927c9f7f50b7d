/*
 * Remembers the ranking captured at the last export (or file load) and reports,
 * per entry, how its current rank compares to that baseline. Ordinary edits never
 * capture, so indicators describe movement "since last export" rather than a
 * live delta.
 */
use super::ranker::RankedEntry;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeIndicator {
    Unseen,
    Improved(usize),
    Declined(usize),
    Unchanged,
}

impl fmt::Display for ChangeIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeIndicator::Unseen => write!(f, "⚪ -"),
            ChangeIndicator::Unchanged => write!(f, "⚪ ="),
            ChangeIndicator::Improved(by) => write!(f, "⬆️+{by}"),
            ChangeIndicator::Declined(by) => write!(f, "⬇️-{by}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Baseline {
    #[default]
    Empty,
    Captured(HashMap<String, usize>),
}

#[derive(Debug, Clone, Default)]
pub struct PositionTracker {
    baseline: Baseline,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn has_baseline(&self) -> bool {
        matches!(self.baseline, Baseline::Captured(_))
    }

    /// Replaces any previous baseline with the ranks in `ranking`.
    pub fn capture(&mut self, ranking: &[RankedEntry<'_>]) {
        let positions: HashMap<String, usize> = ranking
            .iter()
            .map(|r| (r.entry.name.clone(), r.rank))
            .collect();
        log::debug!(
            "PositionTracker: Captured baseline of {} positions.",
            positions.len()
        );
        self.baseline = Baseline::Captured(positions);
    }

    pub fn previous_rank(&self, name: &str) -> Option<usize> {
        match &self.baseline {
            Baseline::Empty => None,
            Baseline::Captured(positions) => positions.get(name).copied(),
        }
    }

    pub fn change_indicator(&self, name: &str, current_rank: usize) -> ChangeIndicator {
        match self.previous_rank(name) {
            None => ChangeIndicator::Unseen,
            Some(previous) if current_rank < previous => {
                ChangeIndicator::Improved(previous - current_rank)
            }
            Some(previous) if current_rank > previous => {
                ChangeIndicator::Declined(current_rank - previous)
            }
            Some(_) => ChangeIndicator::Unchanged,
        }
    }
}
