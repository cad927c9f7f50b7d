use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const DEFAULT_TITLE: &str = "New Tally List";

// A named point counter. `last_updated` is fractional Unix seconds and is
// refreshed on every value change; it breaks ties when ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub value: i64,
    pub last_updated: f64,
}

impl Entry {
    /// Creates an entry stamped with the current time.
    pub fn new(name: String, value: i64) -> Self {
        Entry {
            name,
            value,
            last_updated: current_timestamp(),
        }
    }
}

// The persisted document: a title and the entries in insertion order.
// Unknown fields in a loaded document are ignored by serde (no deny_unknown_fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyList {
    pub title: String,
    pub entries: Vec<Entry>,
}

impl TallyList {
    pub fn new(title: String) -> Self {
        TallyList {
            title,
            entries: Vec::new(),
        }
    }
}

impl Default for TallyList {
    fn default() -> Self {
        TallyList::new(DEFAULT_TITLE.to_string())
    }
}

/*
 * Returns the current wall-clock time as fractional seconds since the Unix epoch.
 * An f64 at today's epoch offsets resolves only a few hundred nanoseconds, so two
 * quick mutations can share a timestamp; the ranking's stable sort orders those.
 */
pub fn current_timestamp() -> f64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    nanos as f64 / 1_000_000_000.0
}
