/*
 * Renders a tally list as the plain-text "dump" that the user copies out of the
 * application: the title, an underline, then one fixed-width line per ranked
 * entry with its movement since the last captured baseline. Formatting never
 * captures a new baseline; that is left to the caller.
 */
use super::models::Entry;
use super::position_tracker::PositionTracker;
use super::ranker::rank;

pub const NO_ENTRIES_MARKER: &str = "(No entries)";
pub const NAME_COLUMN_WIDTH: usize = 20;
pub const VALUE_COLUMN_WIDTH: usize = 3;
const TITLE_UNDERLINE_CHAR: char = '=';

/// Cuts `name` down to the name column width, counting characters, not bytes.
pub fn fit_name_column(name: &str) -> String {
    match name.char_indices().nth(NAME_COLUMN_WIDTH) {
        Some((byte_index, _)) => name[..byte_index].to_string(),
        None => name.to_string(),
    }
}

pub fn format_dump(title: &str, entries: &[Entry], tracker: &PositionTracker) -> String {
    if entries.is_empty() {
        return format!("{title}\n{NO_ENTRIES_MARKER}");
    }

    let underline: String =
        std::iter::repeat_n(TITLE_UNDERLINE_CHAR, title.chars().count()).collect();
    let mut lines = vec![title.to_string(), underline, String::new()];

    for ranked in rank(entries) {
        let indicator = tracker.change_indicator(&ranked.entry.name, ranked.rank);
        lines.push(format!(
            "{:>2} {} {:<name_width$} {:>value_width$} points",
            ranked.rank,
            indicator,
            fit_name_column(&ranked.entry.name),
            ranked.entry.value,
            name_width = NAME_COLUMN_WIDTH,
            value_width = VALUE_COLUMN_WIDTH,
        ));
    }

    lines.join("\n")
}
