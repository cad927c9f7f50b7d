/*
 * Mutation operations on a `TallyList`. These are the only places where entries
 * are added, renamed or have their value changed, and they enforce the invariant
 * that entry names are unique within one list (exact, case-sensitive match).
 * Every operation either completes fully or leaves the list untouched.
 */
use super::models::{Entry, TallyList, current_timestamp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    DuplicateName(String),
    NotFound(String),
    EmptyName,
    Overflow(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::DuplicateName(name) => write!(f, "Entry '{name}' already exists"),
            StoreError::NotFound(name) => write!(f, "Entry not found: {name}"),
            StoreError::EmptyName => write!(f, "Entry name must not be empty"),
            StoreError::Overflow(name) => write!(f, "Value of '{name}' is out of range"),
        }
    }
}

impl std::error::Error for StoreError {}

pub type Result<T> = std::result::Result<T, StoreError>;

fn normalized_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(StoreError::EmptyName)
    } else {
        Ok(trimmed)
    }
}

impl TallyList {
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    #[cfg(test)]
    pub(crate) fn find(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.name == name)
    }

    /*
     * Appends a new entry with the given starting value, stamped with the current
     * time. Surrounding whitespace is trimmed from the name first. Returns the
     * stored name.
     */
    pub fn add(&mut self, name: &str, value: i64) -> Result<String> {
        let name = normalized_name(name)?;
        if self.contains(name) {
            log::debug!("TallyList: Rejected duplicate entry '{name}'.");
            return Err(StoreError::DuplicateName(name.to_string()));
        }
        self.entries.push(Entry::new(name.to_string(), value));
        log::trace!("TallyList: Added entry '{name}' with value {value}.");
        Ok(name.to_string())
    }

    /*
     * Renames an entry in place. `last_updated` is deliberately left alone since
     * the name takes no part in ranking. Renaming an entry to its own name
     * succeeds without change. Returns the stored (trimmed) new name.
     */
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<String> {
        if !self.contains(old_name) {
            return Err(StoreError::NotFound(old_name.to_string()));
        }
        let new_name = normalized_name(new_name)?;
        if new_name != old_name && self.contains(new_name) {
            log::debug!("TallyList: Rejected rename of '{old_name}' to existing '{new_name}'.");
            return Err(StoreError::DuplicateName(new_name.to_string()));
        }
        if let Some(entry) = self.find_mut(old_name) {
            entry.name = new_name.to_string();
        }
        log::trace!("TallyList: Renamed entry '{old_name}' to '{new_name}'.");
        Ok(new_name.to_string())
    }

    /*
     * Adds `delta` to an entry's value and refreshes its timestamp. The refresh
     * is what lets an unchanged leader keep its rank over a challenger that just
     * reached the same value. A result outside the i64 range is an error and
     * leaves the entry untouched.
     */
    pub fn adjust(&mut self, name: &str, delta: i64) -> Result<i64> {
        let entry = self
            .find_mut(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let Some(value) = entry.value.checked_add(delta) else {
            log::debug!("TallyList: Rejected adjusting '{name}' by {delta}: out of range.");
            return Err(StoreError::Overflow(name.to_string()));
        };
        entry.value = value;
        entry.last_updated = current_timestamp();
        log::trace!(
            "TallyList: Adjusted '{name}' by {delta}, now {}.",
            entry.value
        );
        Ok(entry.value)
    }
}
