use crate::core::{
    ConfigManagerOperations, PositionTracker, RankedEntry, Settings, StoreError,
    TallyFileError, TallyFileOperations, TallyList, format_dump, rank,
};
use crate::core::dump_formatter::{NAME_COLUMN_WIDTH, VALUE_COLUMN_WIDTH};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const APP_NAME: &str = "Tally";
const DEFAULT_WINDOW_TITLE: &str = "Tally - Point Tracker";

#[derive(Debug)]
pub enum SessionError {
    Store(StoreError),
    File(TallyFileError),
    NoSelection,
    NoCurrentFile,
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        SessionError::Store(err)
    }
}

impl From<TallyFileError> for SessionError {
    fn from(err: TallyFileError) -> Self {
        SessionError::File(err)
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Store(e) => write!(f, "{e}"),
            SessionError::File(e) => write!(f, "{e}"),
            SessionError::NoSelection => write!(f, "Please select an entry first"),
            SessionError::NoCurrentFile => write!(
                f,
                "No file is currently open. Create a new file or open an existing one first."
            ),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Store(e) => Some(e),
            SessionError::File(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

// One row of the ranked list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub name: String,
    pub text: String,
    pub is_selected: bool,
}

/*
 * Owns all mutable state of one editing session: the tally list, the file it
 * belongs to, the selected entry (tracked by name so it follows the entry as the
 * ranking changes) and the baseline used for the dump's change indicators.
 * A front end drives it through these methods; every failing operation leaves
 * the session as it was.
 */
pub struct TallySession {
    list: TallyList,
    current_file_path: Option<PathBuf>,
    selected_entry_name: Option<String>,
    tracker: PositionTracker,
    config_manager: Arc<dyn ConfigManagerOperations>,
    file_manager: Arc<dyn TallyFileOperations>,
}

impl TallySession {
    pub fn new(
        config_manager: Arc<dyn ConfigManagerOperations>,
        file_manager: Arc<dyn TallyFileOperations>,
    ) -> Self {
        log::debug!("TallySession::new - starting with an empty list.");
        TallySession {
            list: TallyList::default(),
            current_file_path: None,
            selected_entry_name: None,
            tracker: PositionTracker::new(),
            config_manager,
            file_manager,
        }
    }

    pub fn list(&self) -> &TallyList {
        &self.list
    }

    pub fn title(&self) -> &str {
        &self.list.title
    }

    pub fn current_file_path(&self) -> Option<&Path> {
        self.current_file_path.as_deref()
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected_entry_name.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    fn capture_baseline(&mut self) {
        let ranking = rank(&self.list.entries);
        self.tracker.capture(&ranking);
    }

    fn adopt(&mut self, list: TallyList, path: PathBuf) {
        self.list = list;
        self.current_file_path = Some(path);
        self.selected_entry_name = None;
        self.capture_baseline();
    }

    // Settings are a convenience; failures are logged, never surfaced.
    fn remember_last_file(&self, path: &Path) {
        let settings = Settings {
            last_file: Some(path.to_path_buf()),
        };
        if let Err(e) = self.config_manager.save_settings(APP_NAME, &settings) {
            log::warn!("TallySession: Could not remember last file {path:?}: {e}");
        }
    }

    /*
     * Restores the file recorded in the settings, if there is one and it still
     * loads. Anything else (no settings, unreadable settings, missing or invalid
     * file) falls back to a fresh untitled list. Either way a baseline is
     * captured so the first dump compares against the state at start-up.
     */
    pub fn start_up(&mut self) {
        let last_file = match self.config_manager.load_settings(APP_NAME) {
            Ok(settings) => settings.last_file,
            Err(e) => {
                log::warn!("TallySession: Ignoring unreadable settings: {e}");
                None
            }
        };

        if let Some(path) = last_file.filter(|p| p.exists()) {
            match self.file_manager.load_file(&path) {
                Ok(list) => {
                    log::info!("TallySession: Restored last file {path:?}.");
                    self.adopt(list, path);
                    return;
                }
                Err(e) => {
                    log::warn!("TallySession: Could not restore last file {path:?}: {e}");
                }
            }
        }

        self.list = TallyList::default();
        self.current_file_path = None;
        self.selected_entry_name = None;
        self.capture_baseline();
    }

    pub fn open_file(&mut self, path: &Path) -> Result<()> {
        let list = self.file_manager.load_file(path).inspect_err(|e| {
            log::error!("TallySession: Failed to open {path:?}: {e}");
        })?;
        log::info!(
            "TallySession: Opened '{}' ({} entries) from {path:?}.",
            list.title,
            list.entries.len()
        );
        self.adopt(list, path.to_path_buf());
        self.remember_last_file(path);
        Ok(())
    }

    /*
     * Starts a new, empty list stored at `path` (".json" is appended when the
     * path has another or no extension). The file is written before the session
     * switches over, so a failed write leaves the current list in place.
     */
    pub fn create_file(&mut self, path: &Path) -> Result<PathBuf> {
        let path = with_json_extension(path);
        let list = TallyList::default();
        self.file_manager.save_file(&path, &list).inspect_err(|e| {
            log::error!("TallySession: Failed to create {path:?}: {e}");
        })?;
        log::info!("TallySession: Created new tally file {path:?}.");
        self.adopt(list, path.clone());
        self.remember_last_file(&path);
        Ok(path)
    }

    pub fn save(&self) -> Result<&Path> {
        let path = self
            .current_file_path
            .as_deref()
            .ok_or(SessionError::NoCurrentFile)?;
        self.file_manager.save_file(path, &self.list).inspect_err(|e| {
            log::error!("TallySession: Failed to save {path:?}: {e}");
        })?;
        log::info!("TallySession: Saved {path:?}.");
        Ok(path)
    }

    pub fn set_title(&mut self, title: &str) {
        self.list.title = title.to_string();
    }

    pub fn select(&mut self, name: &str) -> Result<()> {
        if !self.list.contains(name) {
            return Err(StoreError::NotFound(name.to_string()).into());
        }
        self.selected_entry_name = Some(name.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected_entry_name = None;
    }

    /// Adds a zero-valued entry and clears the selection. Returns the stored name.
    pub fn add_entry(&mut self, name: &str) -> Result<String> {
        let stored = self.list.add(name, 0)?;
        self.selected_entry_name = None;
        Ok(stored)
    }

    fn selected(&self) -> Result<String> {
        self.selected_entry_name
            .clone()
            .ok_or(SessionError::NoSelection)
    }

    pub fn increment_selected(&mut self) -> Result<i64> {
        let name = self.selected()?;
        Ok(self.list.adjust(&name, 1)?)
    }

    pub fn decrement_selected(&mut self) -> Result<i64> {
        let name = self.selected()?;
        Ok(self.list.adjust(&name, -1)?)
    }

    pub fn rename_selected(&mut self, new_name: &str) -> Result<String> {
        let old_name = self.selected()?;
        let stored = self.list.rename(&old_name, new_name)?;
        self.selected_entry_name = Some(stored.clone());
        Ok(stored)
    }

    pub fn ranking(&self) -> Vec<RankedEntry<'_>> {
        rank(&self.list.entries)
    }

    pub fn list_rows(&self) -> Vec<ListRow> {
        let selected = self.selected_entry_name.as_deref();
        self.ranking()
            .into_iter()
            .map(|ranked| ListRow {
                name: ranked.entry.name.clone(),
                text: format!(
                    "#{:>2}  {:<name_width$} {:>value_width$} points",
                    ranked.rank,
                    ranked.entry.name,
                    ranked.entry.value,
                    name_width = NAME_COLUMN_WIDTH,
                    value_width = VALUE_COLUMN_WIDTH,
                ),
                is_selected: selected == Some(ranked.entry.name.as_str()),
            })
            .collect()
    }

    /// The dump as it would be exported, without moving the baseline.
    pub fn preview_dump(&self) -> String {
        format_dump(&self.list.title, &self.list.entries, &self.tracker)
    }

    /// Produces the dump and makes the current ranking the new baseline.
    pub fn commit_dump(&mut self) -> String {
        let dump = self.preview_dump();
        self.capture_baseline();
        log::debug!(
            "TallySession: Committed dump of {} entries.",
            self.list.entries.len()
        );
        dump
    }

    pub fn window_title(&self) -> String {
        match self
            .current_file_path
            .as_deref()
            .and_then(|p| p.file_name())
        {
            Some(file_name) => format!("Tally - {}", file_name.to_string_lossy()),
            None => DEFAULT_WINDOW_TITLE.to_string(),
        }
    }
}

pub fn with_json_extension(path: &Path) -> PathBuf {
    let has_json_extension = path
        .extension()
        .is_some_and(|ext| ext == crate::core::tally_file::TALLY_FILE_EXTENSION);
    if has_json_extension {
        return path.to_path_buf();
    }
    let mut raw: OsString = path.as_os_str().to_os_string();
    raw.push(".");
    raw.push(crate::core::tally_file::TALLY_FILE_EXTENSION);
    PathBuf::from(raw)
}
