use super::session::{SessionError, TallySession, with_json_extension};

use crate::core::{
    ChangeIndicator, ConfigError, ConfigManagerOperations, CoreTallyFileManager, Entry,
    NO_ENTRIES_MARKER, SchemaError, Settings, StoreError, TallyFileError, TallyFileOperations,
    TallyList,
};

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

/*
 * Unit tests for `TallySession`. Settings go through an in-memory mock so the
 * real user config directory is never touched; file access uses the real
 * `CoreTallyFileManager` against temporary directories, or a failing double
 * where an I/O error is needed.
 */

// --- MockConfigManager ---
struct MockConfigManager {
    load_result: Mutex<Result<Settings, ConfigError>>,
    saved: Mutex<Vec<Settings>>,
    fail_saves: bool,
}

impl MockConfigManager {
    fn new() -> Self {
        MockConfigManager {
            load_result: Mutex::new(Ok(Settings::default())),
            saved: Mutex::new(Vec::new()),
            fail_saves: false,
        }
    }

    fn with_last_file(path: &Path) -> Self {
        let mock = Self::new();
        *mock.load_result.lock().unwrap() = Ok(Settings {
            last_file: Some(path.to_path_buf()),
        });
        mock
    }

    fn saved_settings(&self) -> Vec<Settings> {
        self.saved.lock().unwrap().clone()
    }
}

impl ConfigManagerOperations for MockConfigManager {
    fn load_settings(&self, _app_name: &str) -> Result<Settings, ConfigError> {
        match &*self.load_result.lock().unwrap() {
            Ok(settings) => Ok(settings.clone()),
            Err(_) => Err(ConfigError::NoProjectDirectory),
        }
    }

    fn save_settings(&self, _app_name: &str, settings: &Settings) -> Result<(), ConfigError> {
        if self.fail_saves {
            return Err(ConfigError::Io(io::Error::other("mocked settings failure")));
        }
        self.saved.lock().unwrap().push(settings.clone());
        Ok(())
    }
}
// --- End MockConfigManager ---

// Loads nothing and refuses every write.
struct FailingFileManager;

impl TallyFileOperations for FailingFileManager {
    fn load_file(&self, path: &Path) -> Result<TallyList, TallyFileError> {
        Err(TallyFileError::NotFound(path.to_path_buf()))
    }

    fn save_file(&self, _path: &Path, _list: &TallyList) -> Result<(), TallyFileError> {
        Err(TallyFileError::Io(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "mocked write failure",
        )))
    }
}

fn setup_session() -> (TallySession, Arc<MockConfigManager>) {
    let config = Arc::new(MockConfigManager::new());
    let session = TallySession::new(config.clone(), Arc::new(CoreTallyFileManager::new()));
    (session, config)
}

fn write_list(path: &Path, title: &str, entries: &[(&str, i64, f64)]) {
    let list = TallyList {
        title: title.to_string(),
        entries: entries
            .iter()
            .map(|(name, value, last_updated)| Entry {
                name: name.to_string(),
                value: *value,
                last_updated: *last_updated,
            })
            .collect(),
    };
    CoreTallyFileManager::new().save_file(path, &list).unwrap();
}

fn ranked_names(session: &TallySession) -> Vec<String> {
    session
        .ranking()
        .iter()
        .map(|r| r.entry.name.clone())
        .collect()
}

#[test]
fn test_new_session_defaults() {
    let (session, _config) = setup_session();
    assert_eq!(session.title(), "New Tally List");
    assert!(session.list().entries.is_empty());
    assert_eq!(session.current_file_path(), None);
    assert_eq!(session.selected_name(), None);
    assert_eq!(session.window_title(), "Tally - Point Tracker");
}

#[test]
fn test_start_up_without_settings_starts_empty_with_baseline() {
    let (mut session, _config) = setup_session();
    session.start_up();
    assert!(session.list().entries.is_empty());
    assert!(session.tracker().has_baseline());
    assert_eq!(
        session.preview_dump(),
        format!("New Tally List\n{NO_ENTRIES_MARKER}")
    );
}

#[test]
fn test_start_up_restores_last_file_and_captures() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scores.json");
    write_list(&path, "Scores", &[("A", 5, 1.0), ("B", 7, 2.0)]);

    let config = Arc::new(MockConfigManager::with_last_file(&path));
    let mut session = TallySession::new(config.clone(), Arc::new(CoreTallyFileManager::new()));
    session.start_up();

    assert_eq!(session.title(), "Scores");
    assert_eq!(session.current_file_path(), Some(path.as_path()));
    assert_eq!(session.window_title(), "Tally - scores.json");
    assert_eq!(session.tracker().previous_rank("B"), Some(1));
    assert_eq!(session.tracker().previous_rank("A"), Some(2));
    // Restoring does not rewrite the settings.
    assert!(config.saved_settings().is_empty());
}

#[test]
fn test_start_up_falls_back_when_last_file_is_missing_or_invalid() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("gone.json");
    let config = Arc::new(MockConfigManager::with_last_file(&missing));
    let mut session = TallySession::new(config, Arc::new(CoreTallyFileManager::new()));
    session.start_up();
    assert_eq!(session.current_file_path(), None);

    let invalid = dir.path().join("bad.json");
    std::fs::write(&invalid, "{ nope").unwrap();
    let config = Arc::new(MockConfigManager::with_last_file(&invalid));
    let mut session = TallySession::new(config, Arc::new(CoreTallyFileManager::new()));
    session.start_up();
    assert_eq!(session.current_file_path(), None);
    assert_eq!(session.title(), "New Tally List");
}

#[test]
fn test_start_up_ignores_settings_errors() {
    let config = Arc::new(MockConfigManager::new());
    *config.load_result.lock().unwrap() = Err(ConfigError::NoProjectDirectory);
    let mut session = TallySession::new(config, Arc::new(CoreTallyFileManager::new()));
    session.start_up();
    assert_eq!(session.current_file_path(), None);
    assert!(session.tracker().has_baseline());
}

#[test]
fn test_open_file_replaces_state_and_remembers_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("club.json");
    write_list(&path, "Club", &[("Zoe", 1, 1.0)]);

    let (mut session, config) = setup_session();
    session.add_entry("Someone").unwrap();
    session.select("Someone").unwrap();

    session.open_file(&path).unwrap();

    assert_eq!(session.title(), "Club");
    assert_eq!(ranked_names(&session), vec!["Zoe"]);
    assert_eq!(session.selected_name(), None);
    assert_eq!(session.tracker().previous_rank("Zoe"), Some(1));
    assert_eq!(
        config.saved_settings(),
        vec![Settings {
            last_file: Some(path.clone())
        }]
    );
}

#[test]
fn test_open_file_failure_leaves_state_unchanged() {
    let dir = tempdir().unwrap();
    let bad = dir.path().join("shape.json");
    std::fs::write(&bad, r#"{"title": 1, "entries": []}"#).unwrap();

    let (mut session, config) = setup_session();
    session.add_entry("Keep").unwrap();
    let before = session.list().clone();

    let result = session.open_file(&bad);

    assert!(matches!(
        result,
        Err(SessionError::File(TallyFileError::Schema(SchemaError { .. })))
    ));
    assert_eq!(session.list(), &before);
    assert_eq!(session.current_file_path(), None);
    assert!(config.saved_settings().is_empty());

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        session.open_file(&missing),
        Err(SessionError::File(TallyFileError::NotFound(_)))
    ));
}

#[test]
fn test_create_file_appends_extension_and_writes_empty_list() {
    let dir = tempdir().unwrap();
    let (mut session, config) = setup_session();
    session.add_entry("Old").unwrap();

    let created = session.create_file(&dir.path().join("fresh")).unwrap();

    assert_eq!(created, dir.path().join("fresh.json"));
    assert!(created.exists());
    assert!(session.list().entries.is_empty());
    assert_eq!(session.title(), "New Tally List");
    assert_eq!(session.current_file_path(), Some(created.as_path()));
    assert_eq!(config.saved_settings().len(), 1);

    let reloaded = CoreTallyFileManager::new().load_file(&created).unwrap();
    assert_eq!(&reloaded, session.list());
}

#[test]
fn test_create_file_failure_keeps_previous_list() {
    let config = Arc::new(MockConfigManager::new());
    let mut session = TallySession::new(config.clone(), Arc::new(FailingFileManager));
    session.add_entry("Old").unwrap();

    let result = session.create_file(Path::new("/nowhere/new.json"));

    assert!(matches!(
        result,
        Err(SessionError::File(TallyFileError::Io(_)))
    ));
    assert_eq!(ranked_names(&session), vec!["Old"]);
    assert_eq!(session.current_file_path(), None);
    assert!(config.saved_settings().is_empty());
}

#[test]
fn test_settings_write_failure_is_not_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("x.json");
    write_list(&path, "X", &[]);

    let mut config = MockConfigManager::new();
    config.fail_saves = true;
    let mut session = TallySession::new(Arc::new(config), Arc::new(CoreTallyFileManager::new()));

    assert!(session.open_file(&path).is_ok());
    assert_eq!(session.title(), "X");
}

#[test]
fn test_save_requires_current_file() {
    let (session, _config) = setup_session();
    assert!(matches!(session.save(), Err(SessionError::NoCurrentFile)));
}

#[test]
fn test_save_round_trips_edits() {
    let dir = tempdir().unwrap();
    let (mut session, _config) = setup_session();
    let path = session.create_file(&dir.path().join("rt.json")).unwrap();

    session.set_title("Edited");
    session.add_entry("A").unwrap();
    session.add_entry("B").unwrap();
    session.select("B").unwrap();
    session.increment_selected().unwrap();
    assert_eq!(session.save().unwrap(), path.as_path());

    let (mut other, _config) = setup_session();
    other.open_file(&path).unwrap();
    assert_eq!(other.list(), session.list());
}

#[test]
fn test_selection_operations_require_selection() {
    let (mut session, _config) = setup_session();
    session.add_entry("A").unwrap();
    assert!(matches!(session.increment_selected(), Err(SessionError::NoSelection)));
    assert!(matches!(session.decrement_selected(), Err(SessionError::NoSelection)));
    assert!(matches!(session.rename_selected("B"), Err(SessionError::NoSelection)));
    assert!(matches!(
        session.select("Nobody"),
        Err(SessionError::Store(StoreError::NotFound(_)))
    ));
}

#[test]
fn test_add_entry_clears_selection_and_rejects_duplicates() {
    let (mut session, _config) = setup_session();
    session.add_entry("A").unwrap();
    session.select("A").unwrap();

    assert_eq!(session.add_entry("  B ").unwrap(), "B");
    assert_eq!(session.selected_name(), None);

    assert!(matches!(
        session.add_entry("A"),
        Err(SessionError::Store(StoreError::DuplicateName(_)))
    ));
    assert_eq!(session.list().entries.len(), 2);
}

#[test]
fn test_selection_follows_entry_through_rank_changes_and_rename() {
    let (mut session, _config) = setup_session();
    session.add_entry("A").unwrap();
    session.add_entry("B").unwrap();
    session.select("B").unwrap();

    assert_eq!(session.increment_selected().unwrap(), 1);
    assert_eq!(ranked_names(&session), vec!["B", "A"]);
    assert_eq!(session.rename_selected("Bea").unwrap(), "Bea");
    assert_eq!(session.selected_name(), Some("Bea"));
    assert_eq!(session.decrement_selected().unwrap(), 0);

    let rows = session.list_rows();
    let selected: Vec<&str> = rows
        .iter()
        .filter(|r| r.is_selected)
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(selected, vec!["Bea"]);
}

#[test]
fn test_rename_selected_to_taken_name_keeps_selection() {
    let (mut session, _config) = setup_session();
    session.add_entry("A").unwrap();
    session.add_entry("B").unwrap();
    session.select("A").unwrap();

    assert!(matches!(
        session.rename_selected("B"),
        Err(SessionError::Store(StoreError::DuplicateName(_)))
    ));
    assert_eq!(session.selected_name(), Some("A"));
}

#[test]
fn test_list_rows_format() {
    let (mut session, _config) = setup_session();
    session.add_entry("Alice").unwrap();
    session.select("Alice").unwrap();
    for _ in 0..12 {
        session.increment_selected().unwrap();
    }
    session.add_entry("Bob").unwrap();

    let texts: Vec<String> = session.list_rows().into_iter().map(|r| r.text).collect();
    assert_eq!(
        texts,
        vec![
            "# 1  Alice                 12 points".to_string(),
            "# 2  Bob                    0 points".to_string(),
        ]
    );
}

#[test]
fn test_preview_does_not_move_baseline_but_commit_does() {
    let (mut session, _config) = setup_session();
    session.start_up();
    session.add_entry("A").unwrap();
    session.add_entry("B").unwrap();

    let first = session.commit_dump();
    assert!(first.contains(" 1 ⚪ - A"));
    assert!(first.contains(" 2 ⚪ - B"));

    session.select("B").unwrap();
    session.increment_selected().unwrap();

    let preview = session.preview_dump();
    assert!(preview.contains(" 1 ⬆️+1 B"));
    assert!(preview.contains(" 2 ⬇️-1 A"));
    // Previewing again still compares against the committed baseline.
    assert_eq!(session.preview_dump(), preview);

    let committed = session.commit_dump();
    assert_eq!(committed, preview);
    let after = session.preview_dump();
    assert!(after.contains(" 1 ⚪ = B"));
    assert!(after.contains(" 2 ⚪ = A"));
}

#[test]
fn test_edits_after_load_are_measured_against_loaded_ranking() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scenario.json");
    write_list(&path, "S", &[("A", 10, 1.0), ("B", 10, 2.0), ("C", 5, 3.0)]);

    let (mut session, _config) = setup_session();
    session.open_file(&path).unwrap();
    session.select("C").unwrap();
    for _ in 0..10 {
        session.increment_selected().unwrap();
    }

    assert_eq!(ranked_names(&session), vec!["C", "A", "B"]);
    let indicators: Vec<ChangeIndicator> = session
        .ranking()
        .iter()
        .map(|r| session.tracker().change_indicator(&r.entry.name, r.rank))
        .collect();
    assert_eq!(
        indicators,
        vec![
            ChangeIndicator::Improved(2),
            ChangeIndicator::Declined(1),
            ChangeIndicator::Declined(1),
        ]
    );
}

#[test]
fn test_with_json_extension() {
    assert_eq!(
        with_json_extension(Path::new("a/list.json")),
        PathBuf::from("a/list.json")
    );
    assert_eq!(
        with_json_extension(Path::new("a/list")),
        PathBuf::from("a/list.json")
    );
    assert_eq!(
        with_json_extension(Path::new("a/list.txt")),
        PathBuf::from("a/list.txt.json")
    );
}
