/*
 * This module consolidates the platform-agnostic core of the application: the
 * tally data model and its mutation rules, ranking, baseline tracking, the text
 * dump, schema validation, and the file and settings persistence services
 * (behind the `TallyFileOperations` and `ConfigManagerOperations` traits).
 */
pub mod config;
pub mod dump_formatter;
pub mod entry_store;
pub mod models;
pub mod path_utils;
pub mod position_tracker;
pub mod ranker;
pub mod tally_file;
pub mod validator;

pub use models::{DEFAULT_TITLE, Entry, TallyList, current_timestamp};

pub use entry_store::StoreError;

pub use ranker::{RankedEntry, rank};

pub use position_tracker::{ChangeIndicator, PositionTracker};

pub use dump_formatter::{NO_ENTRIES_MARKER, format_dump};

pub use validator::{SchemaError, validate};

pub use tally_file::{CoreTallyFileManager, TallyFileError, TallyFileOperations};

pub use config::{ConfigError, ConfigManagerOperations, CoreConfigManager, Settings};
