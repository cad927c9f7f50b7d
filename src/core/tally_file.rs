/*
 * Reads and writes tally lists as JSON documents. Both directions go through
 * the schema validator: a document is validated before it is accepted from disk
 * and before anything is written, so a failed save never leaves a partial file.
 *
 * As with the other persistence services, access goes through a trait
 * (`TallyFileOperations`) so the session can be driven by a test double.
 */
use super::models::TallyList;
use super::validator::{SchemaError, validate};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const TALLY_FILE_EXTENSION: &str = "json";

#[derive(Debug)]
pub enum TallyFileError {
    NotFound(PathBuf),
    InvalidFormat(serde_json::Error),
    Schema(SchemaError),
    Io(io::Error),
}

impl From<io::Error> for TallyFileError {
    fn from(err: io::Error) -> Self {
        TallyFileError::Io(err)
    }
}

impl From<SchemaError> for TallyFileError {
    fn from(err: SchemaError) -> Self {
        TallyFileError::Schema(err)
    }
}

impl std::fmt::Display for TallyFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyFileError::NotFound(path) => write!(f, "File not found: {}", path.display()),
            TallyFileError::InvalidFormat(e) => write!(f, "Invalid JSON format: {e}"),
            TallyFileError::Schema(e) => write!(f, "{e}"),
            TallyFileError::Io(e) => write!(f, "File I/O error: {e}"),
        }
    }
}

impl std::error::Error for TallyFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TallyFileError::InvalidFormat(e) => Some(e),
            TallyFileError::Schema(e) => Some(e),
            TallyFileError::Io(e) => Some(e),
            TallyFileError::NotFound(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TallyFileError>;

pub trait TallyFileOperations {
    fn load_file(&self, path: &Path) -> Result<TallyList>;
    fn save_file(&self, path: &Path, list: &TallyList) -> Result<()>;
}

pub struct CoreTallyFileManager {}

impl CoreTallyFileManager {
    pub fn new() -> Self {
        CoreTallyFileManager {}
    }
}

impl Default for CoreTallyFileManager {
    fn default() -> Self {
        Self::new()
    }
}

// A serde mismatch that slips past the schema (e.g. an integer too large for
// i64) is still a shape problem, not a syntax one.
fn shape_error(err: serde_json::Error) -> TallyFileError {
    TallyFileError::Schema(SchemaError::new(vec![err.to_string()]))
}

impl TallyFileOperations for CoreTallyFileManager {
    fn load_file(&self, path: &Path) -> Result<TallyList> {
        log::trace!("CoreTallyFileManager: Loading tally file {path:?}");
        if !path.exists() {
            log::debug!("CoreTallyFileManager: Tally file {path:?} does not exist.");
            return Err(TallyFileError::NotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)?;
        let document: Value =
            serde_json::from_str(&contents).map_err(TallyFileError::InvalidFormat)?;
        validate(&document)?;
        let list: TallyList = serde_json::from_value(document).map_err(shape_error)?;

        log::debug!(
            "CoreTallyFileManager: Loaded '{}' with {} entries from {path:?}.",
            list.title,
            list.entries.len()
        );
        Ok(list)
    }

    fn save_file(&self, path: &Path, list: &TallyList) -> Result<()> {
        log::trace!(
            "CoreTallyFileManager: Saving '{}' to {path:?}",
            list.title
        );
        let document = serde_json::to_value(list).map_err(shape_error)?;
        validate(&document)?;
        let text = serde_json::to_string_pretty(list).map_err(shape_error)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
            log::debug!("CoreTallyFileManager: Created directory {parent:?}");
        }

        fs::write(path, text).inspect_err(|e| {
            log::error!("CoreTallyFileManager: Failed to write {path:?}: {e}");
        })?;
        log::debug!(
            "CoreTallyFileManager: Saved {} entries to {path:?}.",
            list.entries.len()
        );
        Ok(())
    }
}
