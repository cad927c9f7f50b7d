/*
 * Locates the per-user directory where the application keeps its settings and
 * log file, creating it on first use.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

pub const LOG_FILENAME: &str = "tally.log";

fn ensure_dir(dir: &Path) -> Option<PathBuf> {
    if dir.is_dir() {
        log::trace!("PathUtils: Directory already exists: {dir:?}");
        return Some(dir.to_path_buf());
    }
    match fs::create_dir_all(dir) {
        Ok(()) => {
            log::debug!("PathUtils: Created directory: {dir:?}");
            Some(dir.to_path_buf())
        }
        Err(e) => {
            log::error!("PathUtils: Failed to create directory {dir:?}: {e}");
            None
        }
    }
}

/*
 * Returns the local (non-roaming) configuration directory for `app_name`, such
 * as `~/.config/tally` on Linux, creating it if needed. No organization
 * qualifier is used. `None` means no home directory could be determined or the
 * directory could not be created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Resolving config dir for '{app_name}'");
    let proj_dirs = ProjectDirs::from("", "", app_name)?;
    ensure_dir(proj_dirs.config_local_dir())
}

pub fn get_log_file_path(app_name: &str) -> Option<PathBuf> {
    get_base_app_config_local_dir(app_name).map(|dir| dir.join(LOG_FILENAME))
}
