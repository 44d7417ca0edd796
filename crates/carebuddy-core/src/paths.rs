use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CONSOLE_DIR: &str = ".carebuddy";
pub const CONFIG_FILE: &str = ".carebuddy/config.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn console_dir(root: &Path) -> PathBuf {
    root.join(CONSOLE_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}
