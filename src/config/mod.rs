// Author: Dustin Pilgrim
// License: MIT

mod store_file;

pub use store_file::FileStore;

use std::path::PathBuf;

/// Settings live next to nothing else we own: a single JSON file under the
/// XDG config dir.
pub fn default_settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    path.push("perch");
    path.push("settings.json");
    path
}
