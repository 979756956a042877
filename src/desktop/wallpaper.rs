use std::env;
use std::path::Path;

use log::warn;

use crate::{Error, Result};

/// Best-effort identifier of the current desktop environment, used to name
/// the culprit when the wallpaper backend rejects the platform.
pub fn desktop_environment() -> String {
    if cfg!(target_os = "macos") {
        return String::from("macos");
    }
    if cfg!(target_os = "windows") {
        return String::from("windows");
    }
    for var in ["XDG_CURRENT_DESKTOP", "DESKTOP_SESSION", "GDMSESSION"] {
        if let Ok(value) = env::var(var) {
            if !value.is_empty() {
                return value.to_lowercase();
            }
        }
    }
    String::from("unknown")
}

/// Applies the image at `path` as the desktop background.
pub fn set_background(path: &Path) -> Result<()> {
    let path_str = path.to_str().ok_or_else(|| {
        Error::Validation(format!(
            "output path '{}' is not valid UTF-8",
            path.display()
        ))
    })?;

    wallpaper::set_from_path(path_str).map_err(|e| {
        warn!("wallpaper backend rejected '{path_str}': {e}");
        Error::UnsupportedEnvironment(desktop_environment())
    })
}
