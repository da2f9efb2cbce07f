use std::path::PathBuf;

use dirs_next::home_dir;

/// Expands a leading `~` (alone, or followed by `/` or `\`) to the current
/// user's home directory. Surrounding whitespace is ignored.
///
/// When the home directory is unknown the path is returned unexpanded.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let Some(home) = home_dir() else {
        return PathBuf::from(trimmed);
    };
    match trimmed.strip_prefix('~') {
        Some("") => home,
        Some(rest) if rest.starts_with(['/', '\\']) => home.join(&rest[1..]),
        _ => PathBuf::from(trimmed),
    }
}
