/*
 * Path helpers shared by configuration and the front end: the default search
 * root (the user's home directory) and normalisation of user-entered roots
 * into absolute paths.
 */
use directories::UserDirs;
use std::path::{Path, PathBuf};

/*
 * Returns the directory a search starts from when the user has not chosen
 * one. This is the home directory as reported by `directories::UserDirs`,
 * falling back to the current directory when no home can be determined
 * (e.g. a stripped-down service account).
 */
pub fn default_search_root() -> PathBuf {
    match UserDirs::new() {
        Some(user_dirs) => {
            let home = user_dirs.home_dir().to_path_buf();
            log::trace!("PathUtils: Default search root is home directory {home:?}");
            home
        }
        None => {
            log::warn!("PathUtils: Could not determine home directory, using current directory.");
            PathBuf::from(".")
        }
    }
}

/*
 * Makes `path` absolute relative to the current directory without touching
 * the file system beyond reading the current directory. Symlinks are not
 * resolved and the path does not need to exist.
 */
pub fn to_absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::path::absolute(path) {
        Ok(absolute) => absolute,
        Err(e) => {
            log::warn!("PathUtils: Failed to make {path:?} absolute, keeping it as given: {e}");
            path.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_absolute_keeps_absolute_paths() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(to_absolute(dir.path()), dir.path());
    }

    #[test]
    fn test_to_absolute_resolves_relative_paths_against_cwd() {
        let absolute = to_absolute(Path::new("some_relative_dir"));
        assert!(absolute.is_absolute());
        assert!(absolute.ends_with("some_relative_dir"));
    }

    #[test]
    fn test_default_search_root_is_not_empty() {
        let root = default_search_root();
        assert!(!root.as_os_str().is_empty());
    }
}
