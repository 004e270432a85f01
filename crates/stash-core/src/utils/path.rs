//! Path utilities for writing stored files back to disk.
//!
//! Stored filenames come from percent-decoded URL segments, so they can hold
//! separators or `..`. Nothing here trusts them as paths.

use crate::error::{StashError, StashResult};
use std::path::{Component, Path, PathBuf};

/// Name used when a filename sanitizes down to nothing
pub const FALLBACK_FILENAME: &str = "download";

/// Resolve `.` and `..` lexically, without touching the filesystem
///
/// A `..` with nothing left to pop is kept, so an escaping path stays
/// recognisable as one.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                },
                _ => components.push(component),
            },
            other => components.push(other),
        }
    }

    components.iter().collect()
}

/// Check if a path is safe (relative, no directory traversal)
pub fn is_safe_path(path: &Path) -> bool {
    if path.is_absolute() {
        return false;
    }

    let mut depth = 0i32;

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            },
            Component::Normal(_) => {
                depth += 1;
            },
            // RootDir and Prefix have no place in a relative path
            _ => return false,
        }
    }

    true
}

/// Reduce a display filename to a single safe path component
///
/// Separators and control characters become `_`; leading dots are stripped
/// so the result is never `.`, `..` or hidden.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Resolve where a stored file should be written inside `base`
pub fn materialize_path(base: &Path, filename: &str) -> StashResult<PathBuf> {
    let name = sanitize_filename(filename);
    let relative = Path::new(&name);

    if !is_safe_path(relative) {
        return Err(StashError::io(
            format!("Refusing to write '{}' outside {}", filename, base.display()),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "path traversal"),
        ));
    }

    Ok(normalize_path(&base.join(relative)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("./out/./a.txt")), PathBuf::from("out/a.txt"));
        assert_eq!(normalize_path(Path::new("out/tmp/../a.txt")), PathBuf::from("out/a.txt"));
        assert_eq!(normalize_path(Path::new("../a.txt")), PathBuf::from("../a.txt"));
        assert_eq!(normalize_path(Path::new("/srv/stash/../files")), PathBuf::from("/srv/files"));
    }

    #[test]
    fn test_is_safe_path() {
        assert!(is_safe_path(Path::new("photo.jpg")));
        assert!(is_safe_path(Path::new("./photo.jpg")));
        assert!(!is_safe_path(Path::new("../../../etc/passwd")));
        assert!(!is_safe_path(Path::new("/absolute/path")));
    }

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("20230928212258-7306.jpg"), "20230928212258-7306.jpg");
        assert_eq!(sanitize_filename("report 2023.pdf"), "report 2023.pdf");
        assert_eq!(sanitize_filename("звіт.txt"), "звіт.txt");
    }

    #[test]
    fn test_sanitize_strips_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_filename("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_filename(".bashrc"), "bashrc");
    }

    #[test]
    fn test_sanitize_fallback() {
        assert_eq!(sanitize_filename(""), FALLBACK_FILENAME);
        assert_eq!(sanitize_filename(".."), FALLBACK_FILENAME);
        assert_eq!(sanitize_filename("   "), FALLBACK_FILENAME);
    }

    #[test]
    fn test_materialize_path_stays_in_base() {
        let base = Path::new("/tmp/stash");
        let path = materialize_path(base, "../secret.txt").unwrap();
        assert_eq!(path, Path::new("/tmp/stash/_secret.txt"));
        assert!(path.starts_with(base));

        let relative = materialize_path(Path::new("./out"), "photo.jpg").unwrap();
        assert_eq!(relative, PathBuf::from("out/photo.jpg"));
    }
}
