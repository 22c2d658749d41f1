//! File system operations for the source and output trees

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Recursively copy a directory, creating the destination
pub fn copy_dir(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(from) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(from)?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else {
            std::fs::copy(entry.path(), &target).with_context(|| {
                format!("Failed to copy {} to {}", entry.path().display(), target.display())
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Replace `to` with a fresh copy of `from`
pub fn replace_dir(from: &Path, to: &Path) -> Result<usize> {
    if to.exists() {
        std::fs::remove_dir_all(to)
            .with_context(|| format!("Failed to clear {}", to.display()))?;
    }
    if !from.exists() {
        return Ok(0);
    }
    copy_dir(from, to)
}

/// Names of the regular files directly inside a directory, sorted.
///
/// A missing directory yields an empty list.
pub fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        // Skip hidden files such as .DS_Store or .gitkeep
        if name.starts_with('.') {
            continue;
        }
        names.push(name);
    }
    names.sort();

    Ok(names)
}

/// Whether `name` is usable as exactly one path component
pub fn is_plain_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Join a user-supplied relative path under `base`, rejecting traversal
pub fn join_within(base: &Path, relative: &str) -> Option<PathBuf> {
    let mut path = base.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (path != base).then_some(path)
}

/// Reduce an uploaded file name to a safe, flat file name.
///
/// Keeps ASCII letters, digits, `.`, `_` and `-`; whitespace becomes `_`;
/// leading dots and underscores are dropped. Returns `None` when nothing
/// usable remains.
pub fn secure_filename(name: &str) -> Option<String> {
    // Browsers on Windows may send the full client path
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let cleaned = cleaned.trim_start_matches(['.', '_']).to_string();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        None
    } else {
        Some(cleaned)
    }
}

/// Delete a file or directory
pub fn delete(path: &Path) -> Result<()> {
    if path.is_dir() {
        std::fs::remove_dir_all(path)?;
    } else {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

/// Rename a file or directory
pub fn rename(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::rename(from, to)
        .with_context(|| format!("Failed to rename {} to {}", from.display(), to.display()))?;
    Ok(())
}

/// Write bytes to a file, creating its parent directory
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_filename_strips_unsafe_parts() {
        assert_eq!(secure_filename("My Photo.JPG").as_deref(), Some("My_Photo.JPG"));
        assert_eq!(
            secure_filename("../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(
            secure_filename(r"C:\Users\me\portrait.png").as_deref(),
            Some("portrait.png")
        );
        assert_eq!(secure_filename(".htaccess").as_deref(), Some("htaccess"));
        assert_eq!(secure_filename("日本.png").as_deref(), Some("png"));
        assert_eq!(secure_filename("..."), None);
        assert_eq!(secure_filename(""), None);
    }

    #[test]
    fn plain_components() {
        assert!(is_plain_component("kitchens"));
        assert!(is_plain_component("my-post-2"));
        assert!(!is_plain_component(""));
        assert!(!is_plain_component(".."));
        assert!(!is_plain_component("a/b"));
        assert!(!is_plain_component("/abs"));
    }

    #[test]
    fn join_within_rejects_traversal() {
        let base = Path::new("/srv/images");
        assert_eq!(
            join_within(base, "team/anna.jpg"),
            Some(PathBuf::from("/srv/images/team/anna.jpg"))
        );
        assert_eq!(join_within(base, "../secret"), None);
        assert_eq!(join_within(base, "/etc/passwd"), None);
        assert_eq!(join_within(base, ""), None);
    }

    #[test]
    fn replace_dir_copies_nested_tree() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("assets");
        let to = dir.path().join("out/assets");
        std::fs::create_dir_all(from.join("css")).unwrap();
        std::fs::write(from.join("css/site.css"), "body{}").unwrap();
        std::fs::create_dir_all(&to).unwrap();
        std::fs::write(to.join("stale.txt"), "old").unwrap();

        let copied = replace_dir(&from, &to).unwrap();

        assert_eq!(copied, 1);
        assert!(to.join("css/site.css").is_file());
        assert!(!to.join("stale.txt").exists());
    }

    #[test]
    fn list_file_names_is_sorted_and_skips_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.jpg"), "").unwrap();
        std::fs::write(dir.path().join("a.jpg"), "").unwrap();
        std::fs::write(dir.path().join(".gitkeep"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        assert_eq!(list_file_names(dir.path()).unwrap(), vec!["a.jpg", "b.jpg"]);
        assert!(list_file_names(&dir.path().join("missing")).unwrap().is_empty());
    }
}
