//! File helpers for the Wayfarer CLI, built on `cap-std` and `camino`.
//!
//! Paths arrive from the command line, so every helper resolves them with
//! ambient authority once and then works inside the opened directory.

#![forbid(unsafe_code)]

use std::io;
use std::path::{Component, MAIN_SEPARATOR};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open an existing file for reading.
///
/// # Errors
///
/// Propagates the IO error from opening `path`.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Create (or truncate) `path` for writing, creating missing parents first.
///
/// # Errors
///
/// Fails when a parent cannot be created, `path` has no file name, or the
/// file cannot be opened for writing.
pub fn create_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    ensure_parent_dir(path)?;
    let (dir, name) = parent_and_name(path)?;
    dir.create(name)
}

/// Whether `path` names an existing regular file.
///
/// # Errors
///
/// Returns the IO error from inspecting `path`, including
/// [`io::ErrorKind::NotFound`] when it does not exist.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = parent_and_name(path)?;
    dir.metadata(name).map(|meta| meta.is_file())
}

/// Create every missing directory above `path`.
///
/// # Errors
///
/// Propagates failures from opening the base directory or creating the
/// intermediate directories.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = split_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

/// Open the directory holding `path` and return it with the file name.
fn parent_and_name(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, &str)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split `dir` into an opened root (filesystem root, drive prefix, or the
/// current directory) and the remainder relative to it.
fn split_base(dir: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_dir = dir.as_std_path();
    let base = match std_dir.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(format!("{prefix}{MAIN_SEPARATOR}"))
        }
        Some(Component::RootDir) => Utf8PathBuf::from(MAIN_SEPARATOR.to_string()),
        _ => Utf8PathBuf::from("."),
    };
    let relative = if base == "." {
        dir.to_path_buf()
    } else {
        dir.strip_prefix(&base)
            .map_err(|_| io::Error::other(format!("cannot strip {base} from {dir}")))?
            .to_path_buf()
    };
    let opened = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((opened, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::io::{Read, Write};
    use tempfile::TempDir;

    struct Workspace {
        _dir: TempDir,
        root: Utf8PathBuf,
    }

    #[fixture]
    fn workspace() -> Workspace {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        Workspace { _dir: dir, root }
    }

    #[rstest]
    fn creates_nested_output_files(workspace: Workspace) {
        let target = workspace.root.join("reports/2024/bench.json");
        let mut file = create_utf8_file(&target).expect("create report");
        file.write_all(b"{}").expect("write report");

        let mut contents = String::new();
        open_utf8_file(&target)
            .expect("reopen report")
            .read_to_string(&mut contents)
            .expect("read report");
        assert_eq!(contents, "{}");
    }

    #[rstest]
    fn ensure_parent_dir_is_idempotent(workspace: Workspace) {
        let target = workspace.root.join("a/b/c.json");
        ensure_parent_dir(&target).expect("first call");
        ensure_parent_dir(&target).expect("second call");
        assert!(workspace.root.join("a/b").is_dir());
    }

    #[rstest]
    fn bare_file_names_need_no_parent() {
        ensure_parent_dir(Utf8Path::new("trip.json")).expect("nothing to create");
    }

    #[rstest]
    fn distinguishes_files_from_directories(workspace: Workspace) {
        let file = workspace.root.join("trip.json");
        std::fs::write(&file, b"{}").expect("write trip");
        assert!(file_is_file(&file).expect("inspect file"));
        assert!(!file_is_file(&workspace.root).expect("inspect directory"));
    }

    #[rstest]
    fn missing_files_report_not_found(workspace: Workspace) {
        let err = file_is_file(&workspace.root.join("absent.json")).expect_err("missing file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn absolute_paths_split_at_the_root(workspace: Workspace) {
        let (_, relative) = split_base(&workspace.root).expect("split absolute path");
        assert!(!relative.as_str().is_empty());
        assert!(relative.is_relative());
    }
}
