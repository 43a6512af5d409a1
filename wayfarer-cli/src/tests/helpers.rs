//! Test helpers for writing CLI inputs into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Temporary directory addressed through UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directories");
    }
    std::fs::write(path, contents).expect("write test input");
}

/// A square of four places roughly 1.1 km apart, listed so that index 2 is
/// opposite the start.
pub(super) const SQUARE_TRIP: &str = r#"{
  "places": [
    { "id": 10, "lat": 0.0, "lon": 0.0 },
    { "id": 11, "lat": 0.0, "lon": 0.01 },
    { "id": 12, "lat": 0.01, "lon": 0.01 },
    { "id": 13, "lat": 0.01, "lon": 0.0 }
  ]
}"#;

/// Three places whose costs are only cheap in one direction.
pub(super) const DIRECTED_TRIP: &str = r#"{
  "places": [{ "id": 1 }, { "id": 2 }, { "id": 3 }],
  "matrix": [[0, 1, 4], [5, 0, 1], [1, 6, 0]]
}"#;
