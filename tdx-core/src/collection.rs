//! A collection is one directory of `.ics` items, shown as a "list".

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::constants::{META_COLOR, META_DISPLAYNAME};
use crate::error::{TdxError, TdxResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Collection {
    pub name: String,
    pub color: Option<String>,
    pub path: PathBuf,
}

impl Collection {
    /// Load a collection from its directory, reading the `displayname` and
    /// `color` sidecar files if present.
    ///
    /// The name falls back to the directory's base name.
    pub fn load(path: &Path) -> TdxResult<Self> {
        if !path.is_dir() {
            return Err(TdxError::Config(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let name = read_meta(path, META_DISPLAYNAME)
            .or_else(|| {
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Ok(Collection {
            name,
            color: read_meta(path, META_COLOR),
            path: path.to_path_buf(),
        })
    }
}

fn read_meta(dir: &Path, file: &str) -> Option<String> {
    std::fs::read_to_string(dir.join(file))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_name_defaults_to_directory() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("groceries");
        std::fs::create_dir(&dir).unwrap();

        let collection = Collection::load(&dir).unwrap();
        assert_eq!(collection.name, "groceries");
        assert_eq!(collection.color, None);
    }

    #[test]
    fn test_sidecar_files_are_trimmed() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("displayname"), "  Work Stuff\n").unwrap();
        std::fs::write(root.path().join("color"), "#ff0000\n").unwrap();

        let collection = Collection::load(root.path()).unwrap();
        assert_eq!(collection.name, "Work Stuff");
        assert_eq!(collection.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_load_rejects_files() {
        let root = TempDir::new().unwrap();
        let file = root.path().join("a.ics");
        std::fs::write(&file, "").unwrap();
        assert!(Collection::load(&file).is_err());
    }
}
