//! Vdir index: collections discovered under a root directory and the items
//! they hold, numbered for the current run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::collection::Collection;
use crate::constants::ICS_EXTENSION;
use crate::error::{TdxError, TdxResult};
use crate::item::{Item, Tag};

/// The loaded vdir.
///
/// IDs start at 1 and follow collection order, then file name order within a
/// collection. They are only stable while the tree is unchanged.
#[derive(Debug)]
pub struct Vdir {
    root: PathBuf,
    lists: Vec<(Collection, Vec<Item>)>,
}

impl Vdir {
    /// Walk `root` and load every collection and item.
    ///
    /// A directory is a collection when it directly contains at least one
    /// `.ics` file; `root` itself counts. Files that fail to decode are
    /// skipped with a warning, files without a VTODO are skipped silently.
    pub fn load(root: &Path) -> TdxResult<Self> {
        if !root.is_dir() {
            return Err(TdxError::Config(format!(
                "Vdir path {} does not exist or is not a directory",
                root.display()
            )));
        }

        let mut lists = Vec::new();
        let mut seen_uids = HashSet::new();
        let mut next_id = 1;

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(%err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            let files = match ics_files(entry.path()) {
                Ok(files) if !files.is_empty() => files,
                Ok(_) => continue,
                Err(err) => {
                    warn!(path = %entry.path().display(), %err, "skipping unreadable directory");
                    continue;
                }
            };

            let collection = Collection::load(entry.path())?;
            let mut items = Vec::new();

            for path in files {
                let mut item = match Item::from_file(&path) {
                    Ok(item) => item,
                    Err(TdxError::NotATodo(path)) => {
                        debug!(path = %path.display(), "no VTODO, skipping");
                        continue;
                    }
                    Err(err) => {
                        warn!(path = %path.display(), %err, "skipping unreadable item");
                        continue;
                    }
                };

                if let Some(uid) = item.uid() {
                    if !seen_uids.insert(uid.clone()) {
                        warn!(path = %path.display(), %uid, "duplicate UID, skipping");
                        continue;
                    }
                }

                item.id = next_id;
                next_id += 1;
                items.push(item);
            }

            lists.push((collection, items));
        }

        debug!(
            root = %root.display(),
            collections = lists.len(),
            items = next_id - 1,
            "loaded vdir"
        );

        Ok(Vdir {
            root: root.to_path_buf(),
            lists,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lists(&self) -> &[(Collection, Vec<Item>)] {
        &self.lists
    }

    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.lists.iter().map(|(c, _)| c)
    }

    /// All items in ID order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.lists.iter().flat_map(|(_, items)| items)
    }

    pub fn items_in(&self, collection: &Collection) -> &[Item] {
        self.lists
            .iter()
            .find(|(c, _)| c == collection)
            .map(|(_, items)| items.as_slice())
            .unwrap_or(&[])
    }

    /// The collection an item belongs to.
    pub fn collection_of(&self, item: &Item) -> Option<&Collection> {
        self.lists
            .iter()
            .find(|(_, items)| items.iter().any(|i| i.path == item.path))
            .map(|(c, _)| c)
    }

    pub fn collection_names(&self) -> Vec<String> {
        self.collections().map(|c| c.name.clone()).collect()
    }

    /// Find a collection by display name.
    pub fn collection_by_name(&self, name: &str) -> TdxResult<&Collection> {
        self.collections()
            .find(|c| c.name == name)
            .ok_or_else(|| TdxError::ListNotFound {
                name: name.to_string(),
                available: self.collection_names(),
            })
    }

    pub fn item_by_id(&self, id: u32) -> TdxResult<&Item> {
        self.items()
            .find(|i| i.id == id)
            .ok_or(TdxError::ItemNotFound(id))
    }

    /// Look up several items. Fails on the first unknown ID.
    pub fn items_by_ids(&self, ids: &[u32]) -> TdxResult<Vec<&Item>> {
        ids.iter().map(|id| self.item_by_id(*id)).collect()
    }

    pub fn item_by_path(&self, path: &Path) -> TdxResult<&Item> {
        self.items()
            .find(|i| i.path == path)
            .ok_or_else(|| TdxError::PathNotFound(path.to_path_buf()))
    }

    /// Every tag across all items, deduplicated case-insensitively.
    pub fn tags(&self) -> Vec<Tag> {
        let mut tags: Vec<Tag> = Vec::new();
        for tag in self.items().flat_map(Item::tags) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }
}

/// `.ics` files directly inside `dir`, sorted by name.
fn ics_files(dir: &Path) -> TdxResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|e| e.eq_ignore_ascii_case(ICS_EXTENSION))
        })
        .collect();

    files.sort();
    Ok(files)
}
