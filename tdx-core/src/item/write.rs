//! Persisting items: bookkeeping properties, encoding, atomic replace.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::debug;

use super::{Item, Status};
use crate::constants::{DEFAULT_ICAL_VERSION, DEFAULT_PRODID};
use crate::error::{TdxError, TdxResult};
use crate::ics::{PropertyBag, PropertyKind, generate_ics};
use crate::uid::generate_uid;

impl Item {
    /// Write the item to its path with the current time as LAST-MODIFIED.
    pub fn save(&mut self) -> TdxResult<()> {
        self.save_at(Utc::now())
    }

    /// Write the item to its path.
    ///
    /// On error nothing is written; the in-memory item may be left partly
    /// updated and should be discarded.
    pub fn save_at(&mut self, now: DateTime<Utc>) -> TdxResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(TdxError::MissingPath);
        }

        self.stamp(now)?;

        let content = generate_ics(&self.calendar);
        write_atomic(&self.path, content.as_bytes())?;

        debug!(path = %self.path.display(), "wrote item");
        Ok(())
    }

    /// Remove the item's file.
    pub fn delete(&self) -> TdxResult<()> {
        std::fs::remove_file(&self.path)?;
        debug!(path = %self.path.display(), "deleted item");
        Ok(())
    }

    /// Fill in the properties every written item carries.
    fn stamp(&mut self, now: DateTime<Utc>) -> TdxResult<()> {
        let sequence = match self.vtodo().get(&PropertyKind::Sequence) {
            None => 0,
            Some(prop) => {
                prop.as_integer()
                    .map_err(|_| TdxError::InvalidSequence(prop.value.clone()))?
                    + 1
            }
        };

        if !self.calendar.has(&PropertyKind::ProdId) {
            self.calendar.set_text(PropertyKind::ProdId, DEFAULT_PRODID);
        }
        if !self.calendar.has(&PropertyKind::Version) {
            self.calendar
                .set_text(PropertyKind::Version, DEFAULT_ICAL_VERSION);
        }

        let todo = self.vtodo_mut();
        todo.set_instant(PropertyKind::LastModified, now);
        todo.set_integer(PropertyKind::Sequence, sequence);

        if !todo.has(&PropertyKind::Uid) {
            todo.set_text(PropertyKind::Uid, &generate_uid());
        }
        if !todo.has(&PropertyKind::Created) {
            todo.set_instant(PropertyKind::Created, now);
        }
        if !todo.has(&PropertyKind::DtStamp) {
            todo.set_instant(PropertyKind::DtStamp, now);
        }

        if self.status().is_none() {
            let status = self
                .status_text()
                .and_then(|text| text.parse().ok())
                .unwrap_or(Status::NeedsAction);
            self.set_status(status);
        }

        Ok(())
    }
}

/// Replace `path` with `content` through a temp file in the same directory.
fn write_atomic(path: &Path, content: &[u8]) -> TdxResult<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| TdxError::Io(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_save_sets_bookkeeping() {
        let dir = TempDir::new().unwrap();
        let mut item = Item::new(dir.path(), "Pay rent");

        item.save_at(now()).unwrap();

        let reread = Item::from_file(&item.path).unwrap();
        assert_eq!(reread.summary(), "Pay rent");
        assert_eq!(reread.vtodo().integer(&PropertyKind::Sequence).unwrap(), Some(0));
        assert_eq!(reread.vtodo().instant(&PropertyKind::LastModified), Some(now()));
    }

    #[test]
    fn test_save_increments_sequence() {
        let dir = TempDir::new().unwrap();
        let mut item = Item::new(dir.path(), "Pay rent");
        item.save_at(now()).unwrap();
        item.save_at(now()).unwrap();

        let mut reread = Item::from_file(&item.path).unwrap();
        assert_eq!(reread.vtodo().integer(&PropertyKind::Sequence).unwrap(), Some(1));

        reread.save_at(now()).unwrap();
        let again = Item::from_file(&item.path).unwrap();
        assert_eq!(again.vtodo().integer(&PropertyKind::Sequence).unwrap(), Some(2));
    }

    #[test]
    fn test_save_without_path_fails() {
        let mut item = Item::new(Path::new(""), "x");
        item.path = Default::default();
        assert!(matches!(item.save_at(now()), Err(TdxError::MissingPath)));
    }

    #[test]
    fn test_bad_sequence_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut item = Item::new(dir.path(), "x");
        item.vtodo_mut()
            .set(crate::ics::Property::new(PropertyKind::Sequence, "abc"));

        assert!(matches!(
            item.save_at(now()),
            Err(TdxError::InvalidSequence(_))
        ));
        assert!(!item.path.exists());
    }

    #[test]
    fn test_unknown_status_is_normalized() {
        let dir = TempDir::new().unwrap();
        let mut item = Item::new(dir.path(), "x");
        item.vtodo_mut().set_text(PropertyKind::Status, "WAITING");

        item.save_at(now()).unwrap();
        assert_eq!(
            Item::from_file(&item.path).unwrap().status(),
            Some(Status::NeedsAction)
        );
    }

    #[test]
    fn test_status_case_is_normalized() {
        let dir = TempDir::new().unwrap();
        let mut item = Item::new(dir.path(), "x");
        item.vtodo_mut().set_text(PropertyKind::Status, "completed");
        assert_eq!(item.status(), None);

        item.save_at(now()).unwrap();
        let saved = Item::from_file(&item.path).unwrap();
        assert_eq!(saved.status_text().as_deref(), Some("COMPLETED"));
        assert_eq!(saved.status(), Some(Status::Completed));
    }

    #[test]
    fn test_missing_uid_is_generated() {
        let dir = TempDir::new().unwrap();
        let mut item = Item::new(dir.path(), "x");
        item.vtodo_mut().remove(&PropertyKind::Uid);

        item.save_at(now()).unwrap();
        assert!(Item::from_file(&item.path).unwrap().uid().is_some());
    }

    #[test]
    fn test_delete_removes_file() {
        let dir = TempDir::new().unwrap();
        let mut item = Item::new(dir.path(), "x");
        item.save_at(now()).unwrap();
        item.delete().unwrap();
        assert!(!item.path.exists());
    }
}
