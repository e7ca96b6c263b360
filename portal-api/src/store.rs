//! Per-record CSV store
//!
//! One CSV file per record, single data row under a fixed header derived
//! from the record struct. When a database is configured these files are
//! a derived export; without one they are the store of record. Listing
//! re-reads the directory on every call, in sorted filename order, and
//! skips files it cannot parse.

use std::path::{Path, PathBuf};

use portal_common::model::{ServiceRequest, ServiceRequestSummary};
use portal_common::{Error, Result};
use tracing::warn;

/// Filesystem-backed record store rooted at one directory
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the store reads and writes
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one record to `filename`, header row included
    pub fn write(&self, record: &ServiceRequest, filename: &str) -> Result<()> {
        let path = self.dir.join(filename);
        let mut writer = csv::Writer::from_path(&path)?;
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    /// Read the single record held by `filename`; `None` if the file is
    /// absent.
    pub fn read(&self, filename: &str) -> Result<Option<ServiceRequest>> {
        let path = self.dir.join(filename);
        if !path.is_file() {
            return Ok(None);
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let record = reader
            .deserialize::<ServiceRequest>()
            .next()
            .transpose()?
            .ok_or_else(|| Error::InvalidInput(format!("{} has no data row", filename)))?;

        Ok(Some(record))
    }

    /// Summaries of every readable record, sorted by filename
    pub fn list(&self) -> Vec<ServiceRequestSummary> {
        let mut summaries = Vec::new();

        for filename in self.sorted_csv_files() {
            match self.read(&filename) {
                Ok(Some(record)) => {
                    let mut summary = ServiceRequestSummary::from(&record);
                    summary.file = Some(filename);
                    summaries.push(summary);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Skipping unreadable record file {}: {}", filename, e);
                }
            }
        }

        summaries
    }

    /// Find the file carrying `guid`, returning its name and record
    pub fn find_by_guid(&self, guid: &str) -> Result<Option<(String, ServiceRequest)>> {
        for filename in self.sorted_csv_files() {
            match self.read(&filename) {
                Ok(Some(record)) if record.guid == guid => {
                    return Ok(Some((filename, record)));
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Skipping unreadable record file {}: {}", filename, e);
                }
            }
        }
        Ok(None)
    }

    /// Remove a record file; `false` if it was already gone
    pub fn remove(&self, filename: &str) -> Result<bool> {
        let path = self.dir.join(filename);
        if !path.is_file() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        Ok(true)
    }

    fn sorted_csv_files(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot read records directory {}: {}", self.dir.display(), e);
                return Vec::new();
            }
        };

        let mut files: Vec<String> = entries
            .flatten()
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.to_lowercase().ends_with(".csv"))
            .collect();
        files.sort();
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(guid: &str, title: &str) -> ServiceRequest {
        ServiceRequest {
            guid: guid.to_string(),
            organization: "Dept X".into(),
            title: title.to_string(),
            activity_type: "Construction".into(),
            activity_spec: "Carpenter".into(),
            description: "Repair fence".into(),
            other_info: String::new(),
            address: "Main St".into(),
            number: "S/N".into(),
            neighborhood: "Downtown".into(),
            payment_method: "Cash".into(),
            payment_term: "30 days".into(),
            expiration_date: "2025-12-01".into(),
            execution_deadline: "2025-12-31".into(),
        }
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());
        let record = sample("g-1", "Fix Fence");

        store.write(&record, "Fix_Fence_20251103_143005.csv").unwrap();
        let back = store
            .read("Fix_Fence_20251103_143005.csv")
            .unwrap()
            .unwrap();

        assert_eq!(back.guid, record.guid);
        assert_eq!(back.title, record.title);
        assert_eq!(back.number, "S/N");
        assert_eq!(back.execution_deadline, record.execution_deadline);
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());
        assert!(store.list().is_empty());
    }

    #[test]
    fn listing_projects_summaries_in_filename_order() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());
        store.write(&sample("g-2", "Paint Wall"), "b_paint.csv").unwrap();
        store.write(&sample("g-1", "Fix Fence"), "a_fence.csv").unwrap();

        let summaries = store.list();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].file.as_deref(), Some("a_fence.csv"));
        assert_eq!(summaries[0].title, "Fix Fence");
        assert_eq!(summaries[0].neighborhood, "Downtown");
        assert_eq!(summaries[1].guid, "g-2");
    }

    #[test]
    fn unreadable_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());
        store.write(&sample("g-1", "Fix Fence"), "ok.csv").unwrap();
        std::fs::write(dir.path().join("broken.csv"), "not,a\nrecord").unwrap();

        let summaries = store.list();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].guid, "g-1");
    }

    #[test]
    fn find_by_guid_and_remove() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());
        store.write(&sample("g-9", "Fix Fence"), "fence.csv").unwrap();

        let (filename, record) = store.find_by_guid("g-9").unwrap().unwrap();
        assert_eq!(filename, "fence.csv");
        assert_eq!(record.title, "Fix Fence");

        assert!(store.find_by_guid("missing").unwrap().is_none());
        assert!(store.remove("fence.csv").unwrap());
        assert!(!store.remove("fence.csv").unwrap());
        assert!(store.find_by_guid("g-9").unwrap().is_none());
    }
}
