//! CSV-backed record tables.
//!
//! Each table is one CSV file loaded fully into memory at open, with an
//! index from record identifier to row position. Creates append a single
//! row to the file; updates and deletes rewrite the file through a temp
//! file in the same directory that is renamed into place.

use crate::error::{PortalError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A row stored in a [`Table`].
pub trait Record: Serialize + DeserializeOwned + Clone {
    fn id(&self) -> &str;
}

pub struct Table<T: Record> {
    path: PathBuf,
    rows: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: Record> Table<T> {
    /// Opens a table, creating an empty file if none exists yet.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if !path.exists() {
            std::fs::File::create(path)?;
        }

        let mut rows = Vec::new();
        let mut reader = csv::Reader::from_path(path)?;
        for row in reader.deserialize() {
            let row: T = row?;
            rows.push(row);
        }

        let mut index = HashMap::with_capacity(rows.len());
        for (pos, row) in rows.iter().enumerate() {
            if index.insert(row.id().to_string(), pos).is_some() {
                return Err(PortalError::Storage(format!(
                    "duplicate identifier '{}' in {}",
                    row.id(),
                    path.display()
                )));
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            rows,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.rows[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Appends a new record to the table and its backing file.
    pub fn insert(&mut self, row: T) -> Result<()> {
        if self.contains(row.id()) {
            return Err(PortalError::Storage(format!(
                "identifier '{}' already exists in {}",
                row.id(),
                self.path.display()
            )));
        }

        let write_headers = std::fs::metadata(&self.path)?.len() == 0;
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_headers)
            .from_writer(file);
        writer.serialize(&row)?;
        writer.flush()?;

        self.index.insert(row.id().to_string(), self.rows.len());
        self.rows.push(row);
        Ok(())
    }

    /// Mutates the record with the given identifier and persists the
    /// change. Returns false when no such record exists.
    pub fn update<F: FnOnce(&mut T)>(&mut self, id: &str, mutate: F) -> Result<bool> {
        let Some(&pos) = self.index.get(id) else {
            return Ok(false);
        };
        mutate(&mut self.rows[pos]);
        if self.rows[pos].id() != id {
            return Err(PortalError::Storage(format!(
                "identifier '{}' must not change on update",
                id
            )));
        }
        self.rewrite()?;
        Ok(true)
    }

    /// Removes the record with the given identifier, returning it.
    pub fn remove(&mut self, id: &str) -> Result<Option<T>> {
        let Some(pos) = self.index.remove(id) else {
            return Ok(None);
        };
        let removed = self.rows.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        self.rewrite()?;
        Ok(Some(removed))
    }

    /// Generates a fresh identifier from the current timestamp, with a
    /// numeric suffix when two records are created within one second.
    pub fn next_id(&self, prefix: &str) -> String {
        let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
        let base = format!("{}_{}", prefix, stamp);
        if !self.contains(&base) {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !self.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn rewrite(&self) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| PortalError::Storage(format!("{} has no parent", self.path.display())))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = csv::Writer::from_writer(&mut tmp);
            for row in &self.rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        tmp.as_file_mut().flush()?;
        tmp.persist(&self.path)
            .map_err(|e| PortalError::Storage(format!("failed to replace table file: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Sample {
        id: String,
        label: String,
        count: u32,
    }

    impl Record for Sample {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn sample(id: &str, label: &str, count: u32) -> Sample {
        Sample {
            id: id.to_string(),
            label: label.to_string(),
            count,
        }
    }

    #[test]
    fn test_insert_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");

        let mut table: Table<Sample> = Table::open(&path).unwrap();
        table.insert(sample("S1", "first", 1)).unwrap();
        table.insert(sample("S2", "second", 2)).unwrap();

        let reloaded: Table<Sample> = Table::open(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("S1").unwrap().label, "first");
        assert_eq!(reloaded.get("S2").unwrap().count, 2);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");

        let mut table: Table<Sample> = Table::open(&path).unwrap();
        table.insert(sample("S1", "first", 1)).unwrap();
        assert!(table.insert(sample("S1", "again", 2)).is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_update_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");

        let mut table: Table<Sample> = Table::open(&path).unwrap();
        table.insert(sample("S1", "first", 1)).unwrap();
        let updated = table.update("S1", |row| row.count = 9).unwrap();
        assert!(updated);
        assert!(!table.update("missing", |row| row.count = 0).unwrap());

        let reloaded: Table<Sample> = Table::open(&path).unwrap();
        assert_eq!(reloaded.get("S1").unwrap().count, 9);
    }

    #[test]
    fn test_remove_persists_and_reindexes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");

        let mut table: Table<Sample> = Table::open(&path).unwrap();
        table.insert(sample("S1", "first", 1)).unwrap();
        table.insert(sample("S2", "second", 2)).unwrap();
        table.insert(sample("S3", "third", 3)).unwrap();

        let removed = table.remove("S2").unwrap().unwrap();
        assert_eq!(removed.label, "second");
        assert_eq!(table.get("S3").unwrap().count, 3);

        let reloaded: Table<Sample> = Table::open(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.get("S2").is_none());
    }

    #[test]
    fn test_next_id_avoids_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");

        let mut table: Table<Sample> = Table::open(&path).unwrap();
        let first = table.next_id("SMP");
        table.insert(sample(&first, "a", 1)).unwrap();
        let second = table.next_id("SMP");
        assert_ne!(first, second);
        table.insert(sample(&second, "b", 2)).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");

        let table: Table<Sample> = Table::open(&path).unwrap();
        assert!(table.is_empty());
    }
}
