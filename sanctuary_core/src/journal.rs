//! Activity journal.
//!
//! Successful activities are appended to a JSONL (JSON Lines) file with
//! file locking to ensure safe concurrent access. The journal backs the
//! activity history view.

use crate::{ActivityOutcome, AppliedEffect, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One successful activity, as written to the journal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityRecord {
    pub id: Uuid,
    pub pet_id: String,
    pub activity_id: String,
    pub activity_name: String,
    pub performed_at: DateTime<Utc>,
    pub effects: Vec<AppliedEffect>,
    pub levels_gained: u32,
    pub level_after: u32,
}

impl ActivityRecord {
    pub fn from_outcome(pet_id: &str, outcome: &ActivityOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            pet_id: pet_id.to_string(),
            activity_id: outcome.activity_id.clone(),
            activity_name: outcome.activity_name.clone(),
            performed_at: outcome.performed_at,
            effects: outcome.effects.clone(),
            levels_gained: outcome.levels_gained,
            level_after: outcome.level,
        }
    }
}

/// Sink for successful activities
pub trait ActivitySink {
    fn append(&mut self, record: &ActivityRecord) -> Result<()>;
}

/// JSONL-based activity journal with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    /// Create a new journal for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl ActivitySink for JsonlJournal {
    fn append(&mut self, record: &ActivityRecord) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended {} record {} to journal", record.activity_id, record.id);
        Ok(())
    }
}

/// Read all records from a journal file
///
/// Malformed lines are skipped with a warning.
pub fn read_records(path: &Path) -> Result<Vec<ActivityRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<ActivityRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse journal record at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} records from journal", records.len());
    Ok(records)
}

/// Most recent records for a pet, newest first
pub fn recent_history(path: &Path, pet_id: &str, limit: usize) -> Result<Vec<ActivityRecord>> {
    let mut records: Vec<_> = read_records(path)?
        .into_iter()
        .filter(|r| r.pet_id == pet_id)
        .collect();

    records.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
    records.truncate(limit);

    tracing::debug!("Loaded {} history records for pet {}", records.len(), pet_id);
    Ok(records)
}
