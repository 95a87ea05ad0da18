//! Pet file persistence with file locking.
//!
//! This module handles saving and loading the pet record between runs
//! with proper file locking to prevent concurrent access issues.

use crate::catalog::{build_activities, sample_pet_with, validate_activities};
use crate::{Config, Error, Pet, Result, VITAL_MAX};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

impl Pet {
    /// Check the invariants a loaded pet must satisfy
    ///
    /// Returns a list of problems; empty means the pet is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("happiness", self.happiness),
            ("health", self.health),
            ("hunger", self.hunger),
        ] {
            if value > VITAL_MAX {
                errors.push(format!("{} {} is above {}", name, value, VITAL_MAX));
            }
        }
        if self.level == 0 {
            errors.push("level must be at least 1".to_string());
        }
        if self.next_level_experience < 1 {
            errors.push(format!(
                "next_level_experience {} must be positive",
                self.next_level_experience
            ));
        } else if self.experience >= self.next_level_experience {
            errors.push(format!(
                "experience {} has reached next_level_experience {}",
                self.experience, self.next_level_experience
            ));
        }

        errors.extend(validate_activities(&self.activities));
        errors
    }

    /// Load a pet from a file with shared locking
    ///
    /// Returns the sample pet (with the configured activities) if the file
    /// doesn't exist. If the file is corrupted or breaks a pet invariant,
    /// logs a warning and returns the sample pet as well.
    pub fn load(path: &Path, config: &Config) -> Result<Self> {
        let fallback = || sample_pet_with(build_activities(config));

        if !path.exists() {
            tracing::info!("No pet file found, starting with the sample pet");
            return Ok(fallback());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open pet file {:?}: {}. Using sample pet.",
                    path,
                    e
                );
                return Ok(fallback());
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock pet file {:?}: {}. Using sample pet.",
                path,
                e
            );
            return Ok(fallback());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read pet file {:?}: {}. Using sample pet.",
                path,
                e
            );
            return Ok(fallback());
        }

        file.unlock()?;

        match serde_json::from_str::<Pet>(&contents) {
            Ok(pet) => {
                let problems = pet.validate();
                if !problems.is_empty() {
                    tracing::warn!(
                        "Pet file {:?} is invalid: {}. Using sample pet.",
                        path,
                        problems.join("; ")
                    );
                    return Ok(fallback());
                }
                tracing::debug!("Loaded pet {} from {:?}", pet.id, path);
                Ok(pet)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse pet file {:?}: {}. Using sample pet.",
                    path,
                    e
                );
                Ok(fallback())
            }
        }
    }

    /// Save the pet to a file with exclusive locking
    ///
    /// Atomically writes the pet by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Other(format!("pet path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(parent)?;

        // Acquire exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace old pet file
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved pet {} to {:?}", self.id, path);
        Ok(())
    }

    /// Load the pet, modify it, and save it back
    ///
    /// An exclusive lock on a sidecar `<file>.lock` is held from load to
    /// save, so concurrent updates of the same pet run one after another.
    /// The pet is only written when `f` succeeds; a rejected activity leaves
    /// the file untouched.
    pub fn update<F, T>(path: &Path, config: &Config, f: F) -> Result<(Self, T)>
    where
        F: FnOnce(&mut Pet) -> Result<T>,
    {
        let lock = acquire_update_lock(path)?;

        let mut pet = Self::load(path, config)?;
        let value = f(&mut pet)?;
        pet.save(path)?;

        lock.unlock()?;
        Ok((pet, value))
    }
}

/// Lock file guarding read-modify-write cycles on `path`
fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    path.with_file_name(name)
}

/// Open the lock file and block until we hold it exclusively.
/// Dropping the returned file releases the lock on every exit path.
fn acquire_update_lock(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path(path))?;
    file.lock_exclusive()?;
    Ok(file)
}
