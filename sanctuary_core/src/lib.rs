#![forbid(unsafe_code)]

//! Core domain model and business logic for the Pet Sanctuary.
//!
//! This crate provides:
//! - Domain types (pets, activities, outcomes)
//! - Activity cooldown readiness
//! - The activity engine and leveling rules
//! - Default activity table and sample pet
//! - Persistence (pet file, activity journal)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod cooldown;
pub mod progression;
pub mod engine;
pub mod state;
pub mod journal;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_activities, default_activities, sample_pet};
pub use config::Config;
pub use cooldown::{activity_state, remaining_minutes, ActivityState};
pub use progression::LevelingRules;
pub use engine::{perform_activity, perform_activity_with_rules};
pub use journal::{ActivityRecord, ActivitySink, JsonlJournal};
