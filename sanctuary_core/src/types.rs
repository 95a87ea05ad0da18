//! Core domain types for the Pet Sanctuary system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Pets and their vitals/leveling state
//! - Activities and their stat effects
//! - Outcomes reported back to the display layer

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound for every vital stat
pub const VITAL_MAX: u8 = 100;

// ============================================================================
// Stat Types
// ============================================================================

/// A stat an activity can affect
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Happiness,
    Health,
    Hunger,
    Experience,
}

impl Stat {
    /// Vitals are clamped to `[0, VITAL_MAX]`; experience is not
    pub fn is_vital(self) -> bool {
        !matches!(self, Stat::Experience)
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stat::Happiness => "Happiness",
            Stat::Health => "Health",
            Stat::Hunger => "Hunger",
            Stat::Experience => "Experience",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Activity Types
// ============================================================================

/// Signed stat deltas applied by an activity. Absent fields leave the stat alone.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ActivityEffect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub happiness: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hunger: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<i32>,
}

impl ActivityEffect {
    /// Present deltas in application order (vitals first, experience last)
    pub fn deltas(&self) -> Vec<(Stat, i32)> {
        [
            (Stat::Happiness, self.happiness),
            (Stat::Health, self.health),
            (Stat::Hunger, self.hunger),
            (Stat::Experience, self.experience),
        ]
        .into_iter()
        .filter_map(|(stat, delta)| delta.map(|d| (stat, d)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas().is_empty()
    }
}

/// A care activity (feed, play, train, groom) owned by a pet
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Activity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub effect: ActivityEffect,
    pub cooldown_seconds: u64,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
}

impl Activity {
    /// Fixed cooldown as a chrono duration
    pub fn cooldown(&self) -> Duration {
        i64::try_from(self.cooldown_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

// ============================================================================
// Pet Types
// ============================================================================

/// A pet with vitals, leveling state and its activities
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub description: String,
    pub happiness: u8,
    pub health: u8,
    pub hunger: u8,
    pub level: u32,
    pub experience: i64,
    pub next_level_experience: i64,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    pub adopted_at: DateTime<Utc>,
    pub activities: Vec<Activity>,
}

impl Pet {
    pub fn activity(&self, activity_id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == activity_id)
    }

    pub fn activity_mut(&mut self, activity_id: &str) -> Option<&mut Activity> {
        self.activities.iter_mut().find(|a| a.id == activity_id)
    }

    /// Current value of a stat, widened so vitals and experience share a type
    pub fn stat(&self, stat: Stat) -> i64 {
        match stat {
            Stat::Happiness => i64::from(self.happiness),
            Stat::Health => i64::from(self.health),
            Stat::Hunger => i64::from(self.hunger),
            Stat::Experience => self.experience,
        }
    }

    /// Progress toward the next level in percent, for progress bars
    pub fn level_progress_percent(&self) -> u8 {
        if self.next_level_experience <= 0 {
            return 0;
        }
        let pct = self.experience.max(0).saturating_mul(100) / self.next_level_experience;
        pct.clamp(0, i64::from(VITAL_MAX)) as u8
    }
}

// ============================================================================
// Outcome Types
// ============================================================================

/// One stat change produced by a successful activity
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppliedEffect {
    pub stat: Stat,
    pub delta: i32,
    pub before: i64,
    pub after: i64,
}

/// Facts about a successful activity, for notifications and the journal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityOutcome {
    pub activity_id: String,
    pub activity_name: String,
    pub performed_at: DateTime<Utc>,
    pub effects: Vec<AppliedEffect>,
    pub levels_gained: u32,
    pub level: u32,
}

impl ActivityOutcome {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}
