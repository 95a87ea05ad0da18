//! Leveling logic for pets.
//!
//! Experience accumulates from activities. Whenever it reaches the current
//! threshold the pet gains a level, the threshold is subtracted, and the
//! threshold grows by the configured factor:
//! - threshold 100 with factor 1.5 → 150 → 225 → 337 ...
//!
//! Thresholds always grow by at least one point per level, so even a tiny
//! threshold or a flat factor cannot turn one activity into millions of levels.

use crate::{Error, Pet, Result};
use serde::{Deserialize, Serialize};

/// Parameters for experience threshold growth
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LevelingRules {
    #[serde(default = "default_growth_factor")]
    pub growth_factor: f64,
}

impl Default for LevelingRules {
    fn default() -> Self {
        Self {
            growth_factor: default_growth_factor(),
        }
    }
}

fn default_growth_factor() -> f64 {
    1.5
}

impl LevelingRules {
    /// A factor below 1.0 would shrink thresholds level over level
    pub fn validate(&self) -> Result<()> {
        if !self.growth_factor.is_finite() || self.growth_factor < 1.0 {
            return Err(Error::Config(format!(
                "leveling.growth_factor must be a finite number >= 1.0, got {}",
                self.growth_factor
            )));
        }
        Ok(())
    }
}

/// Threshold for the level after one whose threshold was `current`
///
/// `floor(current * factor)`, but strictly greater than `current`.
pub fn next_threshold(current: i64, rules: &LevelingRules) -> i64 {
    let grown = (current as f64 * rules.growth_factor).floor();
    let grown = if grown >= i64::MAX as f64 {
        i64::MAX
    } else {
        grown as i64
    };
    grown.max(current.saturating_add(1)).max(1)
}

/// Apply every level-up the pet's experience allows
///
/// Returns the number of levels gained. A single large experience gain can
/// resolve several levels in one call.
pub fn resolve_level_ups(pet: &mut Pet, rules: &LevelingRules) -> u32 {
    // Guard against a hand-edited pet file with a non-positive threshold
    if pet.next_level_experience < 1 {
        tracing::warn!(
            "Pet {} has invalid threshold {}, resetting to 1",
            pet.id,
            pet.next_level_experience
        );
        pet.next_level_experience = 1;
    }

    let mut gained = 0;
    while pet.experience >= pet.next_level_experience {
        pet.level = pet.level.saturating_add(1);
        pet.experience -= pet.next_level_experience;
        pet.next_level_experience = next_threshold(pet.next_level_experience, rules);
        gained += 1;

        tracing::debug!(
            "{} reached level {} ({} / {} xp)",
            pet.name,
            pet.level,
            pet.experience,
            pet.next_level_experience
        );
    }

    if gained > 0 {
        tracing::info!("{} gained {} level(s), now level {}", pet.name, gained, pet.level);
    }

    gained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_pet;

    fn pet_with_xp(experience: i64, threshold: i64) -> Pet {
        let mut pet = sample_pet();
        pet.level = 1;
        pet.experience = experience;
        pet.next_level_experience = threshold;
        pet
    }

    #[test]
    fn test_next_threshold_floors() {
        let rules = LevelingRules::default();
        assert_eq!(next_threshold(100, &rules), 150);
        assert_eq!(next_threshold(150, &rules), 225);
        assert_eq!(next_threshold(225, &rules), 337);
        assert_eq!(next_threshold(500, &rules), 750);
    }

    #[test]
    fn test_next_threshold_always_grows() {
        let flat = LevelingRules { growth_factor: 1.0 };
        assert_eq!(next_threshold(1, &flat), 2);
        assert_eq!(next_threshold(100, &flat), 101);
        assert_eq!(next_threshold(1, &LevelingRules::default()), 2);
        assert_eq!(next_threshold(0, &LevelingRules::default()), 1);
        assert_eq!(next_threshold(i64::MAX, &LevelingRules::default()), i64::MAX);
    }

    #[test]
    fn test_no_level_up_below_threshold() {
        let mut pet = pet_with_xp(99, 100);
        assert_eq!(resolve_level_ups(&mut pet, &LevelingRules::default()), 0);
        assert_eq!(pet.level, 1);
        assert_eq!(pet.experience, 99);
    }

    #[test]
    fn test_exact_threshold_levels_up() {
        let mut pet = pet_with_xp(100, 100);
        assert_eq!(resolve_level_ups(&mut pet, &LevelingRules::default()), 1);
        assert_eq!(pet.level, 2);
        assert_eq!(pet.experience, 0);
        assert_eq!(pet.next_level_experience, 150);
    }

    #[test]
    fn test_multiple_level_ups() {
        // 35 xp spends 10, then 15; the 10 left is below the next threshold of 22
        let mut pet = pet_with_xp(35, 10);
        assert_eq!(resolve_level_ups(&mut pet, &LevelingRules::default()), 2);
        assert_eq!(pet.level, 3);
        assert_eq!(pet.experience, 10);
        assert_eq!(pet.next_level_experience, 22);
    }

    #[test]
    fn test_flat_growth_still_raises_threshold() {
        // Thresholds 1, 2, ..., 44 spend 990 xp; 10 is left against 45
        let rules = LevelingRules { growth_factor: 1.0 };
        let mut pet = pet_with_xp(1000, 1);
        assert_eq!(resolve_level_ups(&mut pet, &rules), 44);
        assert_eq!(pet.level, 45);
        assert_eq!(pet.experience, 10);
        assert_eq!(pet.next_level_experience, 45);
    }

    #[test]
    fn test_huge_gain_from_tiny_threshold_stays_bounded() {
        let mut pet = pet_with_xp(50_000_000, 1);
        let gained = resolve_level_ups(&mut pet, &LevelingRules::default());

        assert!(gained > 1 && gained < 100, "gained {} levels", gained);
        assert_eq!(pet.level, 1 + gained);
        assert!(pet.experience >= 0);
        assert!(pet.experience < pet.next_level_experience);
    }

    #[test]
    fn test_invalid_threshold_is_repaired() {
        let mut pet = pet_with_xp(0, 0);
        assert_eq!(resolve_level_ups(&mut pet, &LevelingRules::default()), 0);
        assert_eq!(pet.next_level_experience, 1);
    }

    #[test]
    fn test_rules_validation() {
        assert!(LevelingRules::default().validate().is_ok());
        assert!(LevelingRules { growth_factor: 0.9 }.validate().is_err());
        assert!(LevelingRules {
            growth_factor: f64::NAN
        }
        .validate()
        .is_err());
    }
}
