//! Pet activity engine.
//!
//! Performing an activity:
//! 1. Look up the activity on the pet
//! 2. Reject if its cooldown has not elapsed (pet untouched)
//! 3. Apply stat deltas, clamping vitals to 0..=100
//! 4. Resolve level-ups from the new experience total
//! 5. Stamp the activity's `last_used`

use crate::cooldown::{activity_state, remaining_minutes, ActivityState};
use crate::progression::{resolve_level_ups, LevelingRules};
use crate::{ActivityOutcome, AppliedEffect, Error, Pet, Result, Stat, VITAL_MAX};
use chrono::{DateTime, Utc};

/// Perform `activity_id` on `pet` at `now` with the default leveling rules
pub fn perform_activity(
    pet: &mut Pet,
    activity_id: &str,
    now: DateTime<Utc>,
) -> Result<ActivityOutcome> {
    perform_activity_with_rules(pet, activity_id, now, &LevelingRules::default())
}

/// Perform `activity_id` on `pet` at `now`
///
/// On error the pet is left exactly as it was.
pub fn perform_activity_with_rules(
    pet: &mut Pet,
    activity_id: &str,
    now: DateTime<Utc>,
    rules: &LevelingRules,
) -> Result<ActivityOutcome> {
    let activity = pet
        .activity(activity_id)
        .ok_or_else(|| Error::ActivityNotFound(activity_id.to_string()))?;

    if let ActivityState::OnCooldown { remaining } = activity_state(activity, now) {
        let minutes = remaining_minutes(remaining);
        tracing::info!(
            "{} on {} rejected: {} min of cooldown left",
            activity.id,
            pet.name,
            minutes
        );
        return Err(Error::CooldownActive {
            activity_id: activity.id.clone(),
            activity_name: activity.name.clone(),
            remaining,
            remaining_minutes: minutes,
        });
    }

    let activity_name = activity.name.clone();
    let deltas = activity.effect.deltas();

    let mut effects = Vec::with_capacity(deltas.len());
    for (stat, delta) in deltas {
        let before = pet.stat(stat);
        apply_delta(pet, stat, delta);
        effects.push(AppliedEffect {
            stat,
            delta,
            before,
            after: pet.stat(stat),
        });
    }

    let levels_gained = resolve_level_ups(pet, rules);

    if let Some(activity) = pet.activity_mut(activity_id) {
        activity.last_used = Some(now);
    }

    tracing::info!(
        "Performed {} on {} ({} effect(s), level {})",
        activity_id,
        pet.name,
        effects.len(),
        pet.level
    );

    Ok(ActivityOutcome {
        activity_id: activity_id.to_string(),
        activity_name,
        performed_at: now,
        effects,
        levels_gained,
        level: pet.level,
    })
}

fn apply_delta(pet: &mut Pet, stat: Stat, delta: i32) {
    match stat {
        Stat::Happiness => pet.happiness = clamp_vital(pet.happiness, delta),
        Stat::Health => pet.health = clamp_vital(pet.health, delta),
        Stat::Hunger => pet.hunger = clamp_vital(pet.hunger, delta),
        Stat::Experience => {
            // Not clamped; activity tables are expected to grant non-negative experience
            pet.experience = pet.experience.saturating_add(i64::from(delta));
        }
    }
}

fn clamp_vital(current: u8, delta: i32) -> u8 {
    let value = i64::from(current) + i64::from(delta);
    value.clamp(0, i64::from(VITAL_MAX)) as u8
}
