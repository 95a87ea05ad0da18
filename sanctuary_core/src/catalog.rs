//! Default activity table and sample pet.
//!
//! The four built-in care activities can be overridden or extended through
//! the `[[activities]]` section of the config file.

use crate::config::Config;
use crate::types::*;
use chrono::Utc;
use once_cell::sync::Lazy;
use std::collections::HashSet;

const HOUR: u64 = 60 * 60;

/// Cached default activity table - built once and reused across all operations
static DEFAULT_ACTIVITIES: Lazy<Vec<Activity>> = Lazy::new(build_default_activities);

/// Get a reference to the cached default activity table
pub fn default_activities() -> &'static [Activity] {
    &DEFAULT_ACTIVITIES
}

fn build_default_activities() -> Vec<Activity> {
    vec![
        Activity {
            id: "feed".into(),
            name: "Feed".into(),
            description: "Give your pet some delicious food".into(),
            effect: ActivityEffect {
                hunger: Some(-30),
                happiness: Some(10),
                health: Some(5),
                experience: Some(5),
            },
            cooldown_seconds: 4 * HOUR,
            last_used: None,
        },
        Activity {
            id: "play".into(),
            name: "Play".into(),
            description: "Play with your pet to increase happiness".into(),
            effect: ActivityEffect {
                happiness: Some(20),
                hunger: Some(10),
                experience: Some(10),
                ..Default::default()
            },
            cooldown_seconds: 2 * HOUR,
            last_used: None,
        },
        Activity {
            id: "train".into(),
            name: "Train".into(),
            description: "Train your pet to learn new skills".into(),
            effect: ActivityEffect {
                experience: Some(20),
                happiness: Some(-5),
                hunger: Some(15),
                ..Default::default()
            },
            cooldown_seconds: 6 * HOUR,
            last_used: None,
        },
        Activity {
            id: "groom".into(),
            name: "Groom".into(),
            description: "Groom your pet to improve health".into(),
            effect: ActivityEffect {
                health: Some(15),
                happiness: Some(5),
                experience: Some(5),
                ..Default::default()
            },
            cooldown_seconds: 12 * HOUR,
            last_used: None,
        },
    ]
}

/// Activity table for a config: defaults, with custom entries replacing
/// a default of the same id or appended in config order.
pub fn build_activities(config: &Config) -> Vec<Activity> {
    let mut activities = default_activities().to_vec();

    for custom in &config.activities {
        let activity = custom.to_activity();
        match activities.iter_mut().find(|a| a.id == activity.id) {
            Some(existing) => {
                tracing::debug!("Overriding built-in activity {}", activity.id);
                *existing = activity;
            }
            None => {
                tracing::debug!("Adding custom activity {}", activity.id);
                activities.push(activity);
            }
        }
    }

    activities
}

/// The sample pet shown on the detail view, carrying the given activities
pub fn sample_pet_with(activities: Vec<Activity>) -> Pet {
    Pet {
        id: "pet-1".into(),
        name: "Fluffy".into(),
        kind: "Cat".into(),
        description: "A playful and curious cat who loves to explore and cuddle.".into(),
        happiness: 80,
        health: 90,
        hunger: 40,
        level: 3,
        experience: 240,
        next_level_experience: 500,
        skills: vec!["Jumping".into(), "Purring".into(), "Pouncing".into()],
        traits: vec!["Playful".into(), "Curious".into(), "Affectionate".into()],
        adopted_at: Utc::now(),
        activities,
    }
}

/// The sample pet with the built-in activities
pub fn sample_pet() -> Pet {
    sample_pet_with(default_activities().to_vec())
}

/// Validate an activity table
///
/// Returns a list of problems (empty if valid).
pub fn validate_activities(activities: &[Activity]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for activity in activities {
        if activity.id.trim().is_empty() {
            errors.push(format!("Activity '{}' has an empty id", activity.name));
        }
        if !seen.insert(activity.id.as_str()) {
            errors.push(format!("Duplicate activity id '{}'", activity.id));
        }
        if activity.effect.is_empty() {
            errors.push(format!("Activity '{}' has no effects", activity.id));
        }
        if activity.cooldown_seconds == 0 {
            errors.push(format!("Activity '{}' has a zero cooldown", activity.id));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomActivity;

    #[test]
    fn test_default_activities() {
        let activities = default_activities();
        let ids: Vec<_> = activities.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["feed", "play", "train", "groom"]);

        let feed = &activities[0];
        assert_eq!(feed.effect.hunger, Some(-30));
        assert_eq!(feed.cooldown_seconds, 4 * 60 * 60);
        assert!(activities.iter().all(|a| a.last_used.is_none()));
    }

    #[test]
    fn test_default_activities_are_valid() {
        assert!(validate_activities(default_activities()).is_empty());
    }

    #[test]
    fn test_sample_pet() {
        let pet = sample_pet();
        assert_eq!(pet.name, "Fluffy");
        assert_eq!(pet.level, 3);
        assert_eq!(pet.experience, 240);
        assert_eq!(pet.next_level_experience, 500);
        assert_eq!(pet.activities.len(), 4);
    }

    #[test]
    fn test_custom_activity_overrides_and_appends() {
        let mut config = Config::default();
        config.activities.push(CustomActivity {
            id: "play".into(),
            name: "Play Fetch".into(),
            description: None,
            effect: ActivityEffect {
                happiness: Some(30),
                ..Default::default()
            },
            cooldown_minutes: 30,
        });
        config.activities.push(CustomActivity {
            id: "walk".into(),
            name: "Walk".into(),
            description: Some("Take a stroll".into()),
            effect: ActivityEffect {
                health: Some(10),
                ..Default::default()
            },
            cooldown_minutes: 60,
        });

        let activities = build_activities(&config);
        assert_eq!(activities.len(), 5);

        let play = activities.iter().find(|a| a.id == "play").unwrap();
        assert_eq!(play.name, "Play Fetch");
        assert_eq!(play.cooldown_seconds, 30 * 60);

        assert_eq!(activities.last().unwrap().id, "walk");
    }

    #[test]
    fn test_validate_catches_problems() {
        let mut activities = default_activities().to_vec();
        activities.push(activities[0].clone());
        activities[1].effect = ActivityEffect::default();
        activities[2].cooldown_seconds = 0;

        let errors = validate_activities(&activities);
        assert_eq!(errors.len(), 3, "{:?}", errors);
    }
}
