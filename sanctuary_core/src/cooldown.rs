//! Activity readiness.
//!
//! An activity is either `Ready` or `OnCooldown`. The state is never stored:
//! it is derived from `last_used`, the fixed cooldown and the caller's clock.
//! Both the engine and the display layer go through [`activity_state`].

use crate::Activity;
use chrono::{DateTime, Duration, Utc};

/// Computed readiness of an activity at a given instant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityState {
    Ready,
    OnCooldown { remaining: Duration },
}

/// Readiness of `activity` at `now`.
///
/// `elapsed == cooldown` counts as ready. The remaining wait is always
/// `cooldown - elapsed`, so a `now` before `last_used` (clock skew) waits
/// longer than the cooldown itself.
pub fn activity_state(activity: &Activity, now: DateTime<Utc>) -> ActivityState {
    let Some(last_used) = activity.last_used else {
        return ActivityState::Ready;
    };

    let cooldown = activity.cooldown();
    let elapsed = now.signed_duration_since(last_used);

    if elapsed >= cooldown {
        return ActivityState::Ready;
    }

    let remaining = cooldown.checked_sub(&elapsed).unwrap_or(Duration::MAX);
    ActivityState::OnCooldown { remaining }
}

/// Round a wait up to whole minutes for display ("available in N min").
///
/// Any positive wait, however small, is at least one minute.
pub fn remaining_minutes(remaining: Duration) -> i64 {
    if remaining <= Duration::zero() {
        return 0;
    }
    let whole = remaining.num_minutes();
    let exact = Duration::try_minutes(whole).is_some_and(|w| w == remaining);
    if exact {
        whole
    } else {
        whole.saturating_add(1)
    }
}
