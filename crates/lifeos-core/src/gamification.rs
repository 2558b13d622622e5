//! Experience, level, and day-streak transitions.
//!
//! Pure state-transition functions over [`UserProfile`]. No I/O, total
//! over valid inputs. The completion controller calls
//! [`apply_completion`] exactly once per newly created done-log; streak
//! decay on idle days happens at read time through [`effective_streak`].

use chrono::NaiveDate;

use crate::model::UserProfile;

/// XP awarded per completion event.
pub const XP_PER_COMPLETION: u32 = 10;
/// XP needed to clear level `n` is `n * LEVEL_STEP`.
pub const LEVEL_STEP: u32 = 100;

/// Apply one completion event on `today` and return the next profile.
///
/// Awards XP, consumes full level thresholds, and advances the day streak.
/// Idempotent with respect to the streak if invoked twice on the same day.
pub fn apply_completion(profile: &UserProfile, today: NaiveDate) -> UserProfile {
    let mut next = profile.clone();

    next.xp += XP_PER_COMPLETION;
    // Loop rather than a single branch: a variable-XP source may cross
    // more than one threshold in a single award.
    while next.xp >= next.level * LEVEL_STEP {
        next.xp -= next.level * LEVEL_STEP;
        next.level += 1;
    }

    if next.last_activity_day != Some(today) {
        next.streak = match next.last_activity_day {
            None => 1,
            Some(prev) if Some(prev) == today.pred_opt() => next.streak + 1,
            // A gap of two or more days: today's completion starts a new
            // streak, so 1 rather than 0.
            Some(_) => 1,
        };
    }
    next.last_activity_day = Some(today);

    next
}

/// Streak as it should be reported on `today`.
///
/// The stored streak is only ever written on completion, so an idle gap
/// is invisible to the write path. Reads project it to zero once the gap
/// since the last activity reaches two days.
pub fn effective_streak(profile: &UserProfile, today: NaiveDate) -> u32 {
    let Some(last) = profile.last_activity_day else {
        return 0;
    };
    match today.pred_opt() {
        Some(yesterday) if last < yesterday => 0,
        _ => profile.streak,
    }
}
