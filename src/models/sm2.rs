//! SM-2 style spaced repetition scheduling, discretized to four ratings.
//!
//! - again: ease drops, repetitions reset, fixed relearn interval
//! - hard: ease drops, interval grows slowly (at least one day)
//! - good: ease unchanged, interval multiplied by ease
//! - easy: ease rises, interval multiplied by ease and an easy bonus
//!
//! The ease factor never falls below `minimum_ease_factor`. The next due date is
//! always computed from the review instant, never from the previous due date.

use super::{Rating, ReviewHistoryEntry, ReviewItem};
use crate::error::ConfigError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tunable constants of the scheduler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulingPolicy {
    pub initial_ease_factor: f64,
    pub minimum_ease_factor: f64,
    pub relearn_interval_days: u32,
    pub again_ease_penalty: f64,
    pub hard_ease_penalty: f64,
    pub easy_ease_bonus: f64,
    pub hard_interval_multiplier: f64,
    pub easy_interval_bonus: f64,
    pub first_good_interval_days: u32,
    pub first_easy_interval_days: u32,
    /// Repetition count at which an item counts as fully mastered.
    pub mastery_repetitions: u32,
    /// Upper bound on any scheduled interval.
    pub maximum_interval_days: u32,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            initial_ease_factor: 2.5,
            minimum_ease_factor: 1.3,
            relearn_interval_days: 1,
            again_ease_penalty: 0.20,
            hard_ease_penalty: 0.15,
            easy_ease_bonus: 0.15,
            hard_interval_multiplier: 1.2,
            easy_interval_bonus: 1.3,
            first_good_interval_days: 1,
            first_easy_interval_days: 2,
            mastery_repetitions: 5,
            maximum_interval_days: 36500,
        }
    }
}

impl SchedulingPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let factors = [
            ("initialEaseFactor", self.initial_ease_factor),
            ("minimumEaseFactor", self.minimum_ease_factor),
            ("hardIntervalMultiplier", self.hard_interval_multiplier),
            ("easyIntervalBonus", self.easy_interval_bonus),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidPolicy(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        let steps = [
            ("againEasePenalty", self.again_ease_penalty),
            ("hardEasePenalty", self.hard_ease_penalty),
            ("easyEaseBonus", self.easy_ease_bonus),
        ];
        for (name, value) in steps {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidPolicy(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.minimum_ease_factor > self.initial_ease_factor {
            return Err(ConfigError::InvalidPolicy(format!(
                "minimumEaseFactor {} exceeds initialEaseFactor {}",
                self.minimum_ease_factor, self.initial_ease_factor
            )));
        }
        if self.mastery_repetitions == 0 {
            return Err(ConfigError::InvalidPolicy(
                "masteryRepetitions must be at least 1".to_string(),
            ));
        }
        if self.maximum_interval_days == 0 {
            return Err(ConfigError::InvalidPolicy(
                "maximumIntervalDays must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Computes the item's state after being rated `rating` at `now`.
pub fn calculate_next_review(
    item: &ReviewItem,
    rating: Rating,
    now: DateTime<Utc>,
    policy: &SchedulingPolicy,
) -> ReviewItem {
    let prev_interval = item.interval_days;
    let floor = policy.minimum_ease_factor;

    let (ease_factor, interval_days, repetition_count) = match rating {
        Rating::Again => (
            (item.ease_factor - policy.again_ease_penalty).max(floor),
            policy.relearn_interval_days,
            0,
        ),
        Rating::Hard => {
            let grown = scale_days(prev_interval, policy.hard_interval_multiplier);
            (
                (item.ease_factor - policy.hard_ease_penalty).max(floor),
                grown.max(prev_interval.saturating_add(1)),
                item.repetition_count.saturating_add(1),
            )
        }
        Rating::Good => {
            // Stored ease may predate a stricter floor.
            let ease = item.ease_factor.max(floor);
            let interval = if prev_interval == 0 {
                policy.first_good_interval_days
            } else {
                scale_days(prev_interval, ease)
            };
            (ease, interval, item.repetition_count.saturating_add(1))
        }
        Rating::Easy => {
            let ease = (item.ease_factor + policy.easy_ease_bonus).max(floor);
            let interval = if prev_interval == 0 {
                policy.first_easy_interval_days
            } else {
                scale_days(prev_interval, ease * policy.easy_interval_bonus)
            };
            (ease, interval, item.repetition_count.saturating_add(1))
        }
    };

    let interval_days = interval_days.min(policy.maximum_interval_days);

    let mut review_history = item.review_history.clone();
    review_history.push(ReviewHistoryEntry {
        reviewed_at: now,
        performance: rating,
    });

    ReviewItem {
        id: item.id.clone(),
        ease_factor,
        interval_days,
        repetition_count,
        due_at: due_after(now, interval_days),
        last_reviewed_at: Some(now),
        last_performance: Some(rating),
        review_history,
    }
}

/// `now + days`, saturating at the latest representable instant.
fn due_after(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(days))
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// `round(days * factor)`, saturating at `u32::MAX`.
fn scale_days(days: u32, factor: f64) -> u32 {
    (f64::from(days) * factor).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap()
    }

    fn item_with(ease_factor: f64, interval_days: u32, repetition_count: u32) -> ReviewItem {
        ReviewItem {
            ease_factor,
            interval_days,
            repetition_count,
            ..ReviewItem::new("vscode.palette", 2.5, t0())
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_again_resets_and_relearns() {
        let policy = SchedulingPolicy::default();
        let item = item_with(2.5, 40, 7);
        let now = t0() + Duration::days(3);

        let next = calculate_next_review(&item, Rating::Again, now, &policy);
        assert!(close(next.ease_factor, 2.3));
        assert_eq!(next.repetition_count, 0);
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.due_at, now + Duration::days(1));
        assert_eq!(next.last_reviewed_at, Some(now));
        assert_eq!(next.last_performance, Some(Rating::Again));
    }

    #[test]
    fn test_hard_grows_at_least_one_day() {
        let policy = SchedulingPolicy::default();

        let next = calculate_next_review(&item_with(2.5, 0, 0), Rating::Hard, t0(), &policy);
        assert_eq!(next.interval_days, 1);
        assert!(close(next.ease_factor, 2.35));
        assert_eq!(next.repetition_count, 1);

        // 2 * 1.2 = 2.4 rounds to 2, so the +1 floor applies
        let next = calculate_next_review(&item_with(2.5, 2, 1), Rating::Hard, t0(), &policy);
        assert_eq!(next.interval_days, 3);

        let next = calculate_next_review(&item_with(2.5, 10, 3), Rating::Hard, t0(), &policy);
        assert_eq!(next.interval_days, 12);
    }

    #[test]
    fn test_good_keeps_ease_and_multiplies() {
        let policy = SchedulingPolicy::default();

        let first = calculate_next_review(&item_with(2.5, 0, 0), Rating::Good, t0(), &policy);
        assert_eq!(first.interval_days, 1);
        assert!(close(first.ease_factor, 2.5));

        let second = calculate_next_review(&first, Rating::Good, t0(), &policy);
        assert_eq!(second.interval_days, (1.0_f64 * 2.5).round() as u32);
        assert_eq!(second.repetition_count, 2);

        let later = calculate_next_review(&item_with(2.0, 10, 4), Rating::Good, t0(), &policy);
        assert_eq!(later.interval_days, 20);
    }

    #[test]
    fn test_easy_uses_bonus() {
        let policy = SchedulingPolicy::default();

        let first = calculate_next_review(&item_with(2.5, 0, 0), Rating::Easy, t0(), &policy);
        assert_eq!(first.interval_days, 2);
        assert!(close(first.ease_factor, 2.65));
        assert_eq!(first.due_at, t0() + Duration::days(2));

        // 10 * 2.15 * 1.3 = 27.95
        let later = calculate_next_review(&item_with(2.0, 10, 2), Rating::Easy, t0(), &policy);
        assert_eq!(later.interval_days, 28);
    }

    #[test]
    fn test_ef_floor() {
        let policy = SchedulingPolicy::default();
        let mut item = item_with(1.35, 5, 2);

        for rating in [Rating::Again, Rating::Hard, Rating::Again, Rating::Hard] {
            item = calculate_next_review(&item, rating, t0(), &policy);
            assert!(item.ease_factor >= 1.3);
        }
        assert!(close(item.ease_factor, 1.3));
    }

    #[test]
    fn test_interval_capped_by_policy() {
        let policy = SchedulingPolicy::default();
        let mut item = item_with(2.5, 0, 0);

        for _ in 0..40 {
            item = calculate_next_review(&item, Rating::Easy, t0(), &policy);
            assert!(item.interval_days <= policy.maximum_interval_days);
        }
        assert_eq!(item.interval_days, 36500);
        assert_eq!(item.due_at, t0() + Duration::days(36500));
    }

    #[test]
    fn test_due_date_saturates_near_end_of_time() {
        let policy = SchedulingPolicy {
            maximum_interval_days: u32::MAX,
            ..SchedulingPolicy::default()
        };
        let item = item_with(2.5, u32::MAX / 2, 9);

        let next = calculate_next_review(&item, Rating::Easy, t0(), &policy);
        assert_eq!(next.interval_days, u32::MAX);
        assert_eq!(next.due_at, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_due_date_ignores_stale_due_at() {
        let policy = SchedulingPolicy::default();
        let mut item = item_with(2.5, 6, 2);
        item.due_at = t0() - Duration::days(30);
        let now = t0();

        let next = calculate_next_review(&item, Rating::Good, now, &policy);
        assert_eq!(next.due_at, now + Duration::days(15));
    }

    #[test]
    fn test_history_is_appended() {
        let policy = SchedulingPolicy::default();
        let item = item_with(2.5, 0, 0);

        let once = calculate_next_review(&item, Rating::Good, t0(), &policy);
        let twice = calculate_next_review(&once, Rating::Hard, t0() + Duration::days(1), &policy);

        assert_eq!(twice.review_history.len(), 2);
        assert_eq!(twice.review_history[0].performance, Rating::Good);
        assert_eq!(twice.review_history[1].reviewed_at, t0() + Duration::days(1));
    }

    #[test]
    fn test_policy_validation() {
        assert!(SchedulingPolicy::default().validate().is_ok());

        let policy = SchedulingPolicy {
            minimum_ease_factor: 3.0,
            ..SchedulingPolicy::default()
        };
        assert!(policy.validate().is_err());

        let policy = SchedulingPolicy {
            hard_interval_multiplier: f64::NAN,
            ..SchedulingPolicy::default()
        };
        assert!(policy.validate().is_err());

        let policy = SchedulingPolicy {
            mastery_repetitions: 0,
            ..SchedulingPolicy::default()
        };
        assert!(policy.validate().is_err());

        let policy = SchedulingPolicy {
            maximum_interval_days: 0,
            ..SchedulingPolicy::default()
        };
        assert!(policy.validate().is_err());
    }
}
