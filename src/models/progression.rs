//! Mastery progression rules for "hard"/"easy" answers.
//!
//! - A "hard" answer drops the card back to tier 0 and stamps `last_hard_date`.
//!   The review date is untouched; the card is retried later in the same session.
//! - An "easy" answer on a card marked hard earlier the same calendar day only
//!   pushes it to tomorrow, so one shaky session cannot over-credit it.
//! - Otherwise "easy" advances one tier and schedules the next review from the
//!   tier's interval (2, 4, 7, 14 days). Tier 100 keeps advancing by 14 days.
//!
//! All functions are pure: `now` is injected and its time zone defines the
//! calendar used for same-day checks and day arithmetic.

use super::{MasteryTier, ReviewData};
use chrono::{DateTime, Days, Duration, TimeZone, Utc};

/// Marks a card as answered "hard".
pub fn answer_hard<Tz: TimeZone>(review: &ReviewData, now: &DateTime<Tz>) -> ReviewData {
    ReviewData {
        mastery_tier: MasteryTier::New,
        last_hard_date: Some(now.with_timezone(&Utc)),
        ..review.clone()
    }
}

/// Marks a card as answered "easy".
pub fn answer_easy<Tz: TimeZone>(review: &ReviewData, now: &DateTime<Tz>) -> ReviewData {
    let hard_today = review
        .last_hard_date
        .is_some_and(|hard| is_same_day(&hard, now));

    let (tier, days) = if hard_today {
        (review.mastery_tier, 1)
    } else {
        (review.mastery_tier.next(), review.mastery_tier.interval_days())
    };

    // Review dates only move forward; a card studied ahead of schedule keeps
    // its later date.
    let next_review_date = add_days(now, days).max(review.next_review_date);

    ReviewData {
        mastery_tier: tier,
        next_review_date,
        ..review.clone()
    }
}

/// "Reset Learning Data": back to tier 0, no hard mark, due right away.
pub fn reset<Tz: TimeZone>(review: &ReviewData, now: &DateTime<Tz>) -> ReviewData {
    ReviewData::new(review.flashcard_id, now.with_timezone(&Utc))
}

/// True when `instant` falls on the same calendar day as `now` in `now`'s zone.
pub fn is_same_day<Tz: TimeZone>(instant: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    instant.with_timezone(&now.timezone()).date_naive() == now.date_naive()
}

/// True when the card may be studied at `now`: its review date is today or earlier.
pub fn is_due<Tz: TimeZone>(review: &ReviewData, now: &DateTime<Tz>) -> bool {
    review.next_review_date.with_timezone(&now.timezone()).date_naive() <= now.date_naive()
}

/// Adds calendar days in `now`'s zone, falling back to whole 24h spans when the
/// local wall-clock time does not exist on the target day.
fn add_days<Tz: TimeZone>(now: &DateTime<Tz>, days: u64) -> DateTime<Utc> {
    now.clone()
        .checked_add_days(Days::new(days))
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc) + Duration::days(days as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn review(tier: MasteryTier, last_hard: Option<DateTime<Utc>>, next: DateTime<Utc>) -> ReviewData {
        ReviewData {
            flashcard_id: 1,
            mastery_tier: tier,
            last_hard_date: last_hard,
            next_review_date: next,
        }
    }

    fn tier_strategy() -> impl Strategy<Value = MasteryTier> {
        prop::sample::select(MasteryTier::ALL.to_vec())
    }

    #[test]
    fn test_easy_advances_half_to_three_quarters() {
        let now = at(2024, 1, 1, 0);
        let card = review(MasteryTier::Half, None, now);

        let next = answer_easy(&card, &now);
        assert_eq!(next.mastery_tier, MasteryTier::ThreeQuarters);
        assert_eq!(next.next_review_date, at(2024, 1, 8, 0));
    }

    #[test]
    fn test_easy_after_same_day_hard_only_pushes_to_tomorrow() {
        let now = at(2024, 1, 1, 18);
        let card = review(MasteryTier::ThreeQuarters, Some(at(2024, 1, 1, 9)), at(2024, 1, 1, 0));

        let next = answer_easy(&card, &now);
        assert_eq!(next.mastery_tier, MasteryTier::ThreeQuarters);
        assert_eq!(
            next.next_review_date.date_naive(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_easy_at_mastered_still_moves_date() {
        let now = at(2024, 3, 10, 12);
        let card = review(MasteryTier::Mastered, None, now);

        let next = answer_easy(&card, &now);
        assert_eq!(next.mastery_tier, MasteryTier::Mastered);
        assert_eq!(next.next_review_date, at(2024, 3, 24, 12));
    }

    #[test]
    fn test_hard_from_yesterday_does_not_block_progress() {
        let now = at(2024, 1, 2, 8);
        let card = review(MasteryTier::New, Some(at(2024, 1, 1, 23)), at(2024, 1, 2, 0));

        let next = answer_easy(&card, &now);
        assert_eq!(next.mastery_tier, MasteryTier::Quarter);
        assert_eq!(next.next_review_date, at(2024, 1, 4, 8));
    }

    #[test]
    fn test_same_day_uses_callers_calendar() {
        // 23:00 UTC on Jan 1 is already Jan 2 at UTC+2.
        let hard = at(2024, 1, 1, 23);
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = plus_two.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();
        assert!(is_same_day(&hard, &now));

        let now_utc = at(2024, 1, 2, 10);
        assert!(!is_same_day(&hard, &now_utc));
    }

    #[test]
    fn test_hard_then_easy_twice_same_day_holds_tier() {
        let morning = at(2024, 5, 5, 9);
        let card = review(MasteryTier::Half, None, morning);

        let missed = answer_hard(&card, &morning);
        let first = answer_easy(&missed, &at(2024, 5, 5, 10));
        let second = answer_easy(&first, &at(2024, 5, 5, 11));

        assert_eq!(second.mastery_tier, MasteryTier::New);
        assert_eq!(second.next_review_date.date_naive(), NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
    }

    #[test]
    fn test_easy_never_moves_review_date_back() {
        let now = at(2024, 1, 1, 12);
        let far = at(2024, 2, 1, 12);
        let card = review(MasteryTier::New, None, far);

        let next = answer_easy(&card, &now);
        assert_eq!(next.mastery_tier, MasteryTier::Quarter);
        assert_eq!(next.next_review_date, far);
    }

    #[test]
    fn test_reset_clears_everything() {
        let now = at(2024, 6, 1, 7);
        let card = review(MasteryTier::ThreeQuarters, Some(at(2024, 5, 30, 7)), at(2024, 6, 20, 7));

        let cleared = reset(&card, &now);
        assert_eq!(cleared.mastery_tier, MasteryTier::New);
        assert_eq!(cleared.last_hard_date, None);
        assert_eq!(cleared.next_review_date, now);
        assert_eq!(cleared.flashcard_id, card.flashcard_id);
    }

    #[test]
    fn test_is_due_inclusive_of_today() {
        let now = at(2024, 1, 10, 8);
        assert!(is_due(&review(MasteryTier::New, None, at(2024, 1, 10, 20)), &now));
        assert!(is_due(&review(MasteryTier::New, None, at(2024, 1, 3, 20)), &now));
        assert!(!is_due(&review(MasteryTier::New, None, at(2024, 1, 11, 0)), &now));
    }

    proptest! {
        #[test]
        fn hard_always_resets_tier(tier in tier_strategy(), secs in 0i64..4_000_000_000) {
            let now = Utc.timestamp_opt(secs, 0).unwrap();
            let card = review(tier, None, now);

            let next = answer_hard(&card, &now);
            prop_assert_eq!(next.mastery_tier, MasteryTier::New);
            prop_assert_eq!(next.last_hard_date, Some(now));
            prop_assert_eq!(next.next_review_date, card.next_review_date);
        }

        #[test]
        fn easy_without_hard_follows_table(tier in tier_strategy(), secs in 0i64..4_000_000_000) {
            let now = Utc.timestamp_opt(secs, 0).unwrap();
            let card = review(tier, None, now);

            let next = answer_easy(&card, &now);
            prop_assert_eq!(next.mastery_tier, tier.next());
            prop_assert_eq!(next.next_review_date, now + Duration::days(tier.interval_days() as i64));
        }

        #[test]
        fn easy_after_hard_today_is_one_day(tier in tier_strategy(), hour in 0u32..24, later in 0u32..60) {
            let hard = at(2024, 7, 15, hour);
            let now = hard + Duration::minutes(later as i64);
            prop_assume!(now.date_naive() == hard.date_naive());
            let card = review(tier, Some(hard), hard);

            let next = answer_easy(&card, &now);
            prop_assert_eq!(next.mastery_tier, tier);
            prop_assert_eq!(next.next_review_date, now + Duration::days(1));
        }

        #[test]
        fn mastered_is_a_fixed_point(secs in 0i64..4_000_000_000) {
            let now = Utc.timestamp_opt(secs, 0).unwrap();
            let card = review(MasteryTier::Mastered, None, now);

            let once = answer_easy(&card, &now);
            let twice = answer_easy(&once, &now);
            prop_assert_eq!(&once, &twice);
        }
    }
}
