//! Alignment checks and rounding of block times to a [`Precision`].

use chrono::{Duration, NaiveTime, Timelike};

use crate::models::Precision;
use crate::wallclock::LocalWallClock;

/// True when the minute-of-hour is permitted by `precision`.
///
/// Seconds are not inspected.
pub fn is_aligned(t: LocalWallClock, precision: Precision) -> bool {
    precision.allowed_minutes().contains(&t.minute())
}

/// Round to the nearest boundary permitted by `precision`.
///
/// Thirty-minute precision sends `:00-:14` down to `:00`, `:15-:44` to
/// `:30` and `:45-:59` up to the next hour. Fifteen-minute precision picks
/// the nearest quarter hour, with `:53` and later carrying into the next
/// hour. Seconds and sub-seconds are always dropped.
pub fn round(t: LocalWallClock, precision: Precision) -> LocalWallClock {
    let naive = t.naive();
    let minute = naive.minute();

    let rounded_minute = match precision {
        Precision::ThirtyMinutes => {
            if minute < 15 {
                0
            } else if minute < 45 {
                30
            } else {
                60
            }
        }
        Precision::FifteenMinutes => (minute + 7) / 15 * 15,
    };

    let hour_start =
        naive.date().and_time(NaiveTime::MIN) + Duration::hours(i64::from(naive.hour()));

    LocalWallClock::new(hour_start + Duration::minutes(i64::from(rounded_minute)))
}

/// Re-round a start/end pair after the form's precision changes.
///
/// Both ends are rounded. If that leaves less than one precision unit
/// between them, the end is moved to exactly one unit after the rounded
/// start, even when that changes the duration the user entered.
pub fn reround(
    start: LocalWallClock,
    end: LocalWallClock,
    precision: Precision,
) -> (LocalWallClock, LocalWallClock) {
    let start = round(start, precision);
    let mut end = round(end, precision);

    let unit = Duration::minutes(i64::from(precision.minutes()));
    if end.naive() - start.naive() < unit {
        end = LocalWallClock::new(start.naive() + unit);
    }

    (start, end)
}

/// Field message shown when a time is not on a permitted boundary.
pub fn alignment_message(precision: Precision) -> &'static str {
    match precision {
        Precision::FifteenMinutes => {
            "Time must be aligned to 15-minute intervals (00, 15, 30, 45)"
        }
        Precision::ThirtyMinutes => "Time must be aligned to 30-minute intervals (00, 30)",
    }
}

/// Coarsest precision both times satisfy, used when reopening a stored
/// block without an explicit precision.
pub fn precision_of(start: LocalWallClock, end: LocalWallClock) -> Precision {
    if is_aligned(start, Precision::ThirtyMinutes) && is_aligned(end, Precision::ThirtyMinutes) {
        Precision::ThirtyMinutes
    } else {
        Precision::FifteenMinutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(h: u32, m: u32) -> LocalWallClock {
        LocalWallClock::from_ymd_hm(2024, 6, 1, h, m).unwrap()
    }

    #[test]
    fn alignment_sets() {
        assert!(is_aligned(t(10, 45), Precision::FifteenMinutes));
        assert!(!is_aligned(t(10, 45), Precision::ThirtyMinutes));
        assert!(is_aligned(t(10, 30), Precision::ThirtyMinutes));
        assert!(!is_aligned(t(10, 10), Precision::FifteenMinutes));
    }

    #[test]
    fn thirty_minute_rounding() {
        let p = Precision::ThirtyMinutes;
        assert_eq!(round(t(10, 14), p), t(10, 0));
        assert_eq!(round(t(10, 15), p), t(10, 30));
        assert_eq!(round(t(10, 44), p), t(10, 30));
        assert_eq!(round(t(10, 45), p), t(11, 0));
    }

    #[test]
    fn fifteen_minute_rounding() {
        let p = Precision::FifteenMinutes;
        assert_eq!(round(t(10, 7), p), t(10, 0));
        assert_eq!(round(t(10, 8), p), t(10, 15));
        assert_eq!(round(t(10, 38), p), t(10, 45));
        assert_eq!(round(t(10, 53), p), t(11, 0));
    }

    #[test]
    fn rounding_carries_across_midnight() {
        let late = t(23, 50);
        assert_eq!(
            round(late, Precision::ThirtyMinutes),
            LocalWallClock::from_ymd_hm(2024, 6, 2, 0, 0).unwrap()
        );
    }

    #[test]
    fn rounding_zeroes_seconds() {
        let with_seconds = LocalWallClock::parse_stored("2024-06-01T10:30:42.250Z").unwrap();
        assert_eq!(round(with_seconds, Precision::FifteenMinutes), t(10, 30));
    }

    #[test]
    fn reround_thirty_to_fifteen_keeps_valid_pair() {
        let (s, e) = reround(t(10, 0), t(10, 15), Precision::FifteenMinutes);
        assert_eq!((s, e), (t(10, 0), t(10, 15)));
    }

    #[test]
    fn reround_fifteen_to_thirty_extends_end() {
        let (s, e) = reround(t(10, 0), t(10, 15), Precision::ThirtyMinutes);
        assert_eq!((s, e), (t(10, 0), t(10, 30)));
    }

    #[test]
    fn reround_forces_minimum_duration_when_collapsed() {
        // 10:05-10:10 both round to 10:00; end is pushed one unit past start.
        let (s, e) = reround(t(10, 5), t(10, 10), Precision::ThirtyMinutes);
        assert_eq!((s, e), (t(10, 0), t(10, 30)));

        let (s, e) = reround(t(10, 20), t(10, 22), Precision::FifteenMinutes);
        assert_eq!((s, e), (t(10, 15), t(10, 30)));
    }

    #[test]
    fn alignment_messages_name_the_rule() {
        assert!(alignment_message(Precision::FifteenMinutes).contains("15-minute"));
        assert!(alignment_message(Precision::ThirtyMinutes).contains("30-minute"));
    }

    #[test]
    fn stored_quarter_hours_imply_fifteen_minutes() {
        assert_eq!(precision_of(t(18, 0), t(18, 15)), Precision::FifteenMinutes);
        assert_eq!(precision_of(t(9, 45), t(11, 0)), Precision::FifteenMinutes);
        assert_eq!(precision_of(t(9, 0), t(9, 30)), Precision::ThirtyMinutes);
    }

    fn precision_strategy() -> impl Strategy<Value = Precision> {
        prop_oneof![
            Just(Precision::FifteenMinutes),
            Just(Precision::ThirtyMinutes)
        ]
    }

    proptest! {
        #[test]
        fn rounded_times_are_aligned(
            hour in 0u32..24,
            minute in 0u32..60,
            second in 0u32..60,
            precision in precision_strategy(),
        ) {
            let naive = chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(hour, minute, second)
                .unwrap();
            let rounded = round(LocalWallClock::new(naive), precision);
            prop_assert!(is_aligned(rounded, precision));
            prop_assert_eq!(rounded.naive().second(), 0);
        }

        #[test]
        fn rounding_is_idempotent(
            hour in 0u32..24,
            minute in 0u32..60,
            precision in precision_strategy(),
        ) {
            let once = round(t(hour, minute), precision);
            prop_assert_eq!(round(once, precision), once);
        }
    }
}
