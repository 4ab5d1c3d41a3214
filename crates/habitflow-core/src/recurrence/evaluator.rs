//! Occurrence evaluation.
//!
//! [`occurs_on`] is the single source of truth. The search helpers below
//! compute candidate dates per rule and only return one `occurs_on` accepts,
//! so they cannot disagree with it.

use chrono::{Datelike, Duration, NaiveDate};

use super::rule::{RepeatRule, RepeatUnit};

/// Bound on aligned months tried before giving up.
///
/// A Feb 29 anchor needs a leap-year February; the month cycle repeats
/// within 12 steps and the leap-year cycle within 400 of those.
const MONTH_SEARCH_STEPS: u32 = 12 * 400;

/// Whether `rule`, anchored on `anchor`, is due on `query`.
///
/// `end` is an inclusive upper bound. Malformed rules never occur.
pub fn occurs_on(
    rule: &RepeatRule,
    anchor: NaiveDate,
    query: NaiveDate,
    end: Option<NaiveDate>,
) -> bool {
    if end.is_some_and(|end| query > end) {
        return false;
    }

    match rule {
        RepeatRule::None => query == anchor,
        _ if query < anchor => false,
        RepeatRule::Daily => true,
        RepeatRule::Weekly => query.weekday() == anchor.weekday(),
        RepeatRule::Monthly => query.day() == anchor.day(),
        RepeatRule::Custom {
            frequency,
            unit,
            weekdays,
        } => {
            if *frequency <= 0 {
                return false;
            }
            let frequency = i64::from(*frequency);
            match unit {
                RepeatUnit::Days => days_between(anchor, query) % frequency == 0,
                RepeatUnit::Weeks => match weekdays {
                    Some(days) if !days.is_empty() => {
                        (days_between(anchor, query) / 7) % frequency == 0
                            && days.contains(query.weekday())
                    }
                    _ => false,
                },
                RepeatUnit::Months => {
                    months_between(anchor, query) % frequency == 0 && query.day() == anchor.day()
                }
                RepeatUnit::Unknown => false,
            }
        }
    }
}

/// First occurrence strictly after `after`, if any exists.
///
/// Returns `None` for malformed rules, for a non-repeating rule whose anchor
/// has passed, when the end date cuts the series off, and when the next
/// occurrence would lie past the last representable date.
pub fn next_occurrence(
    rule: &RepeatRule,
    anchor: NaiveDate,
    after: NaiveDate,
    end: Option<NaiveDate>,
) -> Option<NaiveDate> {
    if rule.defect().is_some() {
        return None;
    }

    let start = after.succ_opt()?.max(anchor);
    let candidate = match rule {
        RepeatRule::None => Some(anchor).filter(|day| *day >= start),
        RepeatRule::Daily => Some(start),
        RepeatRule::Weekly => first_in_week(rule, anchor, start),
        RepeatRule::Monthly => next_month_day(anchor, start, 1),
        RepeatRule::Custom {
            frequency, unit, ..
        } => {
            let frequency = i64::from(*frequency);
            match unit {
                RepeatUnit::Days => {
                    let steps = days_between(anchor, start).checked_add(frequency - 1)? / frequency;
                    add_days(anchor, steps.checked_mul(frequency)?)
                }
                RepeatUnit::Weeks => next_in_week_blocks(rule, anchor, start, frequency),
                RepeatUnit::Months => next_month_day(anchor, start, frequency),
                RepeatUnit::Unknown => None,
            }
        }
    };

    candidate.filter(|day| occurs_on(rule, anchor, *day, end))
}

/// All occurrences in the inclusive range `[from, to]`, in date order.
pub fn occurrences_between(
    rule: &RepeatRule,
    anchor: NaiveDate,
    end: Option<NaiveDate>,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<NaiveDate> {
    if rule.defect().is_some() {
        return Vec::new();
    }

    let to = end.map_or(to, |end| to.min(end));
    let from = from.max(anchor);
    if from > to {
        return Vec::new();
    }

    from.iter_days()
        .take_while(|day| *day <= to)
        .filter(|day| occurs_on(rule, anchor, *day, end))
        .collect()
}

fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

/// First day in `[start, start + 6]` the rule occurs on.
fn first_in_week(rule: &RepeatRule, anchor: NaiveDate, start: NaiveDate) -> Option<NaiveDate> {
    (0..7)
        .map_while(|offset| add_days(start, offset))
        .find(|day| occurs_on(rule, anchor, *day, None))
}

/// Next matching day in the week blocks `k * frequency` counted from the anchor.
///
/// Only the first aligned block at or after `start` and the one after it
/// can hold the answer.
fn next_in_week_blocks(
    rule: &RepeatRule,
    anchor: NaiveDate,
    start: NaiveDate,
    frequency: i64,
) -> Option<NaiveDate> {
    let block = days_between(anchor, start) / 7;
    let mut aligned = block.checked_add(frequency - 1)? / frequency * frequency;
    for _ in 0..2 {
        let block_start = add_days(anchor, aligned.checked_mul(7)?)?;
        let found = (0..7)
            .map_while(|offset| add_days(block_start, offset))
            .filter(|day| *day >= start)
            .find(|day| occurs_on(rule, anchor, *day, None));
        if found.is_some() {
            return found;
        }
        aligned = aligned.checked_add(frequency)?;
    }
    None
}

/// Next date at or after `start` on the anchor's day of month, in months
/// `k * frequency` after the anchor month. Months too short for that day
/// are skipped.
fn next_month_day(anchor: NaiveDate, start: NaiveDate, frequency: i64) -> Option<NaiveDate> {
    let anchor_month = i64::from(anchor.year()) * 12 + i64::from(anchor.month0());
    let last_year = i64::from(NaiveDate::MAX.year());
    let mut step = months_between(anchor, start).checked_add(frequency - 1)? / frequency;

    for _ in 0..MONTH_SEARCH_STEPS {
        let month = anchor_month.checked_add(step.checked_mul(frequency)?)?;
        let year = month.div_euclid(12);
        if year > last_year {
            return None;
        }
        let candidate = i32::try_from(year).ok().and_then(|year| {
            NaiveDate::from_ymd_opt(year, month.rem_euclid(12) as u32 + 1, anchor.day())
        });
        if let Some(day) = candidate.filter(|day| *day >= start) {
            return Some(day);
        }
        step = step.checked_add(1)?;
    }
    None
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let months = |d: NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month0());
    months(to) - months(from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn none_occurs_only_on_anchor() {
        let anchor = date(2024, 1, 1);
        assert!(occurs_on(&RepeatRule::None, anchor, anchor, None));
        assert!(!occurs_on(&RepeatRule::None, anchor, date(2024, 1, 2), None));
        assert!(!occurs_on(&RepeatRule::None, anchor, date(2023, 12, 31), None));
    }

    #[test]
    fn none_respects_end_before_anchor() {
        let anchor = date(2024, 1, 10);
        assert!(!occurs_on(&RepeatRule::None, anchor, anchor, Some(date(2024, 1, 9))));
    }

    #[test]
    fn daily_starts_at_anchor_and_stops_at_end() {
        let anchor = date(2024, 1, 1);
        let end = Some(date(2024, 1, 31));
        assert!(!occurs_on(&RepeatRule::Daily, anchor, date(2023, 12, 31), end));
        assert!(occurs_on(&RepeatRule::Daily, anchor, anchor, end));
        assert!(occurs_on(&RepeatRule::Daily, anchor, date(2024, 1, 31), end));
        assert!(!occurs_on(&RepeatRule::Daily, anchor, date(2024, 2, 1), end));
    }

    #[test]
    fn weekly_matches_anchor_weekday() {
        let anchor = date(2024, 1, 1); // Monday
        assert!(occurs_on(&RepeatRule::Weekly, anchor, date(2024, 1, 8), None));
        assert!(!occurs_on(&RepeatRule::Weekly, anchor, date(2024, 1, 9), None));
        assert!(!occurs_on(&RepeatRule::Weekly, anchor, date(2023, 12, 25), None));
    }

    #[test]
    fn monthly_skips_short_months() {
        let anchor = date(2024, 1, 31);
        assert!(occurs_on(&RepeatRule::Monthly, anchor, date(2024, 3, 31), None));
        assert!(!occurs_on(&RepeatRule::Monthly, anchor, date(2024, 2, 29), None));
        assert!(!occurs_on(&RepeatRule::Monthly, anchor, date(2024, 4, 30), None));
    }

    #[test]
    fn custom_days_every_third_day() {
        let anchor = date(2024, 1, 1);
        let rule = RepeatRule::every_days(3);
        for day in [1, 4, 7] {
            assert!(occurs_on(&rule, anchor, date(2024, 1, day), None), "day {day}");
        }
        for day in [2, 3, 5, 6] {
            assert!(!occurs_on(&rule, anchor, date(2024, 1, day), None), "day {day}");
        }
    }

    #[test]
    fn custom_weeks_uses_week_blocks_from_anchor() {
        let anchor = date(2024, 1, 1); // Monday
        let rule = RepeatRule::every_weeks(2, [Weekday::Mon, Weekday::Thu]);
        assert!(occurs_on(&rule, anchor, date(2024, 1, 1), None));
        assert!(occurs_on(&rule, anchor, date(2024, 1, 4), None));
        // Second block is skipped
        assert!(!occurs_on(&rule, anchor, date(2024, 1, 8), None));
        assert!(!occurs_on(&rule, anchor, date(2024, 1, 11), None));
        assert!(occurs_on(&rule, anchor, date(2024, 1, 15), None));
        assert!(!occurs_on(&rule, anchor, date(2024, 1, 16), None));
    }

    #[test]
    fn custom_weeks_anchor_not_in_weekdays() {
        let anchor = date(2024, 1, 1); // Monday
        let rule = RepeatRule::every_weeks(1, [Weekday::Wed]);
        assert!(!occurs_on(&rule, anchor, anchor, None));
        assert!(occurs_on(&rule, anchor, date(2024, 1, 3), None));
    }

    #[test]
    fn custom_months_every_quarter() {
        let anchor = date(2024, 1, 15);
        let rule = RepeatRule::every_months(3);
        assert!(occurs_on(&rule, anchor, date(2024, 4, 15), None));
        assert!(occurs_on(&rule, anchor, date(2025, 1, 15), None));
        assert!(!occurs_on(&rule, anchor, date(2024, 2, 15), None));
        assert!(!occurs_on(&rule, anchor, date(2024, 4, 16), None));
        assert!(!occurs_on(&rule, anchor, date(2023, 10, 15), None));
    }

    #[test]
    fn malformed_rules_never_occur() {
        let anchor = date(2024, 1, 1);
        let rules = [
            RepeatRule::every_days(0),
            RepeatRule::every_days(-2),
            RepeatRule::every_weeks(1, Vec::<Weekday>::new()),
            RepeatRule::Custom {
                frequency: 1,
                unit: RepeatUnit::Unknown,
                weekdays: None,
            },
        ];
        for rule in &rules {
            assert!(!occurs_on(rule, anchor, anchor, None), "{rule}");
            assert!(next_occurrence(rule, anchor, anchor, None).is_none());
        }
    }

    #[test]
    fn next_occurrence_for_each_kind() {
        let anchor = date(2024, 1, 31);
        assert_eq!(
            next_occurrence(&RepeatRule::Daily, anchor, date(2024, 2, 10), None),
            Some(date(2024, 2, 11))
        );
        assert_eq!(
            next_occurrence(&RepeatRule::Monthly, anchor, anchor, None),
            Some(date(2024, 3, 31))
        );
        assert_eq!(
            next_occurrence(&RepeatRule::None, anchor, date(2024, 1, 1), None),
            Some(anchor)
        );
        assert_eq!(next_occurrence(&RepeatRule::None, anchor, anchor, None), None);
    }

    #[test]
    fn next_occurrence_handles_leap_day_anchor() {
        let anchor = date(2024, 2, 29);
        assert_eq!(
            next_occurrence(&RepeatRule::every_months(12), anchor, anchor, None),
            Some(date(2028, 2, 29))
        );
    }

    #[test]
    fn next_occurrence_jumps_to_aligned_blocks() {
        let anchor = date(2024, 1, 1); // Monday
        let weeks = RepeatRule::every_weeks(2, [Weekday::Mon, Weekday::Thu]);
        assert_eq!(next_occurrence(&weeks, anchor, anchor, None), Some(date(2024, 1, 4)));
        assert_eq!(next_occurrence(&weeks, anchor, date(2024, 1, 4), None), Some(date(2024, 1, 15)));
        assert_eq!(
            next_occurrence(&RepeatRule::every_days(3), anchor, date(2024, 1, 2), None),
            Some(date(2024, 1, 4))
        );
        // April has no 31st
        assert_eq!(
            next_occurrence(&RepeatRule::every_months(3), date(2024, 1, 31), date(2024, 1, 31), None),
            Some(date(2024, 7, 31))
        );
    }

    #[test]
    fn next_occurrence_with_huge_frequency_runs_off_the_calendar() {
        let anchor = date(2024, 1, 15);
        let rules = [
            RepeatRule::every_months(40_000_000),
            RepeatRule::every_months(i32::MAX),
            RepeatRule::every_weeks(i32::MAX, [Weekday::Mon]),
            RepeatRule::every_days(i32::MAX),
        ];
        for rule in &rules {
            assert_eq!(next_occurrence(rule, anchor, anchor, None), None, "{rule}");
            assert!(occurs_on(rule, anchor, anchor, None), "{rule}");
        }
    }

    #[test]
    fn next_occurrence_near_the_last_date() {
        let last = NaiveDate::MAX;
        assert_eq!(next_occurrence(&RepeatRule::Daily, date(2024, 1, 1), last, None), None);
        assert_eq!(next_occurrence(&RepeatRule::Monthly, date(2024, 1, 31), last, None), None);
        // Only the 31st of the final month is left
        let before_last = last - Duration::days(1);
        assert_eq!(
            next_occurrence(&RepeatRule::every_months(1), date(2024, 1, 31), before_last, None),
            Some(last)
        );
    }

    #[test]
    fn next_occurrence_stops_at_end() {
        let anchor = date(2024, 1, 1);
        let end = Some(date(2024, 1, 5));
        assert_eq!(
            next_occurrence(&RepeatRule::Weekly, anchor, anchor, end),
            None
        );
    }

    #[test]
    fn occurrences_between_lists_in_order() {
        let anchor = date(2024, 1, 1);
        let got = occurrences_between(
            &RepeatRule::every_days(3),
            anchor,
            Some(date(2024, 1, 9)),
            date(2023, 12, 1),
            date(2024, 2, 1),
        );
        assert_eq!(got, vec![date(2024, 1, 1), date(2024, 1, 4), date(2024, 1, 7)]);
    }
}
