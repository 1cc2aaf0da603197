/// Interval containment checks
///
/// Day and time containment are separate predicates; [`Interval::contains`]
/// combines them and handles intervals that close after midnight by
/// splitting them into an evening part on the opening days and an
/// early-morning part on the days after.

use crate::query::Query;
use crate::schedule::{Interval, DAYS_PER_WEEK, MINUTES_PER_DAY};

/// Is `day` within the weekday range `start..=end`?
///
/// `start > end` means the range runs past Sunday (e.g. Sat..=Tue is 5..=1).
pub fn day_matches(start: u8, day: u8, end: u8) -> bool {
    if start == end {
        day == start
    } else if start > end {
        day >= start || day <= end
    } else {
        start <= day && day <= end
    }
}

/// Start inclusive, end exclusive: a place closing at 9 pm is closed at 9 pm.
pub fn time_matches(start: u16, minute: u16, end: u16) -> bool {
    start <= minute && minute < end
}

fn window_matches(query: &Query, start_day: u8, end_day: u8, start_minute: u16, end_minute: u16) -> bool {
    day_matches(start_day, query.weekday(), end_day)
        && time_matches(start_minute, query.minute_of_day(), end_minute)
}

impl Interval {
    pub fn contains(&self, query: &Query) -> bool {
        // end_day may carry the +7 week-wrap offset
        let end_day = self.end_day % DAYS_PER_WEEK;

        if !self.wraps_midnight() {
            return window_matches(query, self.start_day, end_day, self.start_minute, self.end_minute);
        }

        // Evening on the opening days, then the small hours of the day after each
        window_matches(query, self.start_day, end_day, self.start_minute, MINUTES_PER_DAY)
            || window_matches(
                query,
                (self.start_day + 1) % DAYS_PER_WEEK,
                (end_day + 1) % DAYS_PER_WEEK,
                0,
                self.end_minute,
            )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The end of a time window is never inside it
        #[test]
        fn end_minute_excluded(start in 0u16..1440, end in 0u16..1440) {
            prop_assert!(!time_matches(start, end, end));
        }

        /// A same-day interval never matches other weekdays
        #[test]
        fn single_day_matches_only_itself(day in 0u8..7, other in 0u8..7, minute in 0u16..1440) {
            let interval = Interval { start_day: day, end_day: day, start_minute: 0, end_minute: 1439 };
            let query = Query::new(other as u32, minute as u32).unwrap();
            if minute < 1439 {
                prop_assert_eq!(interval.contains(&query), day == other);
            }
        }

        /// An overnight interval covers exactly the union of its two halves
        #[test]
        fn overnight_split_covers_both_halves(
            day in 0u8..7,
            start in 1u16..1440,
            end in 0u16..1440,
            minute in 0u16..1440,
        ) {
            prop_assume!(start > end);
            let interval = Interval { start_day: day, end_day: day, start_minute: start, end_minute: end };
            let same_day = Query::new(day as u32, minute as u32).unwrap();
            let next_day = Query::new(((day + 1) % 7) as u32, minute as u32).unwrap();
            prop_assert_eq!(interval.contains(&same_day), minute >= start);
            prop_assert_eq!(interval.contains(&next_day), minute < end);
        }

        /// Reducing the +7 offset gives the same answer as listing the days
        #[test]
        fn week_wrap_equivalent_to_day_list(start in 0u8..7, end in 0u8..7, day in 0u8..7) {
            prop_assume!(start > end);
            let interval = Interval { start_day: start, end_day: end + 7, start_minute: 0, end_minute: 1439 };
            let query = Query::new(day as u32, 600).unwrap();
            let expected = (start..7).chain(0..=end).any(|d| d == day);
            prop_assert_eq!(interval.contains(&query), expected);
        }
    }
}

/// Kani formal verification proofs
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    #[kani::proof]
    fn single_day_range_matches_only_that_day() {
        let start: u8 = kani::any();
        let day: u8 = kani::any();
        kani::assume(start < 7 && day < 7);
        kani::assert(day_matches(start, day, start) == (day == start), "single-day range");
    }

    #[kani::proof]
    fn time_window_excludes_end() {
        let start: u16 = kani::any();
        let end: u16 = kani::any();
        kani::assume(start < 1440 && end < 1440);
        kani::assert(!time_matches(start, end, end), "end minute must be excluded");
    }

    #[kani::proof]
    fn wrapped_range_is_symmetric_complement() {
        let start: u8 = kani::any();
        let end: u8 = kani::any();
        let day: u8 = kani::any();
        kani::assume(start < 7 && end < 7 && day < 7 && start > end);
        // Sat..=Tue covers exactly the days Wed..=Fri does not
        let outside = end + 1 <= day && day <= start - 1;
        kani::assert(day_matches(start, day, end) == !outside, "wrapped range");
    }
}
