//! Period-overlap cost aggregation.
//!
//! A subscription counts towards a period if its active interval
//! `[start_date, end_date]` intersects the query window
//! `[period_start, period_end]` at month granularity. An absent end date
//! means the subscription is still active.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::month_year::MonthYear;
use crate::subscription::Subscription;

/// A validated total-cost query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostQuery {
    pub period_start: MonthYear,
    pub period_end: MonthYear,
    /// Exact, case-sensitive match against the canonical user id string.
    pub user_id: Option<String>,
    /// Exact, case-sensitive match against the service name.
    pub service_name: Option<String>,
}

impl CostQuery {
    /// Build a query from raw request values.
    ///
    /// Both period bounds are required and strictly parsed, so an empty
    /// bound is an [`CoreError::InvalidDateFormat`]. Empty filters mean
    /// "no filter". The window is not required to be ordered; an inverted
    /// window matches whatever the predicate admits.
    pub fn new(
        period_start: &str,
        period_end: &str,
        user_id: Option<&str>,
        service_name: Option<&str>,
    ) -> Result<Self, CoreError> {
        let period_start = MonthYear::parse(period_start)
            .map_err(|e| CoreError::InvalidDateFormat(format!("start_date: {e}")))?;
        let period_end = MonthYear::parse(period_end)
            .map_err(|e| CoreError::InvalidDateFormat(format!("end_date: {e}")))?;

        Ok(Self {
            period_start,
            period_end,
            user_id: non_empty(user_id),
            service_name: non_empty(service_name),
        })
    }

    /// The overlap predicate plus the optional filters.
    pub fn matches(&self, sub: &Subscription) -> bool {
        let user_ok = self
            .user_id
            .as_deref()
            .map_or(true, |user| sub.user_id.to_string() == user);
        let service_ok = self
            .service_name
            .as_deref()
            .map_or(true, |service| sub.service_name == service);

        user_ok
            && service_ok
            && overlaps(
                sub.start_date,
                sub.end_date,
                self.period_start,
                self.period_end,
            )
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Interval overlap at month granularity.
///
/// `start <= period_end` and (`end` is open or `end >= period_start`).
pub fn overlaps(
    start: MonthYear,
    end: Option<MonthYear>,
    period_start: MonthYear,
    period_end: MonthYear,
) -> bool {
    start <= period_end && end.map_or(true, |end| end >= period_start)
}

/// Aggregate result of a cost query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSummary {
    pub total_cost: i64,
    pub count: i64,
}

impl CostSummary {
    /// Sum prices of every subscription matching `query`.
    ///
    /// Zero matches yield `{ total_cost: 0, count: 0 }`. A sum past
    /// `i64::MAX` is [`CoreError::CostOverflow`].
    pub fn collect<'a, I>(subscriptions: I, query: &CostQuery) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = &'a Subscription>,
    {
        subscriptions
            .into_iter()
            .filter(|sub| query.matches(sub))
            .try_fold(Self::default(), |acc, sub| {
                Ok(Self {
                    total_cost: acc
                        .total_cost
                        .checked_add(sub.price)
                        .ok_or(CoreError::CostOverflow)?,
                    count: acc.count + 1,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;

    const USER_A: &str = "60601fee-2bf1-4721-ae6f-7636e79a0cba";
    const USER_B: &str = "0b5c3d4e-1111-4222-8333-944455556666";

    fn my(s: &str) -> MonthYear {
        MonthYear::parse(s).unwrap()
    }

    fn sub(service: &str, price: i64, user: &str, start: &str, end: Option<&str>) -> Subscription {
        let now = Utc::now();
        Subscription {
            id: uuid::Uuid::new_v4(),
            service_name: service.to_string(),
            price,
            user_id: uuid::Uuid::parse_str(user).unwrap(),
            start_date: my(start),
            end_date: end.map(my),
            created_at: now,
            updated_at: now,
        }
    }

    fn window(start: &str, end: &str) -> CostQuery {
        CostQuery::new(start, end, None, None).unwrap()
    }

    // -- overlap predicate ---------------------------------------------------

    #[test]
    fn window_inside_interval_matches() {
        let s = sub("Netflix", 100, USER_A, "01-2025", Some("06-2025"));
        assert!(window("03-2025", "04-2025").matches(&s));
    }

    #[test]
    fn window_after_interval_does_not_match() {
        let s = sub("Netflix", 100, USER_A, "01-2025", Some("06-2025"));
        assert!(!window("07-2025", "08-2025").matches(&s));
    }

    #[test]
    fn window_touching_start_matches() {
        let s = sub("Netflix", 100, USER_A, "01-2025", Some("06-2025"));
        assert!(window("12-2024", "01-2025").matches(&s));
    }

    #[test]
    fn window_touching_end_matches() {
        let s = sub("Netflix", 100, USER_A, "01-2025", Some("06-2025"));
        assert!(window("06-2025", "09-2025").matches(&s));
    }

    #[test]
    fn window_before_interval_does_not_match() {
        let s = sub("Netflix", 100, USER_A, "01-2025", Some("06-2025"));
        assert!(!window("06-2024", "12-2024").matches(&s));
    }

    #[test]
    fn open_ended_matches_far_future() {
        let s = sub("Netflix", 100, USER_A, "01-2020", None);
        assert!(window("01-2020", "01-2020").matches(&s));
        assert!(window("05-2090", "07-2099").matches(&s));
        assert!(!window("01-2019", "12-2019").matches(&s));
    }

    #[test]
    fn overlap_across_year_boundary() {
        assert!(overlaps(my("11-2024"), Some(my("02-2025")), my("01-2025"), my("01-2025")));
        assert!(!overlaps(my("11-2024"), Some(my("12-2024")), my("01-2025"), my("03-2025")));
    }

    // -- filters -------------------------------------------------------------

    #[test]
    fn user_filter_is_exact() {
        let s = sub("Netflix", 100, USER_A, "01-2025", None);
        let q = CostQuery::new("01-2025", "02-2025", Some(USER_A), None).unwrap();
        assert!(q.matches(&s));

        let other = CostQuery::new("01-2025", "02-2025", Some(USER_B), None).unwrap();
        assert!(!other.matches(&s));

        let upper = USER_A.to_uppercase();
        let upper_q = CostQuery::new("01-2025", "02-2025", Some(&upper), None).unwrap();
        assert!(!upper_q.matches(&s));
    }

    #[test]
    fn service_filter_is_case_sensitive() {
        let s = sub("Netflix", 100, USER_A, "01-2025", None);
        let q = CostQuery::new("01-2025", "02-2025", None, Some("Netflix")).unwrap();
        assert!(q.matches(&s));
        let lower = CostQuery::new("01-2025", "02-2025", None, Some("netflix")).unwrap();
        assert!(!lower.matches(&s));
    }

    #[test]
    fn empty_filters_mean_no_filter() {
        let q = CostQuery::new("01-2025", "02-2025", Some(""), Some("")).unwrap();
        assert_eq!(q.user_id, None);
        assert_eq!(q.service_name, None);
    }

    // -- bounds --------------------------------------------------------------

    #[test]
    fn invalid_bounds_are_invalid_date_format() {
        for (start, end) in [
            ("13-2025", "12-2025"),
            ("01-2025", "2025-01"),
            ("", "12-2025"),
            ("01-2025", ""),
        ] {
            assert_matches!(
                CostQuery::new(start, end, None, None),
                Err(CoreError::InvalidDateFormat(_)),
                "start={start:?} end={end:?}"
            );
        }
    }

    #[test]
    fn inverted_window_is_not_an_error() {
        let q = window("06-2025", "01-2025");
        let s = sub("Netflix", 100, USER_A, "01-2025", Some("12-2025"));
        assert!(q.matches(&s));
    }

    // -- aggregation ---------------------------------------------------------

    #[test]
    fn summary_sums_matching_prices() {
        let subs = vec![
            sub("Netflix", 100, USER_A, "01-2025", Some("06-2025")),
            sub("Spotify", 250, USER_A, "03-2025", None),
            sub("Netflix", 999, USER_B, "01-2026", None),
        ];
        let summary = CostSummary::collect(&subs, &window("02-2025", "04-2025")).unwrap();
        assert_eq!(
            summary,
            CostSummary {
                total_cost: 350,
                count: 2
            }
        );
    }

    #[test]
    fn summary_with_filters() {
        let subs = vec![
            sub("Netflix", 100, USER_A, "01-2025", None),
            sub("Netflix", 200, USER_B, "01-2025", None),
            sub("Spotify", 300, USER_A, "01-2025", None),
        ];
        let q = CostQuery::new("01-2025", "12-2025", Some(USER_A), Some("Netflix")).unwrap();
        let summary = CostSummary::collect(&subs, &q).unwrap();
        assert_eq!(summary.total_cost, 100);
        assert_eq!(summary.count, 1);
    }

    #[test]
    fn summary_over_nothing_is_zero() {
        let summary = CostSummary::collect(&Vec::new(), &window("01-2025", "02-2025")).unwrap();
        assert_eq!(summary, CostSummary::default());
        assert_eq!(summary.total_cost, 0);
        assert_eq!(summary.count, 0);
    }

    #[test]
    fn summary_up_to_i64_max_is_exact() {
        let subs = vec![
            sub("Netflix", i64::MAX - 1, USER_A, "01-2025", None),
            sub("Spotify", 1, USER_A, "01-2025", None),
        ];
        let summary = CostSummary::collect(&subs, &window("01-2025", "02-2025")).unwrap();
        assert_eq!(summary.total_cost, i64::MAX);
        assert_eq!(summary.count, 2);
    }

    #[test]
    fn summary_past_i64_max_is_cost_overflow() {
        let subs = vec![
            sub("Netflix", i64::MAX, USER_A, "01-2025", None),
            sub("Spotify", i64::MAX, USER_A, "01-2025", None),
        ];
        assert_matches!(
            CostSummary::collect(&subs, &window("01-2025", "02-2025")),
            Err(CoreError::CostOverflow)
        );
    }

    #[test]
    fn overflowing_prices_outside_the_window_are_ignored() {
        let subs = vec![
            sub("Netflix", i64::MAX, USER_A, "01-2025", None),
            sub("Spotify", i64::MAX, USER_A, "01-2030", None),
        ];
        let summary = CostSummary::collect(&subs, &window("01-2025", "02-2025")).unwrap();
        assert_eq!(summary.total_cost, i64::MAX);
    }
}
