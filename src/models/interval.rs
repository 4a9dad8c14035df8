//! Reporting intervals and summary window parsing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Serialize, Serializer};

use crate::errors::AppError;

/// Interval-related query parameters of a summary request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalQuery {
    pub interval: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl IntervalQuery {
    /// Pick `interval`, `from` and `to` out of decoded query pairs. A repeated
    /// key keeps its first value; unrelated keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "interval" => &mut query.interval,
                "from" => &mut query.from,
                "to" => &mut query.to,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    /// Blank values count as absent, the way a form submits untouched fields.
    pub fn normalized(self) -> Self {
        fn non_blank(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        Self {
            interval: non_blank(self.interval),
            from: non_blank(self.from),
            to: non_blank(self.to),
        }
    }
}

/// Symbolic reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Today,
    Yesterday,
    Week,
    Month,
    Year,
    Last7Days,
    Last7DaysYesterday,
    Last14Days,
    Last30Days,
    Last6Months,
    Last12Months,
    Any,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Today => "today",
            Interval::Yesterday => "yesterday",
            Interval::Week => "week",
            Interval::Month => "month",
            Interval::Year => "year",
            Interval::Last7Days => "last_7_days",
            Interval::Last7DaysYesterday => "last_7_days_yesterday",
            Interval::Last14Days => "last_14_days",
            Interval::Last30Days => "last_30_days",
            Interval::Last6Months => "last_6_months",
            Interval::Last12Months => "last_12_months",
            Interval::Any => "any",
        }
    }

    /// Window `[from, to)` covered by this interval at `now`, in UTC.
    pub fn range(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();
        let start_of_today = midnight(today);
        let days_back = |n: u64| midnight(today.checked_sub_days(Days::new(n)).unwrap_or(today));
        let months_back =
            |n: u32| now.checked_sub_months(Months::new(n)).unwrap_or_default();

        match self {
            Interval::Today => (start_of_today, now),
            Interval::Yesterday => (days_back(1), start_of_today),
            Interval::Week => {
                let offset = u64::from(today.weekday().num_days_from_monday());
                (days_back(offset), now)
            }
            Interval::Month => (midnight(today.with_day(1).unwrap_or(today)), now),
            Interval::Year => (midnight(today.with_ordinal(1).unwrap_or(today)), now),
            Interval::Last7Days => (days_back(7), now),
            Interval::Last7DaysYesterday => (days_back(7), start_of_today),
            Interval::Last14Days => (days_back(14), now),
            Interval::Last30Days => (days_back(30), now),
            Interval::Last6Months => (months_back(6), now),
            Interval::Last12Months => (months_back(12), now),
            Interval::Any => (DateTime::<Utc>::default(), now),
        }
    }
}

impl FromStr for Interval {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let interval = match s.trim().to_ascii_lowercase().as_str() {
            "today" => Interval::Today,
            "yesterday" => Interval::Yesterday,
            "week" => Interval::Week,
            "month" => Interval::Month,
            "year" => Interval::Year,
            "last_7_days" | "7_days" => Interval::Last7Days,
            "last_7_days_yesterday" => Interval::Last7DaysYesterday,
            "last_14_days" | "14_days" => Interval::Last14Days,
            "last_30_days" | "30_days" => Interval::Last30Days,
            "last_6_months" | "6_months" => Interval::Last6Months,
            "last_12_months" | "12_months" | "last_year" => Interval::Last12Months,
            "any" | "all_time" => Interval::Any,
            other => return Err(AppError::ParamParse(format!("invalid interval '{other}'"))),
        };
        Ok(interval)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Concrete window a summary is loaded for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryParams {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<Interval>,
}

impl SummaryParams {
    /// A symbolic `interval` wins over explicit bounds; `to` defaults to `now`.
    pub fn parse(query: &IntervalQuery, now: DateTime<Utc>) -> Result<Self, AppError> {
        if let Some(token) = &query.interval {
            let interval: Interval = token.parse()?;
            let (from, to) = interval.range(now);
            return Ok(Self {
                from,
                to,
                interval: Some(interval),
            });
        }

        let from = query
            .from
            .as_deref()
            .ok_or_else(|| AppError::ParamParse("missing 'from' parameter".to_string()))
            .and_then(|raw| parse_bound("from", raw))?;
        let to = match query.to.as_deref() {
            Some(raw) => parse_bound("to", raw)?,
            None => now,
        };

        if from > to {
            return Err(AppError::ParamParse(
                "'from' must not be after 'to'".to_string(),
            ));
        }

        Ok(Self {
            from,
            to,
            interval: None,
        })
    }
}

/// RFC 3339 timestamp, or a bare `YYYY-MM-DD` meaning midnight UTC.
fn parse_bound(name: &str, raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(midnight)
        .map_err(|_| AppError::ParamParse(format!("invalid '{name}' date '{raw}'")))
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Wednesday
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 14, 30, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn query(interval: Option<&str>, from: Option<&str>, to: Option<&str>) -> IntervalQuery {
        IntervalQuery {
            interval: interval.map(str::to_string),
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        }
    }

    #[test]
    fn blank_values_are_absent() {
        let q = query(Some(""), Some("  "), Some("2024-01-01")).normalized();
        assert_eq!(q.interval, None);
        assert_eq!(q.from, None);
        assert_eq!(q.to.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn repeated_keys_keep_first_value() {
        let pairs = [
            ("interval", "week"),
            ("project", "codetally"),
            ("interval", "month"),
            ("from", "2024-05-01"),
            ("from", "2024-01-01"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let q = IntervalQuery::from_pairs(pairs);
        assert_eq!(q, query(Some("week"), Some("2024-05-01"), None));
    }

    #[test]
    fn interval_tokens_and_aliases() {
        assert_eq!("today".parse::<Interval>().unwrap(), Interval::Today);
        assert_eq!("7_days".parse::<Interval>().unwrap(), Interval::Last7Days);
        assert_eq!("last_year".parse::<Interval>().unwrap(), Interval::Last12Months);
        assert_eq!("all_time".parse::<Interval>().unwrap(), Interval::Any);
        assert_eq!("Week".parse::<Interval>().unwrap(), Interval::Week);
        assert!(matches!(
            "fortnight".parse::<Interval>(),
            Err(AppError::ParamParse(_))
        ));
    }

    #[test]
    fn interval_serializes_as_token() {
        let json = serde_json::to_value(Interval::Last7DaysYesterday).unwrap();
        assert_eq!(json, "last_7_days_yesterday");
    }

    #[test]
    fn ranges() {
        let now = now();
        assert_eq!(Interval::Today.range(now), (day(2024, 5, 15), now));
        assert_eq!(
            Interval::Yesterday.range(now),
            (day(2024, 5, 14), day(2024, 5, 15))
        );
        assert_eq!(Interval::Week.range(now), (day(2024, 5, 13), now));
        assert_eq!(Interval::Month.range(now), (day(2024, 5, 1), now));
        assert_eq!(Interval::Year.range(now), (day(2024, 1, 1), now));
        assert_eq!(Interval::Last7Days.range(now), (day(2024, 5, 8), now));
        assert_eq!(
            Interval::Last7DaysYesterday.range(now),
            (day(2024, 5, 8), day(2024, 5, 15))
        );
        assert_eq!(
            Interval::Last6Months.range(now),
            (Utc.with_ymd_and_hms(2023, 11, 15, 14, 30, 0).unwrap(), now)
        );
        assert_eq!(Interval::Any.range(now).0.timestamp(), 0);
    }

    #[test]
    fn interval_wins_over_bounds() {
        let params =
            SummaryParams::parse(&query(Some("today"), Some("2020-01-01"), None), now()).unwrap();
        assert_eq!(params.interval, Some(Interval::Today));
        assert_eq!(params.from, day(2024, 5, 15));
    }

    #[test]
    fn explicit_bounds() {
        let params = SummaryParams::parse(
            &query(None, Some("2024-05-01"), Some("2024-05-10T12:00:00+02:00")),
            now(),
        )
        .unwrap();
        assert_eq!(params.interval, None);
        assert_eq!(params.from, day(2024, 5, 1));
        assert_eq!(
            params.to,
            Utc.with_ymd_and_hms(2024, 5, 10, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn to_defaults_to_now() {
        let params = SummaryParams::parse(&query(None, Some("2024-05-01"), None), now()).unwrap();
        assert_eq!(params.to, now());
    }

    #[test]
    fn malformed_bounds_are_rejected() {
        let err = SummaryParams::parse(&query(None, Some("yesterday-ish"), None), now())
            .unwrap_err();
        assert_eq!(err.page_message(), "invalid 'from' date 'yesterday-ish'");

        assert!(SummaryParams::parse(&query(None, None, Some("2024-05-01")), now()).is_err());
        assert!(
            SummaryParams::parse(&query(None, Some("2024-05-10"), Some("2024-05-01")), now())
                .is_err()
        );
    }
}
