//! Chooses the reporting interval for a summary request.
//!
//! Three sources, in priority order: the query string, the persisted
//! interval cookie, and the `today` default. The outcome carries at most one
//! side effect for the caller to perform.

use crate::models::interval::IntervalQuery;

/// Cookie remembering the last explicitly selected interval.
pub const INTERVAL_COOKIE: &str = "PersistentIntervalKey";

pub const DEFAULT_INTERVAL: &str = "today";

/// The single side effect a resolution asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntervalAction {
    /// Answer with a redirect to this location and stop.
    Redirect(String),
    /// Persist the selected interval.
    SetCookie { name: &'static str, value: String },
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Parameters to load the summary with.
    pub query: IntervalQuery,
    pub action: IntervalAction,
}

/// Resolve the effective interval. Pure: equal inputs give equal outputs.
pub fn resolve(query: IntervalQuery, cookie: Option<&str>, base_path: &str) -> Resolution {
    let mut query = query.normalized();

    if query.interval.is_none() && query.from.is_none() {
        if let Some(saved) = cookie.filter(|value| is_safe_token(value)) {
            return Resolution {
                action: IntervalAction::Redirect(format!(
                    "{base_path}/summary?interval={saved}"
                )),
                query,
            };
        }

        query.interval = Some(DEFAULT_INTERVAL.to_string());
        return Resolution {
            query,
            action: IntervalAction::None,
        };
    }

    let action = match &query.interval {
        Some(token) => IntervalAction::SetCookie {
            name: INTERVAL_COOKIE,
            value: token.clone(),
        },
        None => IntervalAction::None,
    };

    Resolution { query, action }
}

/// Only values a browser could have received from us are replayed into a URL.
fn is_safe_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(interval: Option<&str>, from: Option<&str>, to: Option<&str>) -> IntervalQuery {
        IntervalQuery {
            interval: interval.map(str::to_string),
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        }
    }

    #[test]
    fn cookie_redirects_when_nothing_selected() {
        let resolution = resolve(query(None, None, None), Some("last_7_days"), "/app");
        assert_eq!(
            resolution.action,
            IntervalAction::Redirect("/app/summary?interval=last_7_days".to_string())
        );
        assert_eq!(resolution.query.interval, None);
    }

    #[test]
    fn redirect_without_base_path() {
        let resolution = resolve(query(None, None, None), Some("week"), "");
        assert_eq!(
            resolution.action,
            IntervalAction::Redirect("/summary?interval=week".to_string())
        );
    }

    #[test]
    fn defaults_to_today_without_cookie() {
        let resolution = resolve(query(None, None, None), None, "");
        assert_eq!(resolution.query.interval.as_deref(), Some("today"));
        assert_eq!(resolution.action, IntervalAction::None);
    }

    #[test]
    fn only_to_still_defaults() {
        let resolution = resolve(query(None, None, Some("2024-05-01")), None, "");
        assert_eq!(resolution.query.interval.as_deref(), Some("today"));
        assert_eq!(resolution.action, IntervalAction::None);
    }

    #[test]
    fn explicit_interval_is_persisted() {
        let resolution = resolve(query(Some("month"), None, None), Some("week"), "");
        assert_eq!(
            resolution.action,
            IntervalAction::SetCookie {
                name: INTERVAL_COOKIE,
                value: "month".to_string(),
            }
        );
        assert_eq!(resolution.query.interval.as_deref(), Some("month"));
    }

    #[test]
    fn explicit_bounds_pass_through() {
        let q = query(None, Some("2024-05-01"), Some("2024-05-10"));
        let resolution = resolve(q.clone(), Some("week"), "");
        assert_eq!(resolution.action, IntervalAction::None);
        assert_eq!(resolution.query, q);
    }

    #[test]
    fn blank_interval_counts_as_missing() {
        let resolution = resolve(query(Some(""), None, None), Some("year"), "");
        assert_eq!(
            resolution.action,
            IntervalAction::Redirect("/summary?interval=year".to_string())
        );
    }

    #[test]
    fn cookie_with_url_or_header_metacharacters_does_not_redirect() {
        for cookie in ["", "week&admin=1", "a b", "x\r\nSet-Cookie:y"] {
            let resolution = resolve(query(None, None, None), Some(cookie), "");
            assert_eq!(resolution.action, IntervalAction::None, "cookie {cookie:?}");
            assert_eq!(resolution.query.interval.as_deref(), Some("today"));
        }
    }

    #[test]
    fn resolution_is_idempotent() {
        for (q, cookie) in [
            (query(None, None, None), Some("week")),
            (query(None, None, None), None),
            (query(Some("month"), None, None), None),
            (query(None, Some("2024-05-01"), None), Some("week")),
        ] {
            assert_eq!(resolve(q.clone(), cookie, "/b"), resolve(q, cookie, "/b"));
        }
    }
}
