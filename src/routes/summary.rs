//! Summary page: interval resolution, loading and rendering.

use axum::{
    extract::{Query, RawQuery, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::Utc;

use crate::errors::AppError;
use crate::middleware::auth::MaybePrincipal;
use crate::models::interval::{IntervalQuery, SummaryParams};
use crate::models::view::SummaryViewModel;
use crate::services::interval::{self, IntervalAction, INTERVAL_COOKIE};
use crate::services::session;
use crate::templates::SUMMARY_TEMPLATE;
use crate::AppState;

/// GET /summary: the summary dashboard.
pub async fn index(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
    jar: CookieJar,
    RawQuery(raw_query): RawQuery,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let query = IntervalQuery::from_pairs(pairs);
    let saved = jar.get(INTERVAL_COOKIE).map(|c| c.value().to_string());
    let resolution = interval::resolve(query, saved.as_deref(), &state.config.base_path);

    let jar = match resolution.action {
        IntervalAction::Redirect(location) => {
            tracing::debug!(%location, "Restoring saved interval");
            return (StatusCode::FOUND, [(header::LOCATION, location)]).into_response();
        }
        IntervalAction::SetCookie { name, value } => {
            tracing::debug!(interval = %value, "Persisting selected interval");
            jar.add(
                Cookie::build((name, value))
                    .path(state.config.cookie_path())
                    .build(),
            )
        }
        IntervalAction::None => jar,
    };

    let params = match SummaryParams::parse(&resolution.query, Utc::now()) {
        Ok(params) => params,
        Err(err) => return render_failure(&state, jar, err),
    };

    let summary = match state.summaries.load(&params, principal.as_ref()).await {
        Ok(summary) => summary,
        Err(err) => return render_failure(&state, jar, err),
    };

    let Some(user) = principal else {
        let (jar, messages) = session::take_messages(jar, &state.config.cookie_path());
        return render(&state, jar, SummaryViewModel::unauthorized(messages));
    };

    let vm = SummaryViewModel::success(summary, params, user, &state.colors, raw_query);
    render(&state, jar, vm)
}

/// Error-shaped page for a parse or load failure, with pending flash messages.
fn render_failure(state: &AppState, jar: CookieJar, err: AppError) -> Response {
    tracing::error!(
        status = err.page_status().as_u16(),
        error = %err,
        "Failed to load summary"
    );
    let (jar, messages) = session::take_messages(jar, &state.config.cookie_path());
    render(state, jar, SummaryViewModel::failure(&err, messages))
}

fn render(state: &AppState, jar: CookieJar, vm: SummaryViewModel) -> Response {
    match state.templates.render(SUMMARY_TEMPLATE, &vm) {
        Ok(html) => (vm.status(), jar, Html(html)).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}
