//! View models handed to the summary template.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::Serialize;

use crate::config::ColorTable;
use crate::errors::AppError;
use crate::models::interval::SummaryParams;
use crate::models::summary::Summary;
use crate::models::user::Principal;
use crate::services::colors::filter_colors;
use crate::services::session::SessionMessages;

/// Everything the summary template renders for one response.
///
/// Serialized untagged, so the template sees the fields of whichever shape
/// was built and can branch on `error`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SummaryViewModel {
    Success(Box<SummaryPage>),
    Failure(ErrorPage),
}

#[derive(Debug, Serialize)]
pub struct SummaryPage {
    pub summary: Summary,
    pub summary_params: SummaryParams,
    pub user: Principal,
    pub editor_colors: BTreeMap<String, String>,
    pub language_colors: BTreeMap<String, String>,
    pub os_colors: BTreeMap<String, String>,
    pub api_key: String,
    pub raw_query: String,
    pub total_seconds: i64,
}

#[derive(Debug, Serialize)]
pub struct ErrorPage {
    pub error: String,
    /// Pending flash notice, shown next to the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(skip)]
    pub status: StatusCode,
}

impl SummaryViewModel {
    pub fn success(
        summary: Summary,
        summary_params: SummaryParams,
        user: Principal,
        colors: &ColorTable,
        raw_query: Option<String>,
    ) -> Self {
        let page = SummaryPage {
            editor_colors: filter_colors(colors.editor_colors(), &summary.editors),
            language_colors: filter_colors(colors.language_colors(), &summary.languages),
            os_colors: filter_colors(colors.os_colors(), &summary.operating_systems),
            total_seconds: summary.total_seconds(),
            api_key: user.api_key.clone(),
            raw_query: raw_query.unwrap_or_default(),
            summary,
            summary_params,
            user,
        };
        Self::Success(Box::new(page))
    }

    /// Error-shaped model carrying the error's page status and message.
    pub fn failure(err: &AppError, messages: SessionMessages) -> Self {
        Self::Failure(ErrorPage {
            error: err.page_message(),
            success: messages.success,
            status: err.page_status(),
        })
    }

    pub fn unauthorized(messages: SessionMessages) -> Self {
        Self::failure(&AppError::Unauthorized, messages)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Success(_) => StatusCode::OK,
            Self::Failure(page) => page.status,
        }
    }
}
