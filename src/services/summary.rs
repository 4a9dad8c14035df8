//! Summary loading: the aggregation boundary of the summary page.

use async_trait::async_trait;
use axum::http::StatusCode;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::interval::SummaryParams;
use crate::models::summary::{Summary, SummaryItem};
use crate::models::user::Principal;

/// Produces aggregated usage data for a window.
///
/// Any error is terminal for the request; its page status and message are
/// shown inline on the summary page.
#[async_trait]
pub trait SummaryLoader: Send + Sync {
    async fn load(
        &self,
        params: &SummaryParams,
        principal: Option<&Principal>,
    ) -> Result<Summary, AppError>;

    /// Readiness probe for the backing storage.
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Grouped sums over the `durations` table.
#[derive(Debug, Clone)]
pub struct PgSummaryLoader {
    pool: PgPool,
}

impl PgSummaryLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_category(
        &self,
        user_id: Uuid,
        params: &SummaryParams,
        category: Category,
    ) -> Result<Vec<SummaryItem>, AppError> {
        let sql = format!(
            r#"
            SELECT COALESCE(NULLIF({column}, ''), 'unknown') AS key,
                   SUM(duration_seconds)::BIGINT AS total_seconds
            FROM durations
            WHERE user_id = $1 AND time >= $2 AND time < $3
            GROUP BY 1
            ORDER BY total_seconds DESC, key ASC
            "#,
            column = category.column()
        );

        let rows = sqlx::query_as::<_, SummaryItem>(&sql)
            .bind(user_id)
            .bind(params.from)
            .bind(params.to)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl SummaryLoader for PgSummaryLoader {
    async fn load(
        &self,
        params: &SummaryParams,
        principal: Option<&Principal>,
    ) -> Result<Summary, AppError> {
        let Some(principal) = principal else {
            return Err(AppError::load_failure(StatusCode::UNAUTHORIZED, "unauthorized"));
        };
        let user_id = principal.id;

        let (projects, languages, editors, operating_systems, machines) = tokio::try_join!(
            self.fetch_category(user_id, params, Category::Project),
            self.fetch_category(user_id, params, Category::Language),
            self.fetch_category(user_id, params, Category::Editor),
            self.fetch_category(user_id, params, Category::OperatingSystem),
            self.fetch_category(user_id, params, Category::Machine),
        )?;

        tracing::debug!(
            user_id = %user_id,
            from = %params.from,
            to = %params.to,
            projects = projects.len(),
            "Summary loaded"
        );

        Ok(Summary {
            from: params.from,
            to: params.to,
            projects,
            languages,
            editors,
            operating_systems,
            machines,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Grouping column of the `durations` table.
#[derive(Debug, Clone, Copy)]
enum Category {
    Project,
    Language,
    Editor,
    OperatingSystem,
    Machine,
}

impl Category {
    fn column(self) -> &'static str {
        match self {
            Category::Project => "project",
            Category::Language => "language",
            Category::Editor => "editor",
            Category::OperatingSystem => "operating_system",
            Category::Machine => "machine",
        }
    }
}
