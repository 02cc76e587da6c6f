//! Repository for the `explanations` table.
//!
//! Records are never deleted; [`ExplanationRepo::disable`] clears the
//! `enabled` flag instead.

use peel_core::types::DbId;
use sqlx::PgPool;

use crate::models::explanation::{
    CreateExplanation, Explanation, ExplanationListQuery, ExplanationRunContext,
};

/// Column list for `explanations` queries.
const COLUMNS: &str = "\
    id, understanding_id, name, description, enabled, algorithm, arguments, \
    result, result_type, task_id, version, created_at, updated_at";

/// Maximum page size for explanation listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for explanation listing.
const DEFAULT_LIMIT: i64 = 10;

/// Shared filter for list and count. Binds: $1 understanding_id,
/// $2 enabled, $3 name pattern, $4 exact id.
const LIST_FILTER: &str = "\
    understanding_id = $1 \
    AND ($2::BOOLEAN IS NULL OR enabled = $2) \
    AND ($3::TEXT IS NULL OR name ILIKE $3 OR id = $4)";

/// Clamp a requested page size into `1..=MAX_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Row offset of a zero-based page. Saturates for out-of-range pages.
pub fn page_offset(page: Option<i64>, limit: i64) -> i64 {
    page.unwrap_or(0).max(0).saturating_mul(limit)
}

/// A page of explanations plus the total number of matching rows.
#[derive(Debug)]
pub struct ExplanationPage {
    pub items: Vec<Explanation>,
    pub total_rows: i64,
    pub limit: i64,
}

impl ExplanationPage {
    /// Number of pages of size `limit` needed to hold `total_rows`.
    pub fn total_pages(&self) -> i64 {
        (self.total_rows + self.limit - 1) / self.limit
    }
}

/// Provides CRUD operations for explanation records.
pub struct ExplanationRepo;

impl ExplanationRepo {
    /// Insert a new explanation record. No task handle is set.
    pub async fn create(
        pool: &PgPool,
        input: &CreateExplanation,
    ) -> Result<Explanation, sqlx::Error> {
        let query = format!(
            "INSERT INTO explanations \
                (understanding_id, algorithm, arguments, name, description, version) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Explanation>(&query)
            .bind(input.understanding_id)
            .bind(&input.algorithm)
            .bind(&input.arguments)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(input.version.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Find an explanation by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Explanation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM explanations WHERE id = $1");
        sqlx::query_as::<_, Explanation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List explanations of an understanding, ordered by name then id.
    pub async fn list_by_understanding(
        pool: &PgPool,
        understanding_id: DbId,
        params: &ExplanationListQuery,
    ) -> Result<ExplanationPage, sqlx::Error> {
        let limit = clamp_limit(params.limit);
        let offset = page_offset(params.page, limit);

        let name_pattern = params
            .name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let exact_id = name_pattern
            .filter(|s| s.chars().all(|c| c.is_ascii_digit()))
            .and_then(|s| s.parse::<DbId>().ok());
        let name_pattern = name_pattern.map(|s| format!("%{s}%"));

        let query = format!(
            "SELECT {COLUMNS} FROM explanations \
             WHERE {LIST_FILTER} \
             ORDER BY name, id \
             LIMIT $5 OFFSET $6"
        );
        let items = sqlx::query_as::<_, Explanation>(&query)
            .bind(understanding_id)
            .bind(params.enabled)
            .bind(name_pattern.as_deref())
            .bind(exact_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM explanations WHERE {LIST_FILTER}");
        let total_rows: i64 = sqlx::query_scalar(&count_query)
            .bind(understanding_id)
            .bind(params.enabled)
            .bind(name_pattern.as_deref())
            .bind(exact_id)
            .fetch_one(pool)
            .await?;

        Ok(ExplanationPage {
            items,
            total_rows,
            limit,
        })
    }

    /// Logically delete an explanation. Returns `false` if no row matched.
    pub async fn disable(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE explanations SET enabled = FALSE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store the handle of a freshly dispatched task, replacing any
    /// previous one. Returns `false` if no row matched.
    pub async fn set_task_id(pool: &PgPool, id: DbId, task_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE explanations SET task_id = $2 WHERE id = $1")
            .bind(id)
            .bind(task_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load the explanation together with its dataset and model locations.
    pub async fn find_run_context(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ExplanationRunContext>, sqlx::Error> {
        sqlx::query_as::<_, ExplanationRunContext>(
            "SELECT \
                e.id AS explanation_id, e.algorithm, e.arguments, \
                d.task_type, d.uri AS dataset_uri, d.features, \
                m.uri AS model_uri \
             FROM explanations e \
             JOIN understandings u ON u.id = e.understanding_id \
             JOIN datasets d ON d.id = u.dataset_id \
             JOIN models m ON m.id = u.model_id \
             WHERE e.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_defaults_and_caps() {
        assert_eq!(clamp_limit(None), DEFAULT_LIMIT);
        assert_eq!(clamp_limit(Some(500)), MAX_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(25)), 25);
    }

    #[test]
    fn page_offset_saturates_instead_of_overflowing() {
        assert_eq!(page_offset(None, 10), 0);
        assert_eq!(page_offset(Some(-3), 10), 0);
        assert_eq!(page_offset(Some(2), 10), 20);
        assert_eq!(page_offset(Some(i64::MAX / 2), 10), i64::MAX);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = |total_rows| ExplanationPage {
            items: Vec::new(),
            total_rows,
            limit: 10,
        };
        assert_eq!(page(0).total_pages(), 0);
        assert_eq!(page(10).total_pages(), 1);
        assert_eq!(page(11).total_pages(), 2);
    }
}
