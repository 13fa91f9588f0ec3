use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use super::models::{ProblemStats, UserProblemStats};
use super::Db;
use crate::error::{DbError, Result};

impl Db {
    /// Report one answering attempt. Ensures the user exists, judges the
    /// submitted option ids against the problem's correct set (exact set
    /// equality), and upserts the per-(user, problem) counters: the total
    /// always bumps, the correct count only on a correct attempt.
    /// Returns whether the attempt was judged correct.
    pub async fn report_attempt(
        &self,
        username: &str,
        problem_id: Uuid,
        selected_option_ids: &[Uuid],
    ) -> Result<bool> {
        let user = self.ensure_user(username, "").await?;

        let correct_ids = self.get_correct_option_ids(problem_id).await?;

        let selected: HashSet<Uuid> = selected_option_ids.iter().copied().collect();
        let correct_set: HashSet<Uuid> = correct_ids.into_iter().collect();
        let is_correct = selected == correct_set;

        // Single-statement upsert; the composite primary key makes the
        // increment atomic under concurrent reports.
        sqlx::query(
            r#"
            INSERT INTO answer_records (user_id, problem_id, total_count, correct_count, last_attempt)
            VALUES ($1, $2, 1, $3, $4)
            ON CONFLICT(user_id, problem_id) DO UPDATE SET
                total_count = answer_records.total_count + 1,
                correct_count = answer_records.correct_count + excluded.correct_count,
                last_attempt = excluded.last_attempt
            "#,
        )
        .bind(user.id)
        .bind(problem_id)
        .bind(if is_correct { 1_i64 } else { 0_i64 })
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::info!(
            "attempt reported: user={username:?}, problem={problem_id}, correct={is_correct}"
        );
        Ok(is_correct)
    }

    /// Cumulative attempt/correct counters for one problem, summed over the
    /// per-user answer records. A problem nobody has attempted yields
    /// zeroes; an unknown problem id is an error.
    pub async fn problem_stats(&self, problem_id: Uuid) -> Result<ProblemStats> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM problems WHERE id = $1)")
                .bind(problem_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(DbError::ProblemNotFound(problem_id));
        }

        let stats = sqlx::query_as::<_, ProblemStats>(
            r#"
            SELECT
                COALESCE(SUM(total_count), 0) AS total_count,
                COALESCE(SUM(correct_count), 0) AS correct_count
            FROM answer_records
            WHERE problem_id = $1
            "#,
        )
        .bind(problem_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    /// Per-problem cumulative counters for one user.
    pub async fn user_stats(&self, username: &str) -> Result<Vec<UserProblemStats>> {
        let user = self
            .query_user(username)
            .await?
            .ok_or_else(|| DbError::UserNotFound(username.to_owned()))?;

        let stats = sqlx::query_as::<_, UserProblemStats>(
            r#"
            SELECT problem_id, total_count, correct_count, last_attempt
            FROM answer_records
            WHERE user_id = $1
            ORDER BY last_attempt DESC
            "#,
        )
        .bind(user.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }

    async fn get_correct_option_ids(&self, problem_id: Uuid) -> Result<Vec<Uuid>> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM problems WHERE id = $1)")
                .bind(problem_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(DbError::ProblemNotFound(problem_id));
        }

        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM options WHERE problem_id = $1 AND is_correct = TRUE",
        )
        .bind(problem_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
