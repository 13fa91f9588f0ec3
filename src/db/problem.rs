use rand::seq::SliceRandom;
use uuid::Uuid;

use super::models::{OptionModel, ProblemModel, QuizOption, QuizProblem};
use super::Db;
use crate::error::{DbError, Result};
use crate::models::{ProblemSubmit, ProblemType};

impl Db {
    /// Insert a batch of problems with their options into a set, atomically.
    /// Every problem is validated before the transaction starts; a missing
    /// set or an invalid problem leaves the database untouched.
    /// Returns the ids of the new problems in submission order.
    pub async fn add_problems(
        &self,
        set_id: Uuid,
        problems: &[ProblemSubmit],
    ) -> Result<Vec<Uuid>> {
        for problem in problems {
            validate_problem(problem)?;
        }

        let mut tx = self.pool.begin().await?;

        let set_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM problem_sets WHERE id = $1)")
                .bind(set_id)
                .fetch_one(&mut *tx)
                .await?;
        if !set_exists {
            return Err(DbError::ProblemSetNotFound(set_id));
        }

        let mut added_ids = Vec::with_capacity(problems.len());
        for problem in problems {
            let problem_id = Uuid::new_v4();

            sqlx::query(
                "INSERT INTO problems (id, content, problem_type, set_id) VALUES ($1, $2, $3, $4)",
            )
            .bind(problem_id)
            .bind(&problem.content)
            .bind(problem.problem_type)
            .bind(set_id)
            .execute(&mut *tx)
            .await?;

            for option in &problem.options {
                sqlx::query(
                    "INSERT INTO options (id, content, position, is_correct, problem_id) VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(Uuid::new_v4())
                .bind(&option.content)
                .bind(option.position)
                .bind(option.is_correct)
                .bind(problem_id)
                .execute(&mut *tx)
                .await?;
            }

            added_ids.push(problem_id);
        }

        tx.commit().await?;

        tracing::info!(
            "added {} problems to set {set_id}",
            added_ids.len()
        );
        Ok(added_ids)
    }

    /// Paginated problem search: case-insensitive substring match against
    /// problem content or any option's content, optionally scoped to one
    /// set. `keyword == None` skips the keyword filter entirely. Results
    /// come back in insertion order.
    pub async fn search_problem(
        &self,
        set_id: Option<Uuid>,
        keyword: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ProblemModel>> {
        let keyword = keyword.map(str::trim).filter(|kw| !kw.is_empty());

        let rows: Vec<(Uuid, String, ProblemType)> = sqlx::query_as(
            r#"
            SELECT p.id, p.content, p.problem_type
            FROM problems p
            WHERE ($1 IS NULL OR p.set_id = $1)
              AND ($2 IS NULL
                   OR instr(lower(p.content), lower($2)) > 0
                   OR EXISTS(
                       SELECT 1 FROM options o
                       WHERE o.problem_id = p.id AND instr(lower(o.content), lower($2)) > 0
                   ))
            ORDER BY p.rowid
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(set_id)
        .bind(keyword)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(rows.len());
        for (id, content, problem_type) in rows {
            result.push(ProblemModel {
                id,
                content,
                problem_type,
                options: self.get_options(id).await?,
            });
        }

        Ok(result)
    }

    /// Single-problem lookup with its options.
    pub async fn get_problem(&self, problem_id: Uuid) -> Result<ProblemModel> {
        let row: Option<(String, ProblemType)> =
            sqlx::query_as("SELECT content, problem_type FROM problems WHERE id = $1")
                .bind(problem_id)
                .fetch_optional(&self.pool)
                .await?;

        let (content, problem_type) = row.ok_or(DbError::ProblemNotFound(problem_id))?;

        Ok(ProblemModel {
            id: problem_id,
            content,
            problem_type,
            options: self.get_options(problem_id).await?,
        })
    }

    /// Delete problems by id; options and answer records cascade. Unknown
    /// ids are skipped, so the operation is idempotent.
    pub async fn delete_problems(&self, problem_ids: &[Uuid]) -> Result<()> {
        if problem_ids.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        let mut deleted = 0;

        for problem_id in problem_ids {
            let result = sqlx::query("DELETE FROM problems WHERE id = $1")
                .bind(problem_id)
                .execute(&mut *tx)
                .await?;
            deleted += result.rows_affected();
        }

        tx.commit().await?;

        tracing::info!("deleted {deleted} of {} requested problems", problem_ids.len());
        Ok(())
    }

    /// Count of problems, optionally scoped to one set.
    pub async fn get_problem_count(&self, set_id: Option<Uuid>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM problems WHERE ($1 IS NULL OR set_id = $1)",
        )
        .bind(set_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Draw up to `count` distinct problems uniformly at random, scoped to
    /// one set or the whole bank. The returned projection carries no
    /// correctness flags. When fewer problems exist than requested, all of
    /// them are returned.
    pub async fn sample(&self, set_id: Option<Uuid>, count: u32) -> Result<Vec<QuizProblem>> {
        if count == 0 {
            return Err(DbError::Validation(
                "sample count must be positive".to_owned(),
            ));
        }

        let mut ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM problems WHERE ($1 IS NULL OR set_id = $1) ORDER BY rowid",
        )
        .bind(set_id)
        .fetch_all(&self.pool)
        .await?;

        {
            let mut rng = rand::thread_rng();
            ids.shuffle(&mut rng);
        }
        ids.truncate(count as usize);

        let mut result = Vec::with_capacity(ids.len());
        for id in ids {
            let (content, problem_type): (String, ProblemType) =
                sqlx::query_as("SELECT content, problem_type FROM problems WHERE id = $1")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;

            let options = sqlx::query_as::<_, QuizOption>(
                "SELECT id, content, position FROM options WHERE problem_id = $1 ORDER BY position",
            )
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

            result.push(QuizProblem {
                id,
                content,
                problem_type,
                options,
            });
        }

        Ok(result)
    }

    pub(super) async fn get_options(&self, problem_id: Uuid) -> Result<Vec<OptionModel>> {
        let options = sqlx::query_as::<_, OptionModel>(
            "SELECT id, content, position, is_correct FROM options WHERE problem_id = $1 ORDER BY position",
        )
        .bind(problem_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(options)
    }
}

fn validate_problem(problem: &ProblemSubmit) -> Result<()> {
    if problem.content.trim().is_empty() {
        return Err(DbError::Validation(
            "problem content must not be empty".to_owned(),
        ));
    }
    if problem.options.is_empty() {
        return Err(DbError::Validation(
            "problem must have at least one option".to_owned(),
        ));
    }
    if problem.options.iter().any(|o| o.content.trim().is_empty()) {
        return Err(DbError::Validation(
            "option content must not be empty".to_owned(),
        ));
    }

    let correct = problem.correct_count();
    match problem.problem_type {
        ProblemType::SingleSelect if correct != 1 => Err(DbError::Validation(format!(
            "single_select problem must have exactly one correct option, got {correct}"
        ))),
        ProblemType::MultiSelect if correct == 0 => Err(DbError::Validation(
            "multi_select problem must have at least one correct option".to_owned(),
        )),
        _ => Ok(()),
    }
}
