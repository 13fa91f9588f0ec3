use chrono::Utc;
use uuid::Uuid;

use super::models::{CreateSetStatus, ProblemSetModel};
use super::Db;
use crate::error::{DbError, Result};

impl Db {
    /// Create a problem set, or report the existing one when the name is
    /// taken. The UNIQUE constraint on `name` arbitrates concurrent calls:
    /// the insert either wins (a row comes back) or silently loses, in
    /// which case the winning row is re-read.
    pub async fn create_problemset(&self, name: &str) -> Result<(Uuid, CreateSetStatus)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DbError::Validation(
                "problem set name must not be empty".to_owned(),
            ));
        }

        let id = Uuid::new_v4();
        let inserted: Option<Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO problem_sets (id, name, created_at) VALUES ($1, $2, $3)
            ON CONFLICT(name) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(id) => {
                tracing::info!("problem set created: id={id}, name={name:?}");
                Ok((id, CreateSetStatus::Success))
            }
            None => {
                let existing: Uuid =
                    sqlx::query_scalar("SELECT id FROM problem_sets WHERE name = $1")
                        .bind(name)
                        .fetch_one(&self.pool)
                        .await?;

                Ok((existing, CreateSetStatus::AlreadyExists))
            }
        }
    }

    /// All problem sets with their problem counts, in insertion order.
    pub async fn list_problemset(&self) -> Result<Vec<ProblemSetModel>> {
        let sets = sqlx::query_as::<_, ProblemSetModel>(
            r#"
            SELECT
              ps.id AS id,
              ps.name AS name,
              ps.created_at AS created_at,
              COUNT(p.id) AS count
            FROM
              problem_sets ps
              LEFT JOIN problems p ON p.set_id = ps.id
            GROUP BY
              ps.id, ps.name, ps.created_at
            ORDER BY
              ps.rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sets)
    }

    /// Delete a problem set; its problems, their options, and any answer
    /// records referencing those problems go with it via cascade.
    pub async fn delete_problemset(&self, set_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM problem_sets WHERE id = $1")
            .bind(set_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::ProblemSetNotFound(set_id));
        }

        tracing::info!("problem set deleted: id={set_id}");
        Ok(())
    }
}
