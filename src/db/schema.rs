// Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS problem_sets (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            created_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS problems (
            id BLOB PRIMARY KEY,
            content TEXT NOT NULL,
            problem_type TEXT NOT NULL,
            set_id BLOB NOT NULL,
            FOREIGN KEY(set_id) REFERENCES problem_sets(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS options (
            id BLOB PRIMARY KEY,
            content TEXT NOT NULL,
            position INTEGER NOT NULL,
            is_correct BOOLEAN NOT NULL,
            problem_id BLOB NOT NULL,
            FOREIGN KEY(problem_id) REFERENCES problems(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BLOB PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            nickname TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // One row per (user, problem) pair holding cumulative counters,
    // updated in place on every reported attempt.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS answer_records (
            user_id BLOB NOT NULL,
            problem_id BLOB NOT NULL,
            total_count INTEGER NOT NULL DEFAULT 0,
            correct_count INTEGER NOT NULL DEFAULT 0,
            last_attempt TIMESTAMP NOT NULL,
            PRIMARY KEY(user_id, problem_id),
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY(problem_id) REFERENCES problems(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_problems_set_id ON problems(set_id)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_options_problem_id ON options(problem_id)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
