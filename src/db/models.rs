// Database model structs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::ProblemType;

/// Outcome of `create_problemset`: a duplicate name is a status, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateSetStatus {
    Success,
    AlreadyExists,
}

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct ProblemSetModel {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Derived on read, not stored.
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct ProblemModel {
    pub id: Uuid,
    pub content: String,
    #[serde(rename = "type")]
    pub problem_type: ProblemType,
    pub options: Vec<OptionModel>,
}

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct OptionModel {
    pub id: Uuid,
    pub content: String,
    pub position: i64,
    pub is_correct: bool,
}

/// Problem projection served to an answering client. Deliberately has no
/// correctness flags.
#[derive(Debug, Serialize)]
pub struct QuizProblem {
    pub id: Uuid,
    pub content: String,
    #[serde(rename = "type")]
    pub problem_type: ProblemType,
    pub options: Vec<QuizOption>,
}

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct QuizOption {
    pub id: Uuid,
    pub content: String,
    pub position: i64,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct UserModel {
    pub id: Uuid,
    pub username: String,
    pub nickname: String,
}

/// Per-problem counters summed over every user's answer record.
#[derive(Debug, Default, sqlx::FromRow, Serialize)]
pub struct ProblemStats {
    pub total_count: i64,
    pub correct_count: i64,
}

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct UserProblemStats {
    pub problem_id: Uuid,
    pub total_count: i64,
    pub correct_count: i64,
    pub last_attempt: DateTime<Utc>,
}
