use serde::{Deserialize, Serialize};

pub type Problems = Vec<ProblemSubmit>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ProblemType {
    SingleSelect,
    MultiSelect,
}

/// A problem as submitted by a caller, before it gets an identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemSubmit {
    pub content: String,
    #[serde(rename = "type")]
    pub problem_type: ProblemType,
    pub options: Vec<OptionSubmit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSubmit {
    pub content: String,
    pub position: i64,
    pub is_correct: bool,
}

impl ProblemSubmit {
    pub fn correct_count(&self) -> usize {
        self.options.iter().filter(|o| o.is_correct).count()
    }
}
