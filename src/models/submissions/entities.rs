use serde::{Deserialize, Serialize};

// 提交实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub file_path: Option<String>,
    pub file_name: Option<String>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub grade: Option<String>,
}
