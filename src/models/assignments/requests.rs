use serde::Deserialize;

/// 布置作业表单，截止日期为 `YYYY-MM-DD` 字符串，可留空
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// 新建作业（存储层，日期已解析）
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub title: String,
    pub content: String,
    pub teacher_id: i64,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}
