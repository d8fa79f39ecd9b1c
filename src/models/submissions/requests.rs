/// 提交 upsert（存储层）：按 (assignment_id, student_id) 复用已有行
#[derive(Debug, Clone)]
pub struct UpsertSubmissionRequest {
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    /// None 表示保留已有文件
    pub file: Option<SubmittedFile>,
}

/// 已落盘的上传文件
#[derive(Debug, Clone)]
pub struct SubmittedFile {
    pub file_path: String,
    pub file_name: String,
}
