use serde::Serialize;

use super::entities::Submission;
use crate::models::assignments::entities::Assignment;

/// 提交列表项，附带提交学生的信息
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionListItem {
    #[serde(flatten)]
    pub submission: Submission,
    pub student_username: String,
    pub student_display_name: String,
}

/// 教师查看某次作业的全部提交
#[derive(Debug, Clone, Serialize)]
pub struct ViewSubmissionsResponse {
    pub assignment: Assignment,
    pub submissions: Vec<SubmissionListItem>,
}

/// 文件预览视图。grader_result 仅在评分实际运行过时出现。
#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    pub submission: Submission,
    pub file_type: String,
    pub file_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grader_result: Option<String>,
}
