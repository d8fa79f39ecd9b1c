use serde::Serialize;

use super::entities::Assignment;
use crate::models::submissions::entities::Submission;

/// 教师面板：自己布置的作业列表
#[derive(Debug, Clone, Serialize)]
pub struct TeacherDashboardResponse {
    pub assignments: Vec<Assignment>,
}

/// 学生面板里的单条作业及其提交状态
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentWithStatus {
    pub assignment: Assignment,
    pub submitted: bool,
    pub submission: Option<Submission>,
}

/// 学生面板：全部作业及本人提交状态
#[derive(Debug, Clone, Serialize)]
pub struct StudentDashboardResponse {
    pub assignments: Vec<AssignmentWithStatus>,
}
