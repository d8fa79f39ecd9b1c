use serde::Serialize;

use super::entities::Account;

/// 学生名册（教师视图）
#[derive(Debug, Clone, Serialize)]
pub struct StudentRosterResponse {
    pub students: Vec<Account>,
}
