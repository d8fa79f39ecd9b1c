use std::sync::Arc;

use crate::models::{
    assignments::{entities::Assignment, requests::NewAssignment},
    submissions::{
        entities::Submission, requests::UpsertSubmissionRequest, responses::SubmissionListItem,
    },
    users::{entities::Account, requests::CreateAccountRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 账户管理方法
    // 创建账户
    async fn create_user(&self, user: CreateAccountRequest) -> Result<Account>;
    // 通过ID获取账户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<Account>>;
    // 通过用户名获取账户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<Account>>;
    // 按用户名+密码精确匹配（明文比较，登录用）
    async fn find_user_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>>;
    // 列出所有学生账户
    async fn list_students(&self) -> Result<Vec<Account>>;
    // 统计账户数量
    async fn count_users(&self) -> Result<u64>;

    /// 作业管理方法
    // 布置作业
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 列出某教师布置的作业
    async fn list_assignments_by_teacher(&self, teacher_id: i64) -> Result<Vec<Assignment>>;
    // 列出全部作业（学生面板）
    async fn list_all_assignments(&self) -> Result<Vec<Assignment>>;

    /// 提交管理方法
    // 提交/重交（同一 (assignment, student) 复用同一行）
    async fn upsert_submission(&self, req: UpsertSubmissionRequest) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 获取某学生对某作业的提交
    async fn get_submission_for_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 列出某作业的全部提交，附学生信息
    async fn list_submissions_with_students(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionListItem>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
