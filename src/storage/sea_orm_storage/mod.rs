//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{PortalError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::new_with_url(&config.database.url, config.database.pool_size, config.database.timeout)
            .await
    }

    /// 使用指定连接参数创建存储实例（测试亦经此入口）
    pub async fn new_with_url(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| PortalError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| PortalError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(PortalError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{entities::Assignment, requests::NewAssignment},
    submissions::{
        entities::Submission, requests::UpsertSubmissionRequest, responses::SubmissionListItem,
    },
    users::{entities::Account, requests::CreateAccountRequest},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 账户模块
    async fn create_user(&self, user: CreateAccountRequest) -> Result<Account> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<Account>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.get_user_by_username_impl(username).await
    }

    async fn find_user_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>> {
        self.find_user_by_credentials_impl(username, password).await
    }

    async fn list_students(&self) -> Result<Vec<Account>> {
        self.list_students_impl().await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 作业模块
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments_by_teacher(&self, teacher_id: i64) -> Result<Vec<Assignment>> {
        self.list_assignments_by_teacher_impl(teacher_id).await
    }

    async fn list_all_assignments(&self) -> Result<Vec<Assignment>> {
        self.list_all_assignments_impl().await
    }

    // 提交模块
    async fn upsert_submission(&self, req: UpsertSubmissionRequest) -> Result<Submission> {
        self.upsert_submission_impl(req).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_submission_for_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_for_student_impl(assignment_id, student_id)
            .await
    }

    async fn list_submissions_with_students(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionListItem>> {
        self.list_submissions_with_students_impl(assignment_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::requests::SubmittedFile;
    use crate::models::users::entities::UserRole;

    async fn memory_storage() -> SeaOrmStorage {
        SeaOrmStorage::new_with_url(":memory:", 1, 5)
            .await
            .expect("in-memory storage")
    }

    fn student_request(username: &str) -> CreateAccountRequest {
        CreateAccountRequest {
            username: username.to_string(),
            password: "123".to_string(),
            role: UserRole::Student,
            display_name: "李同学".to_string(),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_credentials_exact_match() {
        let storage = memory_storage().await;
        storage.create_user(student_request("s1")).await.unwrap();

        let found = storage.find_user_by_credentials("s1", "123").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().role, UserRole::Student);

        let wrong_password = storage.find_user_by_credentials("s1", "456").await.unwrap();
        assert!(wrong_password.is_none());

        let unknown_user = storage.find_user_by_credentials("s9", "123").await.unwrap();
        assert!(unknown_user.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let storage = memory_storage().await;
        storage.create_user(student_request("s1")).await.unwrap();

        let before = storage.count_users().await.unwrap();
        let result = storage.create_user(student_request("s1")).await;
        assert!(result.is_err());
        assert_eq!(storage.count_users().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_resubmission_reuses_row() {
        let storage = memory_storage().await;
        let teacher = storage
            .create_user(CreateAccountRequest {
                username: "t1".to_string(),
                password: "123".to_string(),
                role: UserRole::Teacher,
                display_name: "张老师".to_string(),
                email: None,
            })
            .await
            .unwrap();
        let student = storage.create_user(student_request("s1")).await.unwrap();
        let assignment = storage
            .create_assignment(NewAssignment {
                title: "第一次作业".to_string(),
                content: "写一个阶乘函数".to_string(),
                teacher_id: teacher.id,
                due_date: None,
            })
            .await
            .unwrap();

        let first = storage
            .upsert_submission(UpsertSubmissionRequest {
                assignment_id: assignment.id,
                student_id: student.id,
                content: Some("第一版答案".to_string()),
                file: Some(SubmittedFile {
                    file_path: "uploads/20250820_old.docx".to_string(),
                    file_name: "old.docx".to_string(),
                }),
            })
            .await
            .unwrap();

        let second = storage
            .upsert_submission(UpsertSubmissionRequest {
                assignment_id: assignment.id,
                student_id: student.id,
                content: Some("第二版答案".to_string()),
                file: Some(SubmittedFile {
                    file_path: "uploads/20250821_new.docx".to_string(),
                    file_name: "new.docx".to_string(),
                }),
            })
            .await
            .unwrap();

        // 同一逻辑记录，id 不变
        assert_eq!(first.id, second.id);
        assert_eq!(second.content.as_deref(), Some("第二版答案"));
        assert_eq!(second.file_name.as_deref(), Some("new.docx"));

        let stored = storage
            .get_submission_for_student(assignment.id, student.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, first.id);
    }

    #[tokio::test]
    async fn test_resubmission_without_file_keeps_existing() {
        let storage = memory_storage().await;
        let teacher = storage
            .create_user(CreateAccountRequest {
                username: "t1".to_string(),
                password: "123".to_string(),
                role: UserRole::Teacher,
                display_name: "张老师".to_string(),
                email: None,
            })
            .await
            .unwrap();
        let student = storage.create_user(student_request("s1")).await.unwrap();
        let assignment = storage
            .create_assignment(NewAssignment {
                title: "第二次作业".to_string(),
                content: "素数判断".to_string(),
                teacher_id: teacher.id,
                due_date: None,
            })
            .await
            .unwrap();

        storage
            .upsert_submission(UpsertSubmissionRequest {
                assignment_id: assignment.id,
                student_id: student.id,
                content: Some("附件见文件".to_string()),
                file: Some(SubmittedFile {
                    file_path: "uploads/20250820_a.docx".to_string(),
                    file_name: "a.docx".to_string(),
                }),
            })
            .await
            .unwrap();

        let updated = storage
            .upsert_submission(UpsertSubmissionRequest {
                assignment_id: assignment.id,
                student_id: student.id,
                content: Some("只改了文字".to_string()),
                file: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.file_name.as_deref(), Some("a.docx"));
        assert_eq!(updated.content.as_deref(), Some("只改了文字"));
    }

    #[tokio::test]
    async fn test_list_submissions_with_students() {
        let storage = memory_storage().await;
        let teacher = storage
            .create_user(CreateAccountRequest {
                username: "t1".to_string(),
                password: "123".to_string(),
                role: UserRole::Teacher,
                display_name: "张老师".to_string(),
                email: None,
            })
            .await
            .unwrap();
        let s1 = storage.create_user(student_request("s1")).await.unwrap();
        let s2 = storage.create_user(student_request("s2")).await.unwrap();
        let assignment = storage
            .create_assignment(NewAssignment {
                title: "第三次作业".to_string(),
                content: "回文判断".to_string(),
                teacher_id: teacher.id,
                due_date: None,
            })
            .await
            .unwrap();

        for student in [&s1, &s2] {
            storage
                .upsert_submission(UpsertSubmissionRequest {
                    assignment_id: assignment.id,
                    student_id: student.id,
                    content: Some("答案".to_string()),
                    file: None,
                })
                .await
                .unwrap();
        }

        let items = storage
            .list_submissions_with_students(assignment.id)
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().any(|i| i.student_username == "s1"));
        assert!(items.iter().any(|i| i.student_username == "s2"));
    }
}
