use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{PortalError, Result};
use crate::models::users::{
    entities::{Account, UserRole},
    requests::CreateAccountRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建账户
    pub async fn create_user_impl(&self, req: CreateAccountRequest) -> Result<Account> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            password: Set(req.password),
            role: Set(req.role.to_string()),
            display_name: Set(req.display_name),
            email: Set(req.email),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建账户失败: {e}")))?;

        Ok(result.into_account())
    }

    /// 通过 ID 获取账户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<Account>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询账户失败: {e}")))?;

        Ok(result.map(|m| m.into_account()))
    }

    /// 通过用户名获取账户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<Account>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询账户失败: {e}")))?;

        Ok(result.map(|m| m.into_account()))
    }

    /// 按用户名+密码精确匹配（登录口令为明文比较）
    pub async fn find_user_by_credentials_impl(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>> {
        let result = Users::find()
            .filter(
                Condition::all()
                    .add(Column::Username.eq(username))
                    .add(Column::Password.eq(password)),
            )
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询账户失败: {e}")))?;

        Ok(result.map(|m| m.into_account()))
    }

    /// 列出所有学生账户
    pub async fn list_students_impl(&self) -> Result<Vec<Account>> {
        let results = Users::find()
            .filter(Column::Role.eq(UserRole::STUDENT))
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_account()).collect())
    }

    /// 统计账户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计账户数量失败: {e}")))?;

        Ok(count)
    }
}
