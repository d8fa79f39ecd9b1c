use serde::Deserialize;

use super::entities::UserRole;

/// 创建账户（存储层）
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountRequest {
    pub username: String,
    pub password: String,
    pub role: UserRole,
    pub display_name: String,
    pub email: Option<String>,
}

/// 注册表单（路由层，注册仅创建学生账户）
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub name: String,
}
