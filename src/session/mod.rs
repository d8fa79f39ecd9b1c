//! 服务端会话存储
//!
//! 登录成功后生成随机会话 ID 写入 Cookie，会话负载（账户 ID、用户名、角色、
//! 显示名）保存在进程内的 Moka 缓存中，按配置的 TTL 过期。

use actix_web::cookie::{Cookie, SameSite};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::users::entities::{Account, UserRole};

/// 会话中携带的账户信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
    pub display_name: String,
}

impl From<&Account> for SessionUser {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            role: account.role.clone(),
            display_name: account.display_name.clone(),
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Cache<String, SessionUser>,
    cookie_name: String,
}

impl SessionStore {
    pub fn new() -> Self {
        let config = AppConfig::get();
        Self::with_settings(
            &config.session.cookie_name,
            config.session.max_capacity,
            config.session.ttl,
        )
    }

    pub fn with_settings(cookie_name: &str, max_capacity: u64, ttl: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(std::time::Duration::from_secs(ttl))
            .build();

        debug!(
            "SessionStore initialized, capacity: {}, ttl: {}s",
            max_capacity, ttl
        );

        Self {
            inner,
            cookie_name: cookie_name.to_string(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// 建立新会话，返回会话 ID
    pub async fn create(&self, user: SessionUser) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.inner.insert(session_id.clone(), user).await;
        session_id
    }

    pub async fn get(&self, session_id: &str) -> Option<SessionUser> {
        self.inner.get(session_id).await
    }

    pub async fn destroy(&self, session_id: &str) {
        self.inner.invalidate(session_id).await;
    }

    /// 登录成功后下发的会话 Cookie
    pub fn build_cookie<'a>(&self, session_id: &'a str) -> Cookie<'a> {
        Cookie::build(self.cookie_name.clone(), session_id)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish()
    }

    /// 注销时清除会话 Cookie
    pub fn clear_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(self.cookie_name.clone(), "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish();
        cookie.make_removal();
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> SessionUser {
        SessionUser {
            id: 1,
            username: "s1".to_string(),
            role: UserRole::Student,
            display_name: "李同学".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = SessionStore::with_settings("portal_session", 16, 60);
        let session_id = store.create(sample_user()).await;

        let user = store.get(&session_id).await.expect("session present");
        assert_eq!(user.id, 1);
        assert_eq!(user.role, UserRole::Student);
    }

    #[tokio::test]
    async fn test_destroy_removes_session() {
        let store = SessionStore::with_settings("portal_session", 16, 60);
        let session_id = store.create(sample_user()).await;

        store.destroy(&session_id).await;
        assert!(store.get(&session_id).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_session_is_none() {
        let store = SessionStore::with_settings("portal_session", 16, 60);
        assert!(store.get("not-a-session").await.is_none());
    }
}
