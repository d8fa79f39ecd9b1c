pub mod login;
pub mod logout;
pub mod register;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::ApiResponse;
use crate::session::SessionStore;
use crate::storage::Storage;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_sessions(&self, request: &HttpRequest) -> SessionStore {
        request
            .app_data::<web::Data<SessionStore>>()
            .expect("SessionStore not found in app data")
            .get_ref()
            .clone()
    }

    // 登录页
    pub async fn login_page(&self) -> ActixResult<HttpResponse> {
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("请输入用户名和密码登录")))
    }

    // 登录验证
    pub async fn login(
        &self,
        login_request: crate::models::auth::requests::LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 注销
    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(self, request).await
    }

    // 注册页
    pub async fn register_page(&self) -> ActixResult<HttpResponse> {
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("注册新的学生账户")))
    }

    // 学生注册
    pub async fn register(
        &self,
        register_request: crate::models::users::requests::RegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::handle_register(self, register_request, request).await
    }
}
