use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::users::entities::UserRole;
use crate::models::users::requests::{CreateAccountRequest, RegisterRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::redirect;

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let username = register_request.username.trim();
    let name = register_request.name.trim();

    // 1. 必填字段校验
    if username.is_empty()
        || register_request.password.is_empty()
        || register_request.confirm_password.is_empty()
        || name.is_empty()
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::MissingFields,
            "请填写所有必填字段",
        )));
    }

    // 2. 两次密码一致
    if register_request.password != register_request.confirm_password {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordMismatch,
            "密码确认不匹配",
        )));
    }

    // 3. 用户名唯一
    match storage.get_user_by_username(username).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserNameAlreadyExists,
                "用户名已存在，请选择其他用户名",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("注册失败: {e}"),
                )),
            );
        }
    }

    // 4. 注册只产生学生账户
    let create_request = CreateAccountRequest {
        username: username.to_string(),
        password: register_request.password.clone(),
        role: UserRole::Student,
        display_name: name.to_string(),
        email: None,
    };

    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("Student account {} registered", user.username);
            Ok(redirect("/login"))
        }
        Err(e) => {
            tracing::error!("Failed to register account {}: {}", username, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    "注册失败，请稍后重试",
                )),
            )
        }
    }
}
