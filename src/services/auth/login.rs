use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use crate::models::{ApiResponse, ErrorCode, auth::requests::LoginRequest};
use crate::models::users::entities::UserRole;
use crate::session::SessionUser;

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let sessions = service.get_sessions(request);

    // 1. 用户名 + 密码精确匹配
    match storage
        .find_user_by_credentials(&login_request.username, &login_request.password)
        .await
    {
        Ok(Some(user)) => {
            // 2. 建立服务端会话并下发 Cookie
            let session_id = sessions.create(SessionUser::from(&user)).await;
            let cookie = sessions.build_cookie(&session_id);

            tracing::info!("User {} logged in successfully", user.username);

            // 3. 按角色跳转到对应面板
            let target = match user.role {
                UserRole::Teacher => "/teacher/dashboard",
                UserRole::Student => "/student/dashboard",
            };

            Ok(HttpResponse::Found()
                .cookie(cookie)
                .insert_header((header::LOCATION, target))
                .finish())
        }
        Ok(None) => Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "用户名或密码错误",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("登录失败: {e}"),
            )),
        ),
    }
}
