use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use super::AuthService;

pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let sessions = service.get_sessions(request);

    // 销毁服务端会话并让 Cookie 过期
    if let Some(cookie) = request.cookie(sessions.cookie_name()) {
        sessions.destroy(cookie.value()).await;
    }

    Ok(HttpResponse::Found()
        .cookie(sessions.clear_cookie())
        .insert_header((header::LOCATION, "/login"))
        .finish())
}
