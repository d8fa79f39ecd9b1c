pub mod require_role;
pub mod require_session;

pub use require_role::RequireRole;
pub use require_session::RequireSession;

use actix_web::HttpResponse;
use actix_web::http::header;

/// 鉴权失败统一用 302 跳转（门户是面向浏览器的页面应用，不返回结构化错误）
pub(crate) fn create_redirect_response(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}
