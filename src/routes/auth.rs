use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::auth::requests::LoginRequest;
use crate::models::users::requests::RegisterRequest;
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn index() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Found()
        .insert_header((actix_web::http::header::LOCATION, "/login"))
        .finish())
}

pub async fn login_page() -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login_page().await
}

pub async fn login(
    req: HttpRequest,
    form: web::Form<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(form.into_inner(), &req).await
}

pub async fn logout(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&req).await
}

pub async fn register_page() -> ActixResult<HttpResponse> {
    AUTH_SERVICE.register_page().await
}

pub async fn register(
    req: HttpRequest,
    form: web::Form<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.register(form.into_inner(), &req).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/login", web::get().to(login_page))
        .route("/login", web::post().to(login))
        .route("/logout", web::get().to(logout))
        .route("/register", web::get().to(register_page))
        .route("/register", web::post().to(register));
}
