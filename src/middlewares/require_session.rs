/*!
 * 会话认证中间件
 *
 * 从请求 Cookie 中取出会话 ID，到服务端会话存储里查找对应账户；命中则把
 * `SessionUser` 写入请求扩展供后续处理程序使用，未命中则 302 跳转到登录页。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * web::scope("/teacher")
 *     .wrap(RequireRole::new(&UserRole::Teacher))
 *     .wrap(RequireSession)   // 先验证会话，再验证角色
 *     .route("/dashboard", web::get().to(teacher_dashboard))
 * ```
 *
 * 处理程序中提取会话用户：
 * ```rust,ignore
 * if let Some(user) = RequireSession::extract_session_user(&req) {
 *     // user.id / user.role / user.display_name
 * }
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::debug;

use crate::models::users::entities::UserRole;
use crate::session::{SessionStore, SessionUser};

use super::create_redirect_response;

#[derive(Clone)]
pub struct RequireSession;

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireSessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireSessionMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            let sessions = req
                .app_data::<web::Data<SessionStore>>()
                .expect("SessionStore not found in app data")
                .clone();

            let session_user = match req.cookie(sessions.cookie_name()) {
                Some(cookie) => sessions.get(cookie.value()).await,
                None => None,
            };

            match session_user {
                Some(user) => {
                    debug!("Session authenticated for account {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                None => {
                    debug!("No valid session for request to {}", req.path());
                    Ok(req
                        .into_response(create_redirect_response("/login").map_into_right_body()))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取会话用户信息
impl RequireSession {
    /// 从请求扩展中提取会话用户
    /// 此函数应该在应用了 RequireSession 中间件的路由处理程序中使用
    pub fn extract_session_user(req: &actix_web::HttpRequest) -> Option<SessionUser> {
        req.extensions().get::<SessionUser>().cloned()
    }

    /// 从请求扩展中提取账户 ID
    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<SessionUser>().map(|user| user.id)
    }

    /// 从请求扩展中提取账户角色
    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions()
            .get::<SessionUser>()
            .map(|user| user.role.clone())
    }
}
