use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::users::entities::UserRole;
use crate::services::AssignmentService;

use super::students::student_roster;
use super::submissions::{submit_assignment, submit_assignment_page};

// 懒加载的全局 AssignmentService 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

pub async fn teacher_dashboard(request: HttpRequest) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.teacher_dashboard(&request).await
}

pub async fn create_assignment_page() -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.create_page().await
}

pub async fn create_assignment(
    request: HttpRequest,
    form: web::Form<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.create(form.into_inner(), &request).await
}

pub async fn view_submissions(
    request: HttpRequest,
    assignment_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .view_submissions(assignment_id.into_inner(), &request)
        .await
}

pub async fn student_dashboard(request: HttpRequest) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.student_dashboard(&request).await
}

// 配置教师路由
pub fn configure_teacher_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/teacher")
            .wrap(middlewares::RequireRole::new(&UserRole::Teacher))
            .wrap(middlewares::RequireSession)
            .route("/dashboard", web::get().to(teacher_dashboard))
            .route("/create_assignment", web::get().to(create_assignment_page))
            .route("/create_assignment", web::post().to(create_assignment))
            .route(
                "/view_submissions/{assignment_id}",
                web::get().to(view_submissions),
            )
            .route("/student_management", web::get().to(student_roster)),
    );
}

// 配置学生路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/student")
            .wrap(middlewares::RequireRole::new(&UserRole::Student))
            .wrap(middlewares::RequireSession)
            .route("/dashboard", web::get().to(student_dashboard))
            .route(
                "/submit_assignment/{assignment_id}",
                web::get().to(submit_assignment_page),
            )
            .route(
                "/submit_assignment/{assignment_id}",
                web::post().to(submit_assignment),
            ),
    );
}
