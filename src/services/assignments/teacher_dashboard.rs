use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireSession;
use crate::models::assignments::responses::TeacherDashboardResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::redirect;

use super::AssignmentService;

pub async fn handle_teacher_dashboard(
    service: &AssignmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match RequireSession::extract_session_user(request) {
        Some(user) => user,
        None => return Ok(redirect("/login")),
    };

    let storage = service.get_storage(request);

    match storage.list_assignments_by_teacher(user.id).await {
        Ok(assignments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TeacherDashboardResponse { assignments },
            "获取作业列表成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("获取作业列表失败: {e}"),
            )),
        ),
    }
}
