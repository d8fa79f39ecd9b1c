use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireSession;
use crate::models::assignments::responses::{AssignmentWithStatus, StudentDashboardResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::redirect;

use super::AssignmentService;

pub async fn handle_student_dashboard(
    service: &AssignmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match RequireSession::extract_session_user(request) {
        Some(user) => user,
        None => return Ok(redirect("/login")),
    };

    let storage = service.get_storage(request);

    let assignments = match storage.list_all_assignments().await {
        Ok(assignments) => assignments,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("获取作业列表失败: {e}"),
                )),
            );
        }
    };

    // 附上本人的提交状态
    let mut items = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        match storage
            .get_submission_for_student(assignment.id, user.id)
            .await
        {
            Ok(submission) => {
                let submitted = submission.is_some();
                items.push(AssignmentWithStatus {
                    assignment,
                    submitted,
                    submission,
                });
            }
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("查询提交状态失败: {e}"),
                    )),
                );
            }
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentDashboardResponse { assignments: items },
        "获取作业列表成功",
    )))
}
