use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::TimeZone;

use crate::middlewares::RequireSession;
use crate::models::assignments::requests::{CreateAssignmentRequest, NewAssignment};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::redirect;

use super::AssignmentService;

pub async fn handle_create_assignment(
    service: &AssignmentService,
    create_request: CreateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match RequireSession::extract_session_user(request) {
        Some(user) => user,
        None => return Ok(redirect("/login")),
    };

    let title = create_request.title.trim();
    let content = create_request.content.trim();

    if title.is_empty() || content.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::MissingFields,
            "作业标题和内容不能为空",
        )));
    }

    // 截止日期可留空；给出的必须是 YYYY-MM-DD，按当日 23:59:59 截止
    let due_date = match create_request
        .due_date
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        Some(raw) => match chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => date
                .and_hms_opt(23, 59, 59)
                .map(|dt| chrono::Utc.from_utc_datetime(&dt)),
            Err(_) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::InvalidParams,
                    "截止日期格式应为 YYYY-MM-DD",
                )));
            }
        },
        None => None,
    };

    let storage = service.get_storage(request);
    let new_assignment = NewAssignment {
        title: title.to_string(),
        content: content.to_string(),
        teacher_id: user.id,
        due_date,
    };

    match storage.create_assignment(new_assignment).await {
        Ok(assignment) => {
            tracing::info!(
                "Teacher {} created assignment {} ({})",
                user.username,
                assignment.id,
                assignment.title
            );
            Ok(redirect("/teacher/dashboard"))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("布置作业失败: {e}"),
            )),
        ),
    }
}
