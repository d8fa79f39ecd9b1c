use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::users::responses::StudentRosterResponse;
use crate::models::{ApiResponse, ErrorCode};

use super::StudentService;

pub async fn handle_roster(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_students().await {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentRosterResponse { students },
            "获取学生名册成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("获取学生名册失败: {e}"),
            )),
        ),
    }
}
