use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::SubmissionService;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn submit_assignment_page(
    request: HttpRequest,
    assignment_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .submit_page(assignment_id.into_inner(), &request)
        .await
}

pub async fn submit_assignment(
    request: HttpRequest,
    assignment_id: web::Path<i64>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .submit(assignment_id.into_inner(), &request, payload)
        .await
}
