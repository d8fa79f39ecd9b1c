use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::errors::PortalError;
use crate::middlewares::RequireSession;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::redirect;

use super::{FileService, can_access};

pub async fn handle_download(
    service: &FileService,
    submission_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match RequireSession::extract_session_user(request) {
        Some(user) => user,
        None => return Ok(redirect("/login")),
    };

    let storage = service.get_storage(request);

    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::NotFound, "提交不存在")));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交失败: {e}"),
                )),
            );
        }
    };

    // 学生只能下载自己的提交
    if !can_access(&user, &submission) {
        tracing::info!(
            "Account {} denied download of submission {}",
            user.id,
            submission.id
        );
        let target = match user.role {
            UserRole::Teacher => "/teacher/dashboard",
            UserRole::Student => "/student/dashboard",
        };
        return Ok(redirect(target));
    }

    let file_path = match &submission.file_path {
        Some(path) if Path::new(path).exists() => path.clone(),
        _ => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "文件不存在",
            )));
        }
    };

    let mut file = match File::open(&file_path) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("{:?}", PortalError::file_operation(format!("{e:?}")));
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "文件打开失败",
                )),
            );
        }
    };

    let mut buf = Vec::new();
    if file.read_to_end(&mut buf).is_err() {
        tracing::error!("{:?}", PortalError::file_operation("文件读取失败"));
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "文件读取失败",
            )),
        );
    }

    // 恢复原始文件名
    let download_name = submission
        .file_name
        .clone()
        .unwrap_or_else(|| format!("submission_{submission_id}.docx"));

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "application/octet-stream"))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{download_name}\""),
        ))
        .body(buf))
}
