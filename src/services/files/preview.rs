use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::path::Path;

use crate::config::AppConfig;
use crate::middlewares::RequireSession;
use crate::models::submissions::responses::PreviewResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::redirect;
use crate::utils::{extract_docx_text, file_extension};

use super::{FileService, can_access};

pub async fn handle_preview(
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

    if !can_access(&user, &submission) {
        tracing::info!(
            "Account {} denied preview of submission {}",
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

    let extension = submission
        .file_name
        .as_deref()
        .or(Some(file_path.as_str()))
        .and_then(file_extension);

    // 只有 docx 支持正文预览，其余类型给出下载提示
    let preview = if extension.as_deref() == Some("docx") {
        match std::fs::read(&file_path) {
            Ok(data) => match extract_docx_text(&data) {
                Ok(text) => {
                    // 评分开关打开时顺带跑一次自动评分
                    let grader_result = if AppConfig::get().grader.enabled {
                        match service.get_grader() {
                            Ok(grader) => Some(grader.evaluate_content(&text).await),
                            Err(e) => {
                                tracing::error!("Grader init failed: {}", e);
                                None
                            }
                        }
                    } else {
                        None
                    };

                    PreviewResponse {
                        submission,
                        file_type: "Word文档".to_string(),
                        file_content: text,
                        grader_result,
                    }
                }
                Err(e) => PreviewResponse {
                    submission,
                    file_type: "错误".to_string(),
                    file_content: format!("文件读取错误: {e}"),
                    grader_result: None,
                },
            },
            Err(e) => PreviewResponse {
                submission,
                file_type: "错误".to_string(),
                file_content: format!("文件读取错误: {e}"),
                grader_result: None,
            },
        }
    } else {
        let file_type = extension
            .map(|ext| ext.to_uppercase())
            .unwrap_or_else(|| "未知".to_string());
        PreviewResponse {
            submission,
            file_type,
            file_content: "此文件类型不支持在线预览，请下载查看。".to_string(),
            grader_result: None,
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(preview, "获取预览成功")))
}
