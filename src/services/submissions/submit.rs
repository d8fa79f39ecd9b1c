use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs;
use std::io::Write;
use std::{fs::File, path::Path};

use crate::config::AppConfig;
use crate::errors::PortalError;
use crate::middlewares::RequireSession;
use crate::models::assignments::responses::AssignmentWithStatus;
use crate::models::submissions::requests::{SubmittedFile, UpsertSubmissionRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::redirect;
use crate::utils::{is_allowed_extension, stored_filename};

use super::SubmissionService;

pub async fn handle_submit_page(
    service: &SubmissionService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match RequireSession::extract_session_user(request) {
        Some(user) => user,
        None => return Ok(redirect("/login")),
    };

    let storage = service.get_storage(request);

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::NotFound, "作业不存在")));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询作业失败: {e}"),
                )),
            );
        }
    };

    match storage
        .get_submission_for_student(assignment_id, user.id)
        .await
    {
        Ok(submission) => {
            let submitted = submission.is_some();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AssignmentWithStatus {
                    assignment,
                    submitted,
                    submission,
                },
                "获取作业详情成功",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询提交状态失败: {e}"),
            )),
        ),
    }
}

pub async fn handle_submit(
    service: &SubmissionService,
    assignment_id: i64,
    request: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let upload_dir = &config.upload.dir;
    let max_size = config.upload.max_size;
    let allowed = &config.upload.allowed_extensions;

    let user = match RequireSession::extract_session_user(request) {
        Some(user) => user,
        None => return Ok(redirect("/login")),
    };

    let storage = service.get_storage(request);

    // 作业必须存在
    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::NotFound, "作业不存在")));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询作业失败: {e}"),
                )),
            );
        }
    }

    // 确保上传目录存在
    if !Path::new(upload_dir).exists()
        && let Err(e) = fs::create_dir_all(upload_dir)
    {
        tracing::error!("{}", PortalError::file_operation(format!("{e}")));
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FileUploadFailed,
                "创建上传目录失败",
            )),
        );
    }

    let mut content: Option<String> = None;
    let mut uploaded: Option<SubmittedFile> = None;

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            // 表单流中断不是正常结束，残缺的提交不能入库
            Err(e) => {
                if let Some(file) = &uploaded {
                    let _ = fs::remove_file(&file.file_path);
                }
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::FileUploadFailed,
                    format!("表单数据不完整: {e}"),
                )));
            }
        };

        let (name, filename) = {
            let cd = field.content_disposition();
            (
                cd.and_then(|c| c.get_name()).unwrap_or_default().to_string(),
                cd.and_then(|c| c.get_filename()).map(|s| s.to_string()),
            )
        };

        match name.as_str() {
            "content" => {
                let mut text = Vec::new();
                while let Some(chunk) = field.next().await {
                    text.extend_from_slice(&chunk?);
                }
                content = Some(String::from_utf8_lossy(&text).trim().to_string());
            }
            "file" => {
                let original_name = filename.unwrap_or_default();
                // 浏览器在未选文件时也会带一个空的 file 字段
                if original_name.is_empty() {
                    while let Some(chunk) = field.next().await {
                        let _ = chunk?;
                    }
                    continue;
                }

                if !is_allowed_extension(&original_name, allowed) {
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::FileTypeNotAllowed,
                        "仅支持 txt、pdf、doc、docx 文件",
                    )));
                }

                let stored = stored_filename(&original_name);
                let file_path = format!("{upload_dir}/{stored}");
                let mut f = match File::create(&file_path) {
                    Ok(file) => file,
                    Err(e) => {
                        tracing::error!("{}", PortalError::file_operation(format!("{e}")));
                        return Ok(HttpResponse::InternalServerError().json(
                            ApiResponse::error_empty(ErrorCode::FileUploadFailed, "文件创建失败"),
                        ));
                    }
                };

                let mut total_size: usize = 0;
                while let Some(chunk) = field.next().await {
                    let data = chunk?;
                    total_size += data.len();
                    if total_size > max_size {
                        let _ = fs::remove_file(&file_path);
                        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                            ErrorCode::FileUploadFailed,
                            "文件大小超出限制",
                        )));
                    }
                    f.write_all(&data)?;
                }

                uploaded = Some(SubmittedFile {
                    file_path,
                    file_name: original_name,
                });
            }
            _ => {}
        }
    }

    // 文本和文件至少要有一样
    let content = content.filter(|c| !c.is_empty());
    if content.is_none() && uploaded.is_none() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::MissingFields,
            "请填写作业内容或上传文件",
        )));
    }

    // 换了新文件就删掉旧文件
    if uploaded.is_some()
        && let Ok(Some(previous)) = storage
            .get_submission_for_student(assignment_id, user.id)
            .await
        && let Some(old_path) = previous.file_path
    {
        let _ = fs::remove_file(&old_path);
    }

    let new_file_path = uploaded.as_ref().map(|f| f.file_path.clone());
    let upsert = UpsertSubmissionRequest {
        assignment_id,
        student_id: user.id,
        content,
        file: uploaded,
    };

    match storage.upsert_submission(upsert).await {
        Ok(submission) => {
            tracing::info!(
                "Student {} submitted assignment {} (submission {})",
                user.username,
                assignment_id,
                submission.id
            );
            Ok(redirect("/student/dashboard"))
        }
        Err(e) => {
            tracing::error!("Failed to save submission: {}", e);
            // 入库失败时回收刚写入的文件，避免留下无主附件
            if let Some(path) = &new_file_path {
                let _ = fs::remove_file(path);
            }
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::SubmitFailed,
                    "提交失败，请稍后重试",
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::cookie::Cookie;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test, web};
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use crate::models::assignments::requests::NewAssignment;
    use crate::models::users::entities::{Account, UserRole};
    use crate::models::users::requests::CreateAccountRequest;
    use crate::routes::configure_student_routes;
    use crate::session::{SessionStore, SessionUser};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    const BOUNDARY: &str = "portal-test-boundary";

    async fn test_env() -> (Arc<dyn Storage>, SessionStore) {
        let storage = SeaOrmStorage::new_with_url(":memory:", 1, 5)
            .await
            .expect("in-memory storage");
        let sessions = SessionStore::with_settings("portal_session", 16, 60);
        (Arc::new(storage), sessions)
    }

    async fn create_account(
        storage: &Arc<dyn Storage>,
        username: &str,
        role: UserRole,
    ) -> Account {
        storage
            .create_user(CreateAccountRequest {
                username: username.to_string(),
                password: "123".to_string(),
                role,
                display_name: username.to_string(),
                email: None,
            })
            .await
            .unwrap()
    }

    async fn create_assignment(storage: &Arc<dyn Storage>, teacher_id: i64) -> i64 {
        storage
            .create_assignment(NewAssignment {
                title: "第一次作业".to_string(),
                content: "写一个阶乘函数".to_string(),
                teacher_id,
                due_date: None,
            })
            .await
            .unwrap()
            .id
    }

    fn file_body(filename: &str, data: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/plain\r\n\r\n{data}\r\n--{BOUNDARY}--\r\n"
        )
    }

    fn multipart_post(
        assignment_id: i64,
        cookie: &Cookie<'static>,
        body: String,
    ) -> test::TestRequest {
        test::TestRequest::post()
            .uri(&format!("/student/submit_assignment/{assignment_id}"))
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .cookie(cookie.clone())
            .set_payload(body)
    }

    // 上传目录中不应残留包含该名字的文件
    fn assert_no_stored_file(suffix: &str) {
        if let Ok(entries) = fs::read_dir("uploads") {
            for entry in entries.flatten() {
                assert!(
                    !entry.file_name().to_string_lossy().ends_with(suffix),
                    "unexpected stored file for {suffix}"
                );
            }
        }
    }

    #[actix_web::test]
    async fn test_resubmission_removes_previous_file() {
        let (storage, sessions) = test_env().await;
        let teacher = create_account(&storage, "t1", UserRole::Teacher).await;
        let student = create_account(&storage, "s1", UserRole::Student).await;
        let assignment_id = create_assignment(&storage, teacher.id).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(sessions.clone()))
                .configure(configure_student_routes),
        )
        .await;
        let session_id = sessions.create(SessionUser::from(&student)).await;
        let cookie = Cookie::new("portal_session", session_id);

        let req = multipart_post(assignment_id, &cookie, file_body("v1.txt", "第一版答案"));
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::FOUND);

        let first_path = storage
            .get_submission_for_student(assignment_id, student.id)
            .await
            .unwrap()
            .unwrap()
            .file_path
            .unwrap();
        assert!(Path::new(&first_path).exists());

        let req = multipart_post(assignment_id, &cookie, file_body("v2.txt", "第二版答案"));
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/student/dashboard"
        );

        let second_path = storage
            .get_submission_for_student(assignment_id, student.id)
            .await
            .unwrap()
            .unwrap()
            .file_path
            .unwrap();
        // 旧文件被删除，新文件落盘
        assert!(!Path::new(&first_path).exists());
        assert!(Path::new(&second_path).exists());
        let _ = fs::remove_file(&second_path);
    }

    #[actix_web::test]
    async fn test_disallowed_extension_writes_nothing() {
        let (storage, sessions) = test_env().await;
        let teacher = create_account(&storage, "t1", UserRole::Teacher).await;
        let student = create_account(&storage, "s1", UserRole::Student).await;
        let assignment_id = create_assignment(&storage, teacher.id).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(sessions.clone()))
                .configure(configure_student_routes),
        )
        .await;
        let session_id = sessions.create(SessionUser::from(&student)).await;
        let cookie = Cookie::new("portal_session", session_id);

        let req = multipart_post(assignment_id, &cookie, file_body("virus.exe", "MZ"));
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        // 既无数据库记录也无落盘文件
        assert!(
            storage
                .get_submission_for_student(assignment_id, student.id)
                .await
                .unwrap()
                .is_none()
        );
        assert_no_stored_file("virus.exe");
    }

    #[actix_web::test]
    async fn test_truncated_multipart_rejected() {
        let (storage, sessions) = test_env().await;
        let teacher = create_account(&storage, "t1", UserRole::Teacher).await;
        let student = create_account(&storage, "s1", UserRole::Student).await;
        let assignment_id = create_assignment(&storage, teacher.id).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(sessions.clone()))
                .configure(configure_student_routes),
        )
        .await;
        let session_id = sessions.create(SessionUser::from(&student)).await;
        let cookie = Cookie::new("portal_session", session_id);

        // 第二个字段在头部中途截断，且没有结束边界
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"content\"\r\n\r\n完整的文字\r\n--{BOUNDARY}\r\nContent-Disposition: form-"
        );
        let req = multipart_post(assignment_id, &cookie, body);
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        assert!(
            storage
                .get_submission_for_student(assignment_id, student.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[actix_web::test]
    async fn test_failed_save_discards_new_file() {
        let (storage, sessions) = test_env().await;
        let teacher = create_account(&storage, "t1", UserRole::Teacher).await;
        let assignment_id = create_assignment(&storage, teacher.id).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(sessions.clone()))
                .configure(configure_student_routes),
        )
        .await;
        // 会话里的账户已不在数据库中，入库时外键校验失败
        let session_id = sessions
            .create(SessionUser {
                id: 999,
                username: "s9".to_string(),
                role: UserRole::Student,
                display_name: "过期账户".to_string(),
            })
            .await;
        let cookie = Cookie::new("portal_session", session_id);

        let req = multipart_post(assignment_id, &cookie, file_body("ghost.txt", "答案"));
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_no_stored_file("ghost.txt");
    }
}
