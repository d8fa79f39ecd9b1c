use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::FileService;

// 懒加载的全局 FileService 实例
static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn download_file(
    request: HttpRequest,
    submission_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE
        .download(submission_id.into_inner(), &request)
        .await
}

pub async fn preview_file(
    request: HttpRequest,
    submission_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE
        .preview(submission_id.into_inner(), &request)
        .await
}

// 配置路由（师生都可访问，权限在处理程序内按提交归属判断）
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .wrap(middlewares::RequireSession)
            .route("/download/{submission_id}", web::get().to(download_file))
            .route("/preview/{submission_id}", web::get().to(preview_file)),
    );
}
