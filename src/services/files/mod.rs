pub mod download;
pub mod preview;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::grader::GraderClient;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::UserRole;
use crate::session::SessionUser;
use crate::storage::Storage;

pub struct FileService {
    storage: Option<Arc<dyn Storage>>,
    grader: OnceCell<GraderClient>,
}

impl FileService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            grader: OnceCell::new(),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_grader(&self) -> Result<&GraderClient> {
        self.grader
            .get_or_try_init(|| GraderClient::new(&AppConfig::get().grader))
    }

    // 下载提交的附件
    pub async fn download(
        &self,
        submission_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        download::handle_download(self, submission_id, request).await
    }

    // 在线预览附件（docx 抽取正文，可选触发自动评分）
    pub async fn preview(
        &self,
        submission_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        preview::handle_preview(self, submission_id, request).await
    }
}

/// 教师可访问任何提交，学生只能访问自己的
pub(crate) fn can_access(user: &SessionUser, submission: &Submission) -> bool {
    match user.role {
        UserRole::Teacher => true,
        UserRole::Student => submission.student_id == user.id,
    }
}
