pub mod create;
pub mod student_dashboard;
pub mod teacher_dashboard;
pub mod view_submissions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::ApiResponse;
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
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

    // 教师面板
    pub async fn teacher_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        teacher_dashboard::handle_teacher_dashboard(self, request).await
    }

    // 布置作业页
    pub async fn create_page(&self) -> ActixResult<HttpResponse> {
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("填写作业标题、内容与截止日期")))
    }

    // 布置作业
    pub async fn create(
        &self,
        create_request: crate::models::assignments::requests::CreateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_assignment(self, create_request, request).await
    }

    // 查看某次作业的全部提交（仅限布置者）
    pub async fn view_submissions(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        view_submissions::handle_view_submissions(self, assignment_id, request).await
    }

    // 学生面板
    pub async fn student_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        student_dashboard::handle_student_dashboard(self, request).await
    }
}
