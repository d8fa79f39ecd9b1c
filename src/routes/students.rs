use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use once_cell::sync::Lazy;

use crate::services::StudentService;

// 懒加载的全局 StudentService 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn student_roster(request: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.roster(&request).await
}
