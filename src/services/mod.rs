pub mod assignments;
pub mod auth;
pub mod files;
pub mod students;
pub mod submissions;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use files::FileService;
pub use students::StudentService;
pub use submissions::SubmissionService;

use actix_web::HttpResponse;
use actix_web::http::header;

/// 门户的 POST 成功路径与权限拒绝都走 302 跳转
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}
