pub mod assignments;
pub mod auth;
pub mod files;
pub mod students;
pub mod submissions;

pub use assignments::{configure_student_routes, configure_teacher_routes};
pub use auth::configure_auth_routes;
pub use files::configure_file_routes;
