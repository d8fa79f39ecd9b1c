pub mod docx;
pub mod upload;

pub use docx::extract_docx_text;
pub use upload::{file_extension, is_allowed_extension, sanitize_filename, stored_filename};
