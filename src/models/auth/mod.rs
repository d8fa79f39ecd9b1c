pub mod requests;

pub use requests::LoginRequest;
