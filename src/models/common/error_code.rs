/// 统一业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 请求与校验
    InvalidParams = 1001,
    MissingFields = 1002,
    PasswordMismatch = 1003,

    // 认证与授权
    AuthFailed = 2001,
    Unauthorized = 2002,
    Forbidden = 2003,

    // 资源
    NotFound = 3001,
    UserNameAlreadyExists = 3002,

    // 文件
    FileTypeNotAllowed = 4001,
    FileNotFound = 4002,
    FileUploadFailed = 4003,

    // 服务端
    InternalServerError = 5001,
    RegisterFailed = 5002,
    SubmitFailed = 5003,
}
