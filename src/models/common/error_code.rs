/// 业务错误码
///
/// 每个失败条件对应独立的错误码，调用方据此渲染具体原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    InvalidParameter = 1006,

    // 资源不存在 2xxx
    UserNotFound = 2001,
    StudentNotFound = 2002,
    ClassNotFound = 2003,
    ExamNotFound = 2004,
    SubjectNotFound = 2005,
    RecipientNotFound = 2006,

    // 考勤 3xxx
    InvalidDateRange = 3001,
    InvalidMonth = 3002,
    StudentNotInClass = 3003,
    DuplicateAttendanceEntry = 3004,
    DateRangeTooLong = 3005,

    // 成绩 4xxx
    MarksOutOfRange = 4001,
    InvalidTotalMarks = 4002,

    // 消息 5xxx
    EmptyMessageContent = 5001,
    RecipientRequired = 5002,
    SelfMessage = 5003,
    InvalidRoomName = 5004,
}

impl ErrorCode {
    /// 数值形式
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
