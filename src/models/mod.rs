pub mod attendance;
pub mod classes;
pub mod common;
pub mod exams;
pub mod grades;
pub mod messages;
pub mod students;
pub mod users;

pub use common::error_code::ErrorCode;
pub use common::response::ApiResponse;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
