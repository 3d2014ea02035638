use serde::Deserialize;
use ts_rs::TS;

// 学生建档请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub user_id: i64,
    pub student_number: String,
    pub class_id: Option<i64>,
    pub parent_id: Option<i64>,
}
