use serde::Deserialize;
use ts_rs::TS;

// 创建班级请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub name: String,
    pub section: Option<String>,
    pub teacher_id: Option<i64>,
}

// 创建科目请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateSubjectRequest {
    pub name: String,
    pub code: Option<String>,
    pub class_id: i64,
    pub teacher_id: Option<i64>,
}
