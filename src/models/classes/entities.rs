use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 班级名称
    pub name: String,
    // 分部
    pub section: Option<String>,
    // 班主任
    pub teacher_id: Option<i64>,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Subject {
    // 科目ID
    pub id: i64,
    // 科目名称
    pub name: String,
    // 科目代码
    pub code: Option<String>,
    // 所属班级
    pub class_id: i64,
    // 任课教师
    pub teacher_id: Option<i64>,
}
