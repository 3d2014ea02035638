use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    // 学生ID
    pub id: i64,
    // 对应的用户账号
    pub user_id: i64,
    // 学号
    pub student_number: String,
    // 所在班级，未分班时为空
    pub class_id: Option<i64>,
    // 家长账号
    pub parent_id: Option<i64>,
    // 入学时间
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    pub fn is_in_class(&self, class_id: i64) -> bool {
        self.class_id == Some(class_id)
    }
}
