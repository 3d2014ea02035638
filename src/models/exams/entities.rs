use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct Exam {
    // 考试ID
    pub id: i64,
    // 标题
    pub title: String,
    // 类型（期中、期末、测验……）
    pub exam_type: String,
    // 所属班级
    pub class_id: i64,
    // 所属科目
    pub subject_id: i64,
    // 考试日期
    pub exam_date: chrono::NaiveDate,
    // 满分
    pub total_marks: i32,
    // 及格线
    pub passing_marks: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamResult {
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    // 得分
    pub marks: f64,
    // 评语
    pub remarks: Option<String>,
    // 录入时间
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}
