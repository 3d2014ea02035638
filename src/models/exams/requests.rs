use serde::Deserialize;
use ts_rs::TS;

// 创建考试请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct CreateExamRequest {
    pub title: String,
    pub exam_type: String,
    pub class_id: i64,
    pub subject_id: i64,
    pub exam_date: chrono::NaiveDate,
    pub total_marks: i32,
    pub passing_marks: Option<i32>,
}

// 录入（或更新）某学生的考试成绩
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct RecordResultRequest {
    pub student_id: i64,
    pub marks: f64,
    pub remarks: Option<String>,
}
