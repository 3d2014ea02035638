use serde::Serialize;
use ts_rs::TS;

// 考试统计
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamStatsResponse {
    pub exam_id: i64,
    pub total_marks: i32,
    pub passing_marks: Option<i32>,
    pub result_count: u32,
    pub passed_count: u32,
    pub failed_count: u32,
    // 无成绩时为 0
    pub pass_percentage: f64,
    pub average_marks: Option<f64>,
    pub average_percentage: Option<f64>,
}
