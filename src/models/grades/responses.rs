use serde::Serialize;
use ts_rs::TS;

use super::entities::{Badge, LetterGrade, OverallGrade};

// 单场考试在成绩单中的一行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ExamGradeRow {
    pub exam_id: i64,
    pub title: String,
    pub exam_type: String,
    pub exam_date: chrono::NaiveDate,
    pub total_marks: i32,
    // 未录入成绩时为空
    pub marks: Option<f64>,
    pub percentage: Option<f64>,
    pub letter: Option<LetterGrade>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct SubjectGrade {
    pub subject_id: i64,
    pub name: String,
    pub code: Option<String>,
    pub exams: Vec<ExamGradeRow>,
    // 无已评分考试时为 null
    pub average: Option<f64>,
    // 无数据时为 "N/A"
    pub letter: String,
    pub badge: Option<Badge>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ReportSummary {
    pub overall_average: Option<f64>,
    pub overall_grade: Option<OverallGrade>,
    pub gpa: Option<f64>,
    pub graded_subjects: u32,
    pub attendance_percentage: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ReportCardResponse {
    pub student_id: i64,
    pub student_number: String,
    pub full_name: String,
    pub class_id: Option<i64>,
    pub class_name: Option<String>,
    pub subjects: Vec<SubjectGrade>,
    pub summary: ReportSummary,
}
