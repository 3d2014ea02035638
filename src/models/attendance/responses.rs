use std::collections::BTreeMap;

use serde::Serialize;
use ts_rs::TS;

use super::entities::DayStatus;

// 单个学生在某个区间内的考勤汇总
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummary {
    pub student_id: i64,
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
    pub present_count: u32,
    pub absent_count: u32,
    pub late_count: u32,
    pub total_marked: u32,
    // 出勤率，仅以已登记天数为分母
    pub percentage: f64,
    // 区间内每一天的状态
    pub days: BTreeMap<chrono::NaiveDate, DayStatus>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct RollEntry {
    pub student_id: i64,
    pub student_number: String,
    pub full_name: String,
    pub status: DayStatus,
}

// 班级某日点名册
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct ClassDayRoll {
    pub class_id: i64,
    pub date: chrono::NaiveDate,
    pub entries: Vec<RollEntry>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct StudentMonthlyRow {
    pub student_number: String,
    pub full_name: String,
    pub summary: AttendanceSummary,
}

// 班级月度报表
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct ClassMonthlyReport {
    pub class_id: i64,
    pub year: i32,
    pub month: u32,
    pub students: Vec<StudentMonthlyRow>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MarkAttendanceResponse {
    pub class_id: i64,
    pub date: chrono::NaiveDate,
    pub recorded: usize,
}
