use serde::Deserialize;
use ts_rs::TS;

use super::entities::AttendanceStatus;

// 按月查询参数，缺省为当月
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

// 任意日期区间（闭区间）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct RangeQuery {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

// 单日查询参数，缺省为今天
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct DayQuery {
    pub date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceEntry {
    pub student_id: i64,
    pub status: AttendanceStatus,
}

// 登记某班某日考勤（整日替换）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MarkAttendanceRequest {
    pub date: chrono::NaiveDate,
    pub entries: Vec<AttendanceEntry>,
}
