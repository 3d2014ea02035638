use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 考勤状态（数据库中实际存储的取值）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum AttendanceStatus {
    Present, // 出勤
    Absent,  // 缺勤
    Late,    // 迟到
}

impl AttendanceStatus {
    pub const PRESENT: &'static str = "present";
    pub const ABSENT: &'static str = "absent";
    pub const LATE: &'static str = "late";
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "{}", AttendanceStatus::PRESENT),
            AttendanceStatus::Absent => write!(f, "{}", AttendanceStatus::ABSENT),
            AttendanceStatus::Late => write!(f, "{}", AttendanceStatus::LATE),
        }
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AttendanceStatus::PRESENT => Ok(AttendanceStatus::Present),
            AttendanceStatus::ABSENT => Ok(AttendanceStatus::Absent),
            AttendanceStatus::LATE => Ok(AttendanceStatus::Late),
            _ => Err(format!("Invalid attendance status: {s}")),
        }
    }
}

// 日历视图中的单日状态
//
// 没有记录的日期是 NotMarked，既不算出勤也不算缺勤。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum DayStatus {
    Present,
    Absent,
    Late,
    NotMarked,
}

impl From<AttendanceStatus> for DayStatus {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Present => DayStatus::Present,
            AttendanceStatus::Absent => DayStatus::Absent,
            AttendanceStatus::Late => DayStatus::Late,
        }
    }
}

impl From<Option<AttendanceStatus>> for DayStatus {
    fn from(status: Option<AttendanceStatus>) -> Self {
        status.map(DayStatus::from).unwrap_or(DayStatus::NotMarked)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecord {
    // 记录ID
    pub id: i64,
    // 学生ID
    pub student_id: i64,
    // 记录时所在班级
    pub class_id: i64,
    // 日期
    pub date: chrono::NaiveDate,
    // 状态
    pub status: AttendanceStatus,
    // 登记人
    pub marked_by: Option<i64>,
}
