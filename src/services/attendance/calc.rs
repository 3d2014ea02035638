//! 考勤统计
//!
//! 纯计算，不访问存储。出勤率只以已登记的天数为分母，未登记的日期单独标记为 not_marked。

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};

use crate::models::ErrorCode;
use crate::models::attendance::{
    entities::{AttendanceRecord, AttendanceStatus, DayStatus},
    requests::AttendanceEntry,
    responses::AttendanceSummary,
};

/// 考勤请求被拒绝的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceRejection {
    InvalidMonth(u32),
    InvalidDateRange {
        start: NaiveDate,
        end: NaiveDate,
    },
    RangeTooLong {
        start: NaiveDate,
        end: NaiveDate,
    },
    StudentNotInClass(i64),
    DuplicateEntry(i64),
}

impl AttendanceRejection {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AttendanceRejection::InvalidMonth(_) => ErrorCode::InvalidMonth,
            AttendanceRejection::InvalidDateRange { .. } => ErrorCode::InvalidDateRange,
            AttendanceRejection::RangeTooLong { .. } => ErrorCode::DateRangeTooLong,
            AttendanceRejection::StudentNotInClass(_) => ErrorCode::StudentNotInClass,
            AttendanceRejection::DuplicateEntry(_) => ErrorCode::DuplicateAttendanceEntry,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AttendanceRejection::InvalidMonth(month) => format!("无效的月份: {month}"),
            AttendanceRejection::InvalidDateRange { start, end } => {
                format!("开始日期 {start} 晚于结束日期 {end}")
            }
            AttendanceRejection::RangeTooLong { start, end } => {
                format!("查询区间 {start} ~ {end} 超过 {MAX_RANGE_DAYS} 天")
            }
            AttendanceRejection::StudentNotInClass(id) => format!("学生 {id} 不属于该班级"),
            AttendanceRejection::DuplicateEntry(id) => format!("学生 {id} 在名单中重复出现"),
        }
    }
}

/// 单次查询允许的最大天数（含首尾）
pub const MAX_RANGE_DAYS: i64 = 366;

/// 校验查询区间：不能倒置，也不能超过 [`MAX_RANGE_DAYS`]
pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), AttendanceRejection> {
    if start > end {
        return Err(AttendanceRejection::InvalidDateRange { start, end });
    }
    if (end - start).num_days() + 1 > MAX_RANGE_DAYS {
        return Err(AttendanceRejection::RangeTooLong { start, end });
    }
    Ok(())
}

/// 某月的第一天和最后一天
pub fn month_window(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), AttendanceRejection> {
    let first =
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(AttendanceRejection::InvalidMonth(month))?;

    // 12 月单独处理，次月是下一年的 1 月
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(AttendanceRejection::InvalidMonth(month))?;

    let last = next_first
        .pred_opt()
        .ok_or(AttendanceRejection::InvalidMonth(month))?;

    Ok((first, last))
}

/// 当前所在月份
pub fn current_month() -> (i32, u32) {
    let today = chrono::Local::now().date_naive();
    (today.year(), today.month())
}

/// 出勤率，无记录时为 0
pub fn percentage(present: u32, total_marked: u32) -> f64 {
    if total_marked == 0 {
        0.0
    } else {
        f64::from(present) / f64::from(total_marked) * 100.0
    }
}

/// 各状态计数
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttendanceTally {
    pub present: u32,
    pub absent: u32,
    pub late: u32,
}

impl AttendanceTally {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Self {
        let mut tally = Self::default();
        for record in records {
            tally.add(record.status);
        }
        tally
    }

    pub fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Late => self.late += 1,
        }
    }

    pub fn total_marked(&self) -> u32 {
        self.present + self.absent + self.late
    }

    pub fn percentage(&self) -> f64 {
        percentage(self.present, self.total_marked())
    }
}

/// 计算单个学生在 [start, end] 内的考勤汇总
///
/// 区间外的记录会被忽略。
pub fn summarize(
    student_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    records: &[AttendanceRecord],
) -> Result<AttendanceSummary, AttendanceRejection> {
    check_range(start, end)?;

    let by_date: HashMap<NaiveDate, AttendanceStatus> = records
        .iter()
        .filter(|r| r.student_id == student_id && r.date >= start && r.date <= end)
        .map(|r| (r.date, r.status))
        .collect();

    let mut tally = AttendanceTally::default();
    for status in by_date.values() {
        tally.add(*status);
    }

    let days: BTreeMap<NaiveDate, DayStatus> = start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| (d, DayStatus::from(by_date.get(&d).copied())))
        .collect();

    Ok(AttendanceSummary {
        student_id,
        start,
        end,
        present_count: tally.present,
        absent_count: tally.absent,
        late_count: tally.late,
        total_marked: tally.total_marked(),
        percentage: tally.percentage(),
        days,
    })
}

/// 校验整日考勤名单：学生必须属于该班级且不能重复
pub fn validate_entries(
    class_members: &HashSet<i64>,
    entries: &[AttendanceEntry],
) -> Result<(), AttendanceRejection> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !class_members.contains(&entry.student_id) {
            return Err(AttendanceRejection::StudentNotInClass(entry.student_id));
        }
        if !seen.insert(entry.student_id) {
            return Err(AttendanceRejection::DuplicateEntry(entry.student_id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(student_id: i64, date: NaiveDate, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: 0,
            student_id,
            class_id: 1,
            date,
            status,
            marked_by: None,
        }
    }

    #[test]
    fn test_month_window_every_month() {
        let expected_last = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (i, last) in expected_last.iter().enumerate() {
            let month = i as u32 + 1;
            let (first, end) = month_window(2025, month).unwrap();
            assert_eq!(first, date(2025, month, 1));
            assert_eq!(end, date(2025, month, *last));
        }
    }

    #[test]
    fn test_month_window_leap_february_and_december() {
        assert_eq!(
            month_window(2024, 2).unwrap(),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
        assert_eq!(
            month_window(2100, 2).unwrap().1,
            date(2100, 2, 28)
        );
        assert_eq!(
            month_window(2025, 12).unwrap(),
            (date(2025, 12, 1), date(2025, 12, 31))
        );
    }

    #[test]
    fn test_month_window_rejects_invalid_month() {
        assert_eq!(month_window(2025, 0), Err(AttendanceRejection::InvalidMonth(0)));
        assert_eq!(month_window(2025, 13), Err(AttendanceRejection::InvalidMonth(13)));
    }

    #[test]
    fn test_eighteen_of_twenty_present_is_ninety_percent() {
        let (start, end) = month_window(2025, 3).unwrap();
        let records: Vec<_> = (1..=20)
            .map(|d| {
                let status = if d <= 18 {
                    AttendanceStatus::Present
                } else {
                    AttendanceStatus::Absent
                };
                record(7, date(2025, 3, d), status)
            })
            .collect();

        let summary = summarize(7, start, end, &records).unwrap();
        assert_eq!(summary.total_marked, 20);
        assert_eq!(summary.present_count, 18);
        assert!((summary.percentage - 90.0).abs() < 1e-9);
        assert_eq!(summary.days.len(), 31);
    }

    #[test]
    fn test_unmarked_days_are_distinct_from_absent() {
        let start = date(2025, 4, 1);
        let end = date(2025, 4, 5);
        let records = vec![
            record(1, date(2025, 4, 1), AttendanceStatus::Present),
            record(1, date(2025, 4, 3), AttendanceStatus::Absent),
            record(1, date(2025, 4, 4), AttendanceStatus::Late),
        ];

        let summary = summarize(1, start, end, &records).unwrap();
        assert_eq!(summary.days[&date(2025, 4, 2)], DayStatus::NotMarked);
        assert_eq!(summary.days[&date(2025, 4, 3)], DayStatus::Absent);
        assert_eq!(summary.days[&date(2025, 4, 5)], DayStatus::NotMarked);
        assert_eq!(
            summary.present_count + summary.absent_count + summary.late_count,
            summary.total_marked
        );
        assert_eq!(summary.total_marked, 3);
        assert!((summary.percentage - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_records_gives_zero_percent() {
        let summary = summarize(1, date(2025, 5, 1), date(2025, 5, 31), &[]).unwrap();
        assert_eq!(summary.total_marked, 0);
        assert_eq!(summary.percentage, 0.0);
        assert!(summary.days.values().all(|s| *s == DayStatus::NotMarked));
    }

    #[test]
    fn test_records_outside_window_or_other_students_are_ignored() {
        let records = vec![
            record(1, date(2025, 5, 31), AttendanceStatus::Present),
            record(1, date(2025, 6, 1), AttendanceStatus::Absent),
            record(2, date(2025, 6, 2), AttendanceStatus::Present),
        ];
        let summary = summarize(1, date(2025, 6, 1), date(2025, 6, 2), &records).unwrap();
        assert_eq!(summary.total_marked, 1);
        assert_eq!(summary.absent_count, 1);
        assert_eq!(summary.percentage, 0.0);
    }

    #[test]
    fn test_single_day_range_and_inverted_range() {
        let d = date(2025, 1, 15);
        let summary = summarize(1, d, d, &[record(1, d, AttendanceStatus::Late)]).unwrap();
        assert_eq!(summary.days.len(), 1);
        assert_eq!(summary.late_count, 1);

        let err = summarize(1, date(2025, 2, 1), date(2025, 1, 1), &[]).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidDateRange);
    }

    #[test]
    fn test_range_longer_than_cap_is_rejected() {
        // 闰年整年 366 天恰好在上限内
        assert!(check_range(date(2024, 1, 1), date(2024, 12, 31)).is_ok());

        let err = check_range(date(2024, 1, 1), date(2025, 1, 1)).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::DateRangeTooLong);

        let far_start = NaiveDate::from_ymd_opt(1, 1, 1).unwrap();
        let far_end = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        assert_eq!(
            summarize(1, far_start, far_end, &[]).unwrap_err(),
            AttendanceRejection::RangeTooLong {
                start: far_start,
                end: far_end,
            }
        );
    }

    #[test]
    fn test_tally_from_records() {
        let d = date(2025, 1, 1);
        let records = vec![
            record(1, d, AttendanceStatus::Present),
            record(1, d.succ_opt().unwrap(), AttendanceStatus::Present),
            record(1, date(2025, 1, 3), AttendanceStatus::Late),
            record(1, date(2025, 1, 4), AttendanceStatus::Absent),
        ];
        let tally = AttendanceTally::from_records(&records);
        assert_eq!(tally.total_marked(), 4);
        assert!((tally.percentage() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_entries() {
        let members: HashSet<i64> = [1, 2, 3].into_iter().collect();
        let ok = vec![
            AttendanceEntry { student_id: 1, status: AttendanceStatus::Present },
            AttendanceEntry { student_id: 2, status: AttendanceStatus::Absent },
        ];
        assert!(validate_entries(&members, &ok).is_ok());
        assert!(validate_entries(&members, &[]).is_ok());

        let outsider = vec![AttendanceEntry { student_id: 9, status: AttendanceStatus::Present }];
        assert_eq!(
            validate_entries(&members, &outsider),
            Err(AttendanceRejection::StudentNotInClass(9))
        );

        let duplicated = vec![
            AttendanceEntry { student_id: 3, status: AttendanceStatus::Present },
            AttendanceEntry { student_id: 3, status: AttendanceStatus::Late },
        ];
        assert_eq!(
            validate_entries(&members, &duplicated),
            Err(AttendanceRejection::DuplicateEntry(3))
        );
    }
}
