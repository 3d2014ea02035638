//! 考勤存储操作

use super::SeaOrmStorage;
use crate::entity::attendances::{ActiveModel, Column, Entity as Attendances};
use crate::errors::{EduSyncError, Result};
use crate::models::attendance::{entities::AttendanceRecord, requests::AttendanceEntry};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 列出学生的考勤记录（按日期升序）
    pub async fn list_student_attendance_impl(
        &self,
        student_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>> {
        let mut select = Attendances::find().filter(Column::StudentId.eq(student_id));

        if let Some(start) = start {
            select = select.filter(Column::Date.gte(start));
        }
        if let Some(end) = end {
            select = select.filter(Column::Date.lte(end));
        }

        let records = select
            .order_by_asc(Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询考勤记录失败: {e}")))?;

        Ok(records.into_iter().filter_map(|m| m.into_record()).collect())
    }

    /// 列出班级某日的考勤记录
    pub async fn list_class_attendance_impl(
        &self,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        let records = Attendances::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Date.eq(date))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询班级考勤失败: {e}")))?;

        Ok(records.into_iter().filter_map(|m| m.into_record()).collect())
    }

    /// 整日替换班级考勤
    ///
    /// 先删除该日期下属于该班级、或属于本次名单中学生的记录，再逐条插入。
    /// 全部在同一个事务中完成，并发读取只会看到替换前或替换后的完整集合。
    pub async fn replace_class_attendance_impl(
        &self,
        class_id: i64,
        date: NaiveDate,
        marked_by: i64,
        entries: &[AttendanceEntry],
    ) -> Result<usize> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduSyncError::database_operation(format!("开启事务失败: {e}")))?;

        let student_ids: Vec<i64> = entries.iter().map(|e| e.student_id).collect();

        // (student_id, date) 唯一，转班学生在旧班级当天的记录也要一并替换
        let mut scope = Condition::any().add(Column::ClassId.eq(class_id));
        if !student_ids.is_empty() {
            scope = scope.add(Column::StudentId.is_in(student_ids));
        }

        Attendances::delete_many()
            .filter(Column::Date.eq(date))
            .filter(scope)
            .exec(&txn)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("清除当日考勤失败: {e}")))?;

        for entry in entries {
            let model = ActiveModel {
                student_id: Set(entry.student_id),
                class_id: Set(class_id),
                date: Set(date),
                status: Set(entry.status.to_string()),
                marked_by: Set(Some(marked_by)),
                ..Default::default()
            };

            model
                .insert(&txn)
                .await
                .map_err(|e| EduSyncError::database_operation(format!("写入考勤失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| EduSyncError::database_operation(format!("提交考勤事务失败: {e}")))?;

        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{self, Fixture};
    use crate::models::attendance::{entities::AttendanceStatus, requests::AttendanceEntry};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn entry(student_id: i64, status: AttendanceStatus) -> AttendanceEntry {
        AttendanceEntry { student_id, status }
    }

    #[tokio::test]
    async fn test_replace_day_is_idempotent() {
        let Fixture {
            storage,
            class,
            students,
            teacher,
            ..
        } = fixtures::school().await;

        let entries = vec![
            entry(students[0].id, AttendanceStatus::Present),
            entry(students[1].id, AttendanceStatus::Late),
        ];

        for _ in 0..2 {
            let written = storage
                .replace_class_attendance_impl(class.id, day(3), teacher.id, &entries)
                .await
                .unwrap();
            assert_eq!(written, 2);
        }

        let records = storage
            .list_class_attendance_impl(class.id, day(3))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, AttendanceStatus::Present);
        assert_eq!(records[1].status, AttendanceStatus::Late);
        assert_eq!(records[0].marked_by, Some(teacher.id));
    }

    #[tokio::test]
    async fn test_replace_day_drops_students_left_out() {
        let Fixture {
            storage,
            class,
            students,
            teacher,
            ..
        } = fixtures::school().await;

        storage
            .replace_class_attendance_impl(
                class.id,
                day(4),
                teacher.id,
                &[
                    entry(students[0].id, AttendanceStatus::Present),
                    entry(students[1].id, AttendanceStatus::Absent),
                ],
            )
            .await
            .unwrap();
        storage
            .replace_class_attendance_impl(
                class.id,
                day(4),
                teacher.id,
                &[entry(students[1].id, AttendanceStatus::Present)],
            )
            .await
            .unwrap();

        let records = storage
            .list_class_attendance_impl(class.id, day(4))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].student_id, students[1].id);
        assert_eq!(records[0].status, AttendanceStatus::Present);
    }

    #[tokio::test]
    async fn test_replace_day_leaves_other_dates_alone() {
        let Fixture {
            storage,
            class,
            students,
            teacher,
            ..
        } = fixtures::school().await;

        for d in [5, 6] {
            storage
                .replace_class_attendance_impl(
                    class.id,
                    day(d),
                    teacher.id,
                    &[entry(students[0].id, AttendanceStatus::Present)],
                )
                .await
                .unwrap();
        }
        storage
            .replace_class_attendance_impl(class.id, day(6), teacher.id, &[])
            .await
            .unwrap();

        let records = storage
            .list_student_attendance_impl(students[0].id, Some(day(1)), Some(day(31)))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, day(5));
    }

    #[tokio::test]
    async fn test_list_student_attendance_respects_bounds() {
        let Fixture {
            storage,
            class,
            students,
            teacher,
            ..
        } = fixtures::school().await;

        for d in [1, 10, 20] {
            storage
                .replace_class_attendance_impl(
                    class.id,
                    day(d),
                    teacher.id,
                    &[entry(students[0].id, AttendanceStatus::Present)],
                )
                .await
                .unwrap();
        }

        let bounded = storage
            .list_student_attendance_impl(students[0].id, Some(day(2)), Some(day(20)))
            .await
            .unwrap();
        assert_eq!(
            bounded.iter().map(|r| r.date).collect::<Vec<_>>(),
            vec![day(10), day(20)]
        );

        let all = storage
            .list_student_attendance_impl(students[0].id, None, None)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_stored_status_is_skipped_not_counted_absent() {
        use crate::entity::attendances::ActiveModel;
        use sea_orm::{ActiveModelTrait, Set};

        let Fixture {
            storage,
            class,
            students,
            ..
        } = fixtures::school().await;

        ActiveModel {
            student_id: Set(students[0].id),
            class_id: Set(class.id),
            date: Set(day(12)),
            status: Set("excused".to_string()),
            marked_by: Set(None),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .unwrap();

        let records = storage
            .list_student_attendance_impl(students[0].id, None, None)
            .await
            .unwrap();
        assert!(records.is_empty());

        let records = storage
            .list_class_attendance_impl(class.id, day(12))
            .await
            .unwrap();
        assert!(records.is_empty());
    }
}
