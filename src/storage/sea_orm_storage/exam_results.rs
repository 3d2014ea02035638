//! 考试成绩存储操作

use super::SeaOrmStorage;
use crate::entity::exam_results::{ActiveModel, Column, Entity as ExamResults};
use crate::errors::{EduSyncError, Result};
use crate::models::exams::entities::ExamResult;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};

impl SeaOrmStorage {
    /// 按 (exam, student) 录入成绩，已存在则原地更新
    ///
    /// 冲突由唯一索引 (exam_id, student_id) 在数据库内解决，并发首次录入也只留一行。
    pub async fn upsert_exam_result_impl(
        &self,
        exam_id: i64,
        student_id: i64,
        marks: f64,
        remarks: Option<String>,
    ) -> Result<ExamResult> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduSyncError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            exam_id: Set(exam_id),
            student_id: Set(student_id),
            marks: Set(marks),
            remarks: Set(remarks),
            recorded_at: Set(now),
            ..Default::default()
        };

        ExamResults::insert(model)
            .on_conflict(
                OnConflict::columns([Column::ExamId, Column::StudentId])
                    .update_columns([Column::Marks, Column::Remarks, Column::RecordedAt])
                    .to_owned(),
            )
            .exec(&txn)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("录入成绩失败: {e}")))?;

        let saved = ExamResults::find()
            .filter(Column::ExamId.eq(exam_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&txn)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询成绩失败: {e}")))?
            .ok_or_else(|| EduSyncError::database_operation("录入成绩后未找到记录"))?;

        txn.commit()
            .await
            .map_err(|e| EduSyncError::database_operation(format!("提交成绩事务失败: {e}")))?;

        Ok(saved.into_exam_result())
    }

    pub async fn get_exam_result_impl(
        &self,
        exam_id: i64,
        student_id: i64,
    ) -> Result<Option<ExamResult>> {
        let result = ExamResults::find()
            .filter(Column::ExamId.eq(exam_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_exam_result()))
    }

    pub async fn list_results_by_student_impl(&self, student_id: i64) -> Result<Vec<ExamResult>> {
        let results = ExamResults::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::ExamId)
            .all(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询学生成绩失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_exam_result()).collect())
    }

    pub async fn list_results_by_exam_impl(&self, exam_id: i64) -> Result<Vec<ExamResult>> {
        let results = ExamResults::find()
            .filter(Column::ExamId.eq(exam_id))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询考试成绩失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_exam_result()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{self, Fixture};
    use crate::models::exams::requests::CreateExamRequest;

    #[tokio::test]
    async fn test_upsert_keeps_one_row_per_exam_and_student() {
        let Fixture {
            storage,
            class,
            math,
            students,
            ..
        } = fixtures::school().await;

        let exam = storage
            .create_exam_impl(CreateExamRequest {
                title: "Unit test".to_string(),
                exam_type: "quiz".to_string(),
                class_id: class.id,
                subject_id: math.id,
                exam_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
                total_marks: 50,
                passing_marks: Some(25),
            })
            .await
            .unwrap();

        let first = storage
            .upsert_exam_result_impl(exam.id, students[0].id, 30.0, None)
            .await
            .unwrap();
        let second = storage
            .upsert_exam_result_impl(exam.id, students[0].id, 42.5, Some("improved".into()))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.marks, 42.5);

        let all = storage.list_results_by_exam_impl(exam.id).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].remarks.as_deref(), Some("improved"));

        let fetched = storage
            .get_exam_result_impl(exam.id, students[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.marks, 42.5);
        assert!(
            storage
                .get_exam_result_impl(exam.id, students[1].id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_concurrent_first_entries_replace_in_place() {
        let Fixture {
            storage,
            class,
            math,
            students,
            ..
        } = fixtures::school().await;

        let exam = storage
            .create_exam_impl(CreateExamRequest {
                title: "Midterm".to_string(),
                exam_type: "midterm".to_string(),
                class_id: class.id,
                subject_id: math.id,
                exam_date: chrono::NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
                total_marks: 100,
                passing_marks: None,
            })
            .await
            .unwrap();

        let (a, b) = tokio::join!(
            storage.upsert_exam_result_impl(exam.id, students[1].id, 61.0, None),
            storage.upsert_exam_result_impl(exam.id, students[1].id, 77.0, Some("recheck".into())),
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(a.id, b.id);

        let all = storage.list_results_by_exam_impl(exam.id).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].marks == 61.0 || all[0].marks == 77.0);
    }
}
