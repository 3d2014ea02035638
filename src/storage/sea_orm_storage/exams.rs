//! 考试存储操作

use super::SeaOrmStorage;
use crate::entity::exams::{ActiveModel, Column, Entity as Exams};
use crate::errors::{EduSyncError, Result};
use crate::models::exams::{entities::Exam, requests::CreateExamRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建考试
    pub async fn create_exam_impl(&self, req: CreateExamRequest) -> Result<Exam> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(req.title),
            exam_type: Set(req.exam_type),
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            exam_date: Set(req.exam_date),
            total_marks: Set(req.total_marks),
            passing_marks: Set(req.passing_marks),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("创建考试失败: {e}")))?;

        Ok(result.into_exam())
    }

    pub async fn get_exam_by_id_impl(&self, exam_id: i64) -> Result<Option<Exam>> {
        let result = Exams::find_by_id(exam_id)
            .one(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询考试失败: {e}")))?;

        Ok(result.map(|m| m.into_exam()))
    }

    /// 列出班级的考试（按考试日期升序）
    pub async fn list_exams_by_class_impl(&self, class_id: i64) -> Result<Vec<Exam>> {
        let exams = Exams::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::ExamDate)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询考试列表失败: {e}")))?;

        Ok(exams.into_iter().map(|m| m.into_exam()).collect())
    }

    /// 列出科目的考试（按考试日期升序）
    pub async fn list_exams_by_subject_impl(&self, subject_id: i64) -> Result<Vec<Exam>> {
        let exams = Exams::find()
            .filter(Column::SubjectId.eq(subject_id))
            .order_by_asc(Column::ExamDate)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询考试列表失败: {e}")))?;

        Ok(exams.into_iter().map(|m| m.into_exam()).collect())
    }
}
