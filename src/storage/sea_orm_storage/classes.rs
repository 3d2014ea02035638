//! 班级与科目存储操作

use super::SeaOrmStorage;
use crate::entity::classes::{ActiveModel, Entity as Classes};
use crate::entity::subjects::{
    ActiveModel as SubjectActiveModel, Column as SubjectColumn, Entity as Subjects,
};
use crate::errors::{EduSyncError, Result};
use crate::models::classes::{
    entities::{Class, Subject},
    requests::{CreateClassRequest, CreateSubjectRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            section: Set(req.section),
            teacher_id: Set(req.teacher_id),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 创建科目
    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let model = SubjectActiveModel {
            name: Set(req.name),
            code: Set(req.code),
            class_id: Set(req.class_id),
            teacher_id: Set(req.teacher_id),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("创建科目失败: {e}")))?;

        Ok(result.into_subject())
    }

    /// 通过 ID 获取科目
    pub async fn get_subject_by_id_impl(&self, subject_id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(subject_id)
            .one(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    /// 列出班级的全部科目
    pub async fn list_subjects_by_class_impl(&self, class_id: i64) -> Result<Vec<Subject>> {
        let subjects = Subjects::find()
            .filter(SubjectColumn::ClassId.eq(class_id))
            .order_by_asc(SubjectColumn::Name)
            .order_by_asc(SubjectColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询科目列表失败: {e}")))?;

        Ok(subjects.into_iter().map(|m| m.into_subject()).collect())
    }
}
