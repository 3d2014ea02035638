//! 学生档案存储操作

use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{EduSyncError, Result};
use crate::models::students::{entities::Student, requests::CreateStudentRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 学生建档
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(req.user_id),
            student_number: Set(req.student_number),
            class_id: Set(req.class_id),
            parent_id: Set(req.parent_id),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("创建学生档案失败: {e}")))?;

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, student_id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(student_id)
            .one(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 列出班级学生（按学号排序）
    pub async fn list_students_by_class_impl(&self, class_id: i64) -> Result<Vec<Student>> {
        let students = Students::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::StudentNumber)
            .all(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    /// 列出家长名下的学生
    pub async fn list_students_by_parent_impl(&self, parent_id: i64) -> Result<Vec<Student>> {
        let students = Students::find()
            .filter(Column::ParentId.eq(parent_id))
            .order_by_asc(Column::StudentNumber)
            .all(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询家长关联学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{self, Fixture};

    #[tokio::test]
    async fn test_lookup_by_class_parent_and_user() {
        let Fixture {
            storage,
            class,
            other_class,
            parent,
            students,
            student_users,
            ..
        } = fixtures::school().await;

        let in_class = storage.list_students_by_class_impl(class.id).await.unwrap();
        assert_eq!(
            in_class.iter().map(|s| s.student_number.as_str()).collect::<Vec<_>>(),
            vec!["S001", "S002"]
        );
        assert_eq!(
            storage
                .list_students_by_class_impl(other_class.id)
                .await
                .unwrap()
                .len(),
            1
        );

        let children = storage.list_students_by_parent_impl(parent.id).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, students[0].id);

        let by_user = storage
            .get_student_by_user_id_impl(student_users[2].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_user.id, students[2].id);
        assert!(by_user.is_in_class(other_class.id));
    }
}
