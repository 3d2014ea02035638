use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{EduSyncError, Result};
use crate::models::users::{entities::User, requests::CreateUserRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            email: Set(req.email),
            full_name: Set(req.full_name),
            role: Set(req.role.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 列出除指定用户外的活跃用户（联系人列表）
    pub async fn list_active_users_except_impl(&self, user_id: i64) -> Result<Vec<User>> {
        let users = Users::find()
            .filter(Column::IsActive.eq(true))
            .filter(Column::Id.ne(user_id))
            .order_by_asc(Column::FullName)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询联系人失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }
}
