//! 私信存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::messages::{ActiveModel, Column, Entity as Messages};
use crate::errors::{EduSyncError, Result};
use crate::models::messages::entities::Message;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 写入一条私信（未读）
    pub async fn create_message_impl(
        &self,
        sender_id: i64,
        recipient_id: i64,
        content: &str,
    ) -> Result<Message> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            sender_id: Set(sender_id),
            recipient_id: Set(recipient_id),
            content: Set(content.to_string()),
            created_at: Set(now),
            is_read: Set(false),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("保存私信失败: {e}")))?;

        Ok(result.into_message())
    }

    /// 双向会话
    ///
    /// 同一秒内的消息按 id 排序，保证全序。
    pub async fn list_conversation_impl(&self, user_a: i64, user_b: i64) -> Result<Vec<Message>> {
        let messages = Messages::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(Column::SenderId.eq(user_a))
                            .add(Column::RecipientId.eq(user_b)),
                    )
                    .add(
                        Condition::all()
                            .add(Column::SenderId.eq(user_b))
                            .add(Column::RecipientId.eq(user_a)),
                    ),
            )
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("查询会话失败: {e}")))?;

        Ok(messages.into_iter().map(|m| m.into_message()).collect())
    }

    /// 批量标记已读，返回受影响条数
    pub async fn mark_messages_read_impl(
        &self,
        reader_id: i64,
        partner_id: i64,
        up_to_id: i64,
    ) -> Result<u64> {
        let result = Messages::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::RecipientId.eq(reader_id))
            .filter(Column::SenderId.eq(partner_id))
            .filter(Column::IsRead.eq(false))
            .filter(Column::Id.lte(up_to_id))
            .exec(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("标记已读失败: {e}")))?;

        Ok(result.rows_affected)
    }

    pub async fn count_unread_messages_impl(&self, user_id: i64) -> Result<u64> {
        Messages::find()
            .filter(Column::RecipientId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("统计未读私信失败: {e}")))
    }

    pub async fn count_unread_by_sender_impl(&self, user_id: i64) -> Result<HashMap<i64, u64>> {
        let rows = Messages::find()
            .select_only()
            .column(Column::SenderId)
            .column_as(Column::Id.count(), "unread")
            .filter(Column::RecipientId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .group_by(Column::SenderId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("统计未读私信失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(sender_id, count)| (sender_id, count.max(0) as u64))
            .collect())
    }
}
