//! 私信实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: i64,
    pub is_read: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SenderId",
        to = "super::users::Column::Id"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RecipientId",
        to = "super::users::Column::Id"
    )]
    Recipient,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_message(self) -> crate::models::messages::entities::Message {
        crate::models::messages::entities::Message {
            id: self.id,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            content: self.content,
            created_at: super::timestamp_to_utc(self.created_at),
            is_read: self.is_read,
        }
    }
}
