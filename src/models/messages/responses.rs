use serde::Serialize;
use ts_rs::TS;

use super::entities::Message;
use crate::models::users::responses::UserBrief;

// 会话详情
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct ConversationResponse {
    pub partner: UserBrief,
    pub messages: Vec<Message>,
    // 本次打开会话标记为已读的条数
    pub marked_read: u64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct UnreadCountResponse {
    pub unread_count: u64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct ContactEntry {
    pub user: UserBrief,
    pub unread_count: u64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct ContactListResponse {
    pub items: Vec<ContactEntry>,
}
