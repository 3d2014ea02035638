use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 私信
//
// 创建后只有 is_read 可以从 false 变为 true。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub is_read: bool,
}
