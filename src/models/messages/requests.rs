use serde::Deserialize;
use ts_rs::TS;

// 发送私信请求
//
// 字段均为可选，缺失时由服务层给出具体错误码。
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct SendMessageRequest {
    pub recipient_id: Option<i64>,
    pub content: Option<String>,
}
