use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::ErrorCode;
use crate::models::messages::entities::Message;

/// 客户端发来的事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// 加入额外房间
    Join { room: String },
    SendMessage {
        #[serde(default)]
        recipient_id: Option<i64>,
        #[serde(default)]
        content: Option<String>,
    },
    // 信令负载原样转发，缺省时为 null
    CallOffer {
        to: i64,
        #[serde(default)]
        sdp: Value,
        #[serde(default)]
        media: Value,
    },
    CallAnswer {
        to: i64,
        #[serde(default)]
        sdp: Value,
    },
    IceCandidate {
        to: i64,
        #[serde(default)]
        candidate: Value,
    },
    EndCall {
        to: i64,
    },
    Ping,
}

/// 服务端推送的事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Joined {
        room: String,
    },
    NewMessage {
        id: i64,
        sender_id: i64,
        recipient_id: i64,
        content: String,
        timestamp: DateTime<Utc>,
    },
    CallOffer {
        from: i64,
        sdp: Value,
        media: Value,
    },
    CallAnswer {
        from: i64,
        sdp: Value,
    },
    IceCandidate {
        from: i64,
        candidate: Value,
    },
    EndCall {
        from: i64,
    },
    Pong,
    Error {
        code: i32,
        message: String,
    },
}

impl ServerEvent {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerEvent::Error {
            code: code.as_i32(),
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> String {
        // 所有字段均可序列化，失败时退化为通用错误帧
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"type":"error","code":{},"message":"serialization failed"}}"#,
                ErrorCode::InternalServerError.as_i32()
            )
        })
    }
}

impl From<&Message> for ServerEvent {
    fn from(message: &Message) -> Self {
        ServerEvent::NewMessage {
            id: message.id,
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            content: message.content.clone(),
            timestamp: message.created_at,
        }
    }
}

impl ClientEvent {
    /// 信令事件转换为发往对端的推送，返回 (目标用户, 事件)
    pub fn into_signal(self, from: i64) -> Option<(i64, ServerEvent)> {
        match self {
            ClientEvent::CallOffer { to, sdp, media } => {
                Some((to, ServerEvent::CallOffer { from, sdp, media }))
            }
            ClientEvent::CallAnswer { to, sdp } => Some((to, ServerEvent::CallAnswer { from, sdp })),
            ClientEvent::IceCandidate { to, candidate } => {
                Some((to, ServerEvent::IceCandidate { from, candidate }))
            }
            ClientEvent::EndCall { to } => Some((to, ServerEvent::EndCall { from })),
            _ => None,
        }
    }
}
